use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vaultlog::config::AppConfig;
use vaultlog::db::Database;
use vaultlog::export::{MailHandler, MailMessage, SystemMailHandler};
use vaultlog::models::plan::{self, day_name, day_plan, routine_snapshot};
use vaultlog::models::{Attempt, AttemptResult, CreateSessionInput, SessionKind};
use vaultlog::store::Store;
use vaultlog::units::{self, InputMode, Units};
use vaultlog::{render, stats};

#[derive(Parser)]
#[command(name = "vlog")]
#[command(about = "Pole-vault practice and meet log")]
struct Cli {
    /// Database file (overrides the config file and VAULTLOG_DATA_PATH)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log a practice against the weekly plan
    Practice {
        /// Plan day (defaults to the weekday of --date, or today)
        #[arg(long)]
        day: Option<String>,

        /// Routine items completed, 1-based (e.g. --done 1,2,4)
        #[arg(long, value_delimiter = ',')]
        done: Vec<usize>,

        #[command(flatten)]
        common: SessionArgs,
    },
    /// Log a meet
    Meet {
        /// Meet name
        #[arg(long)]
        name: Option<String>,

        /// Attempt as HEIGHT:RESULT, e.g. 14'6:clear or 440:x. Repeat in order.
        #[arg(short, long = "attempt")]
        attempts: Vec<String>,

        #[command(flatten)]
        common: SessionArgs,
    },
    /// List logged sessions, newest first
    List,
    /// Show one session
    Show {
        /// Session id or unique prefix
        id: String,
    },
    /// Delete a session
    Delete {
        /// Session id or unique prefix
        id: String,
    },
    /// Personal record, averages and latest practice
    Stats,
    /// Show the weekly training plan
    Plan {
        /// Day to show (defaults to today)
        #[arg(long)]
        day: Option<String>,

        /// Show the whole week
        #[arg(long)]
        week: bool,
    },
    /// Show or change the display units
    Units {
        /// imperial or metric
        units: Option<Units>,
    },
    /// Send a session summary to the mail client
    Export {
        /// Session id or unique prefix
        id: String,

        /// Recipient (defaults to mail_to from the config)
        #[arg(long)]
        to: Option<String>,
    },
    /// Show or change the configuration file
    Config {
        /// Default recipient for exports
        #[arg(long)]
        mail_to: Option<String>,

        /// Reject malformed numbers instead of treating them as 0
        #[arg(long)]
        strict: Option<bool>,
    },
}

/// Fields shared by practice and meet forms. Lengths are typed in the
/// current display units.
#[derive(Args)]
struct SessionArgs {
    /// Date as YYYY-MM-DD or RFC 3339 (defaults to now)
    #[arg(long)]
    date: Option<String>,

    #[arg(long, default_value = "")]
    goals: String,

    #[arg(long, default_value = "")]
    notes: String,

    /// Approach step count
    #[arg(long)]
    steps: Option<String>,

    /// Takeoff mark, e.g. 12'6 or 381
    #[arg(long)]
    takeoff: Option<String>,

    /// Standards setting, e.g. 1'6 or 45
    #[arg(long)]
    standards: Option<String>,

    /// Don't save; print the summary instead
    #[arg(long)]
    dry_run: bool,

    /// Also open the summary in a mail draft
    #[arg(long)]
    email: bool,
}

/// Initialize tracing on stderr so stdout only carries command output.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "vaultlog=warn,vlog=warn".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = AppConfig::load();
    let mode = config.input_mode();
    let open = || open_store(cli.data.as_ref(), &config);

    match cli.command {
        Some(Commands::Practice { day, done, common }) => {
            let mut store = open()?;
            let date = parse_date(common.date.as_deref())?;
            let weekday = match day {
                Some(ref d) => plan::parse_day(d).with_context(|| format!("Unknown day '{}'", d))?,
                None => date.unwrap_or_else(Utc::now).weekday(),
            };
            let done: Vec<usize> = done.into_iter().filter_map(|n| n.checked_sub(1)).collect();

            let kind = SessionKind::Practice {
                day: day_name(weekday).to_string(),
                routine: routine_snapshot(weekday, &done),
            };
            let input = session_input(&common, date, kind, store.units(), mode)?;
            save_or_preview(&mut store, input, &common, &config)?;
        }
        Some(Commands::Meet {
            name,
            attempts,
            common,
        }) => {
            let mut store = open()?;
            let units = store.units();
            let date = parse_date(common.date.as_deref())?;
            let attempts = attempts
                .iter()
                .map(|a| parse_attempt(a, units, mode))
                .collect::<Result<Vec<_>>>()?;

            let kind = SessionKind::Meet {
                meet_name: name.filter(|n| !n.trim().is_empty()),
                attempts,
            };
            let input = session_input(&common, date, kind, units, mode)?;
            save_or_preview(&mut store, input, &common, &config)?;
        }
        Some(Commands::List) | None => {
            let store = open()?;
            print!("{}", render::render_session_list(store.sessions(), store.units()));
        }
        Some(Commands::Show { id }) => {
            let store = open()?;
            let session = store.find(&id)?;
            print!("{}", render::render_session_detail(session, store.units()));
        }
        Some(Commands::Delete { id }) => {
            let mut store = open()?;
            let session_id = store.find(&id)?.id;
            store.delete_session(session_id)?;
            println!("Deleted session {}", session_id);
        }
        Some(Commands::Stats) => {
            let store = open()?;
            let summary = stats::summarize(store.sessions());
            let latest = stats::latest_practice(store.sessions());
            print!("{}", render::render_stats(&summary, latest, store.units()));
        }
        Some(Commands::Plan { day, week }) => {
            if week {
                print!("{}", render::render_week_plan());
            } else {
                let weekday = match day {
                    Some(ref d) => {
                        plan::parse_day(d).with_context(|| format!("Unknown day '{}'", d))?
                    }
                    None => Utc::now().weekday(),
                };
                print!("{}", render::render_day_plan(day_plan(weekday)));
            }
        }
        Some(Commands::Units { units: None }) => println!("{}", open()?.units()),
        Some(Commands::Units { units: Some(new) }) => {
            open()?.set_units(new)?;
            println!("Units set to {}", new);
        }
        Some(Commands::Export { id, to }) => {
            let store = open()?;
            let session = store.find(&id)?;
            let message =
                MailMessage::for_session(session, store.units(), to.or(config.mail_to.clone()));
            send(&SystemMailHandler, &message);
        }
        Some(Commands::Config { mail_to, strict }) => configure(config.clone(), mail_to, strict)?,
    }

    Ok(())
}

/// Open the database (`--data`, then the config file, then the platform
/// default) and load the stored state.
fn open_store(data: Option<&PathBuf>, config: &AppConfig) -> Result<Store> {
    let db = match data.or(config.data_path.as_ref()) {
        Some(path) => Database::open(path.clone())?,
        None => Database::open_default()?,
    };
    db.migrate()?;
    Store::open(db)
}

fn configure(mut config: AppConfig, mail_to: Option<String>, strict: Option<bool>) -> Result<()> {
    if mail_to.is_none() && strict.is_none() {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    if let Some(to) = mail_to {
        config.mail_to = Some(to).filter(|t| !t.is_empty());
    }
    if let Some(strict) = strict {
        config.strict_input = strict;
    }
    config.save()?;
    println!("Saved {}", vaultlog::config::get_config_path()?.display());
    Ok(())
}

fn save_or_preview(
    store: &mut Store,
    input: CreateSessionInput,
    args: &SessionArgs,
    config: &AppConfig,
) -> Result<()> {
    let units = store.units();

    if args.dry_run {
        let message = MailMessage::for_draft(&input, units, config.mail_to.clone());
        println!("{}", message.body);
        if args.email {
            send(&SystemMailHandler, &message);
        }
        return Ok(());
    }

    let session = store.add_session(input)?;
    println!("Saved {} {}", session.kind.as_str(), session.short_id());
    print!("{}", render::render_session_detail(&session, units));

    if args.email {
        let message = MailMessage::for_session(&session, units, config.mail_to.clone());
        send(&SystemMailHandler, &message);
    }
    Ok(())
}

/// Hand a message to the mail client. Failure is only a notice.
fn send(handler: &impl MailHandler, message: &MailMessage) {
    if let Err(e) = handler.compose(message) {
        tracing::warn!("Mail export failed: {}", e);
        eprintln!("Notice: {}", e);
        eprintln!("Copy this link instead:\n{}", message.mailto_url());
    }
}

fn session_input(
    args: &SessionArgs,
    date: Option<DateTime<Utc>>,
    kind: SessionKind,
    units: Units,
    mode: InputMode,
) -> Result<CreateSessionInput> {
    let steps = match args.steps.as_deref() {
        Some(text) => match mode {
            InputMode::Lenient => units::coerce_number(text),
            InputMode::Strict => units::parse_number(text)?,
        },
        None => 0.0,
    };
    let length = |text: &Option<String>| -> Result<f64> {
        Ok(units::parse_length(
            text.as_deref().unwrap_or(""),
            units,
            mode,
        )?)
    };

    Ok(CreateSessionInput {
        date,
        goals: args.goals.clone(),
        notes: args.notes.clone(),
        approach_steps: Some(steps.max(0.0).round() as u32).filter(|&n| n > 0),
        takeoff_in: length(&args.takeoff)?,
        standards_in: length(&args.standards)?,
        kind,
    })
}

fn parse_date(text: Option<&str>) -> Result<Option<DateTime<Utc>>> {
    let Some(text) = text.map(str::trim).filter(|t| !t.is_empty()) else {
        return Ok(None);
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(Some(dt.with_timezone(&Utc)));
    }

    let date = NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", text))?;
    let noon = date
        .and_hms_opt(12, 0, 0)
        .context("Invalid time of day")?
        .and_utc();
    Ok(Some(noon))
}

fn parse_attempt(text: &str, units: Units, mode: InputMode) -> Result<Attempt> {
    let Some((height, result)) = text.rsplit_once(':') else {
        bail!("Invalid attempt '{}', expected HEIGHT:RESULT", text);
    };

    let result = AttemptResult::from_str(result).with_context(|| {
        format!(
            "Invalid attempt result '{}'. Must be: clear (o) or miss (x)",
            result
        )
    })?;

    Ok(Attempt {
        height_in: units::parse_length(height, units, mode)?,
        result,
    })
}
