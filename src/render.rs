//! Plain-text rendering for the command line.

use crate::export::session_lines;
use crate::models::plan::{day_name, DayPlan, WEEKLY_PLAN};
use crate::models::{Session, SessionKind};
use crate::stats::{best_clear, SessionStats};
use crate::units::{format_length, Units};

/// One line per session, newest first.
///
/// ```text
/// 3f2a9c1e  2024-05-04  meet      County Champs  best 13'0"
/// 9b1d7a20  2024-05-01  practice  Wednesday  3/4 done
/// ```
pub fn render_session_list(sessions: &[Session], units: Units) -> String {
    if sessions.is_empty() {
        return "No sessions logged yet.\n".to_string();
    }

    let mut ordered: Vec<&Session> = sessions.iter().collect();
    // stable sort keeps entry order among sessions on the same date
    ordered.sort_by(|a, b| b.date.cmp(&a.date));

    let mut output = String::new();
    for session in ordered {
        output.push_str(&format!(
            "{}  {}  {:<8}  {}\n",
            session.short_id(),
            session.date.format("%Y-%m-%d"),
            session.kind.as_str(),
            headline(session, units)
        ));
    }
    output
}

fn headline(session: &Session, units: Units) -> String {
    match &session.kind {
        SessionKind::Practice { day, routine } => {
            let done = routine.iter().filter(|item| item.done).count();
            format!("{}  {}/{} done", day, done, routine.len())
        }
        SessionKind::Meet { meet_name, .. } => format!(
            "{}  best {}",
            meet_name.as_deref().unwrap_or("Meet"),
            format_length(best_clear(session), units)
        ),
    }
}

pub fn render_session_detail(session: &Session, units: Units) -> String {
    let mut output = format!("Session {}\n", session.id);
    for line in session_lines(session, units) {
        output.push_str(&line);
        output.push('\n');
    }
    output
}

pub fn render_day_plan(plan: &DayPlan) -> String {
    let mut output = format!("{}: {}\n", day_name(plan.day), plan.goals);
    for (i, item) in plan.routine.iter().enumerate() {
        output.push_str(&format!("  {}. {}\n", i + 1, item));
    }
    output
}

pub fn render_week_plan() -> String {
    WEEKLY_PLAN
        .iter()
        .map(render_day_plan)
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_stats(stats: &SessionStats, latest: Option<&Session>, units: Units) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "Sessions: {} ({} practices, {} meets)\n",
        stats.total, stats.practices, stats.meets
    ));
    output.push_str(&format!(
        "Personal record: {}\n",
        format_length(stats.personal_record, units)
    ));
    output.push_str(&format!(
        "Attempts: {} ({} cleared, {:.0}%)\n",
        stats.attempts,
        stats.clears,
        stats.clear_rate() * 100.0
    ));

    let steps = if stats.avg_approach_steps > 0.0 {
        format!("{:.1}", stats.avg_approach_steps)
    } else {
        "—".to_string()
    };
    output.push_str(&format!("Average approach steps: {}\n", steps));
    output.push_str(&format!(
        "Average takeoff mark: {}\n",
        format_length(stats.avg_takeoff_in, units)
    ));
    output.push_str(&format!(
        "Average standards: {}\n",
        format_length(stats.avg_standards_in, units)
    ));

    match latest {
        Some(session) => output.push_str(&format!(
            "Latest practice: {} ({})\n",
            session.date.format("%Y-%m-%d"),
            session.short_id()
        )),
        None => output.push_str("Latest practice: none\n"),
    }

    output
}
