//! Mail export of a session summary.
//!
//! The summary text is built from the same formatting functions the CLI
//! uses, so an exported session reads exactly like it displays. Sending is
//! delegated to a [`MailHandler`]; the default one hands a `mailto:` URL to
//! the platform opener. A missing handler is a notice for the user, never a
//! failure of the action that triggered it.

use thiserror::Error;

use crate::models::{CreateSessionInput, Session, SessionKind};
use crate::units::{format_length, Units};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("No mail handler available: {0}")]
    NoMailHandler(String),
}

/// A composed message, ready for a mail handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    pub to: Option<String>,
    pub subject: String,
    pub body: String,
}

impl MailMessage {
    pub fn for_session(session: &Session, units: Units, to: Option<String>) -> Self {
        Self {
            to,
            subject: subject(&session.kind, session.date.format("%Y-%m-%d").to_string()),
            body: session_lines(session, units).join("\n"),
        }
    }

    /// Message for a session that has not been saved yet.
    pub fn for_draft(input: &CreateSessionInput, units: Units, to: Option<String>) -> Self {
        let date = input
            .date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "draft".to_string());
        Self {
            to,
            subject: subject(&input.kind, date),
            body: draft_lines(input, units).join("\n"),
        }
    }

    /// `mailto:` URL with percent-encoded subject and body.
    pub fn mailto_url(&self) -> String {
        let to = self
            .to
            .as_deref()
            .map(|to| urlencoding::encode(to).into_owned())
            .unwrap_or_default();
        format!(
            "mailto:{}?subject={}&body={}",
            to,
            urlencoding::encode(&self.subject),
            urlencoding::encode(&self.body)
        )
    }
}

/// Something that can hand a message to the user's mail client.
pub trait MailHandler {
    fn compose(&self, message: &MailMessage) -> Result<(), ExportError>;
}

/// Opens the `mailto:` URL with the platform's default handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemMailHandler;

impl MailHandler for SystemMailHandler {
    fn compose(&self, message: &MailMessage) -> Result<(), ExportError> {
        let url = message.mailto_url();
        tracing::debug!("Opening mail handler for '{}'", message.subject);
        open::that(&url).map_err(|e| ExportError::NoMailHandler(e.to_string()))
    }
}

fn subject(kind: &SessionKind, date: String) -> String {
    match kind {
        SessionKind::Practice { day, .. } => format!("Pole vault practice: {} {}", day, date),
        SessionKind::Meet {
            meet_name: Some(name),
            ..
        } if !name.trim().is_empty() => format!("Pole vault meet: {} {}", name, date),
        SessionKind::Meet { .. } => format!("Pole vault meet: {}", date),
    }
}

/// Human-readable summary of a saved session.
pub fn session_lines(session: &Session, units: Units) -> Vec<String> {
    let mut lines = vec![format!("Date: {}", session.date.format("%Y-%m-%d %H:%M"))];
    lines.extend(body_lines(
        &session.goals,
        &session.notes,
        session.approach_steps,
        session.takeoff_in,
        session.standards_in,
        &session.kind,
        units,
    ));
    lines
}

/// Human-readable summary of in-progress form state.
pub fn draft_lines(input: &CreateSessionInput, units: Units) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(date) = input.date {
        lines.push(format!("Date: {}", date.format("%Y-%m-%d %H:%M")));
    }
    lines.extend(body_lines(
        &input.goals,
        &input.notes,
        input.approach_steps,
        input.takeoff_in,
        input.standards_in,
        &input.kind,
        units,
    ));
    lines
}

fn body_lines(
    goals: &str,
    notes: &str,
    approach_steps: Option<u32>,
    takeoff_in: f64,
    standards_in: f64,
    kind: &SessionKind,
    units: Units,
) -> Vec<String> {
    let mut lines = Vec::new();

    match kind {
        SessionKind::Practice { day, .. } => lines.push(format!("Practice ({})", day)),
        SessionKind::Meet { meet_name, .. } => lines.push(format!(
            "Meet: {}",
            meet_name.as_deref().unwrap_or("unnamed")
        )),
    }

    lines.push(format!(
        "Approach steps: {}",
        approach_steps.map_or("—".to_string(), |n| n.to_string())
    ));
    lines.push(format!("Takeoff mark: {}", format_length(takeoff_in, units)));
    lines.push(format!("Standards: {}", format_length(standards_in, units)));

    if !goals.trim().is_empty() {
        lines.push(format!("Goals: {}", goals.trim()));
    }

    match kind {
        SessionKind::Practice { routine, .. } if !routine.is_empty() => {
            lines.push("Routine:".to_string());
            for item in routine {
                let mark = if item.done { 'x' } else { ' ' };
                lines.push(format!("  [{}] {}", mark, item.text));
            }
        }
        SessionKind::Meet { attempts, .. } if !attempts.is_empty() => {
            lines.push("Attempts:".to_string());
            for (i, attempt) in attempts.iter().enumerate() {
                lines.push(format!(
                    "  {}. {} {}",
                    i + 1,
                    format_length(attempt.height_in, units),
                    attempt.result.as_str()
                ));
            }
        }
        _ => {}
    }

    if !notes.trim().is_empty() {
        lines.push(format!("Notes: {}", notes.trim()));
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Attempt, AttemptResult, RoutineItem};
    use chrono::{TimeZone, Utc};
    use std::cell::RefCell;
    use uuid::Uuid;

    fn meet_session() -> Session {
        Session {
            id: Uuid::new_v4(),
            date: Utc.with_ymd_and_hms(2024, 5, 4, 14, 30, 0).unwrap(),
            goals: "Open at 13'".to_string(),
            notes: String::new(),
            approach_steps: Some(14),
            takeoff_in: 150.0,
            standards_in: 0.0,
            kind: SessionKind::Meet {
                meet_name: Some("County Champs".to_string()),
                attempts: vec![
                    Attempt {
                        height_in: 156.0,
                        result: AttemptResult::Clear,
                    },
                    Attempt {
                        height_in: 162.0,
                        result: AttemptResult::Miss,
                    },
                ],
            },
        }
    }

    #[derive(Default)]
    struct RecordingHandler {
        sent: RefCell<Vec<MailMessage>>,
    }

    impl MailHandler for RecordingHandler {
        fn compose(&self, message: &MailMessage) -> Result<(), ExportError> {
            self.sent.borrow_mut().push(message.clone());
            Ok(())
        }
    }

    struct MissingHandler;

    impl MailHandler for MissingHandler {
        fn compose(&self, _message: &MailMessage) -> Result<(), ExportError> {
            Err(ExportError::NoMailHandler("nothing registered".to_string()))
        }
    }

    #[test]
    fn test_session_lines_in_entry_order() {
        let lines = session_lines(&meet_session(), Units::Imperial);
        assert_eq!(
            lines,
            vec![
                "Date: 2024-05-04 14:30",
                "Meet: County Champs",
                "Approach steps: 14",
                "Takeoff mark: 12'6\"",
                "Standards: —",
                "Goals: Open at 13'",
                "Attempts:",
                "  1. 13'0\" clear",
                "  2. 13'6\" miss",
            ]
        );
    }

    #[test]
    fn test_metric_lines() {
        let lines = session_lines(&meet_session(), Units::Metric);
        assert!(lines.contains(&"Takeoff mark: 381 cm".to_string()));
        assert!(lines.contains(&"  1. 396 cm clear".to_string()));
    }

    #[test]
    fn test_draft_lines_show_routine_snapshot() {
        let input = CreateSessionInput {
            date: None,
            goals: String::new(),
            notes: "Felt quick".to_string(),
            approach_steps: None,
            takeoff_in: 0.0,
            standards_in: 0.0,
            kind: SessionKind::Practice {
                day: "Monday".to_string(),
                routine: vec![
                    RoutineItem {
                        text: "Pole runs x6".to_string(),
                        done: true,
                    },
                    RoutineItem {
                        text: "Core circuit".to_string(),
                        done: false,
                    },
                ],
            },
        };

        let lines = draft_lines(&input, Units::Imperial);
        assert_eq!(lines[0], "Practice (Monday)");
        assert!(lines.contains(&"  [x] Pole runs x6".to_string()));
        assert!(lines.contains(&"  [ ] Core circuit".to_string()));
        assert_eq!(lines.last().unwrap(), "Notes: Felt quick");

        let message = MailMessage::for_draft(&input, Units::Imperial, None);
        assert_eq!(message.subject, "Pole vault practice: Monday draft");
    }

    #[test]
    fn test_mailto_url_is_percent_encoded() {
        let message = MailMessage {
            to: Some("coach@example.com".to_string()),
            subject: "Pole vault meet: 2024-05-04".to_string(),
            body: "Line one\nA&B".to_string(),
        };

        assert_eq!(
            message.mailto_url(),
            "mailto:coach%40example.com?subject=Pole%20vault%20meet%3A%202024-05-04&body=Line%20one%0AA%26B"
        );
    }

    #[test]
    fn test_handler_receives_composed_message() {
        let handler = RecordingHandler::default();
        let message = MailMessage::for_session(&meet_session(), Units::Imperial, None);

        handler.compose(&message).unwrap();

        let sent = handler.sent.borrow();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].subject, "Pole vault meet: County Champs 2024-05-04");
    }

    #[test]
    fn test_missing_handler_is_reported() {
        let message = MailMessage::for_session(&meet_session(), Units::Imperial, None);
        let err = MissingHandler.compose(&message).unwrap_err();
        assert!(err.to_string().starts_with("No mail handler available"));
    }
}
