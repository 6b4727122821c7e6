use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One logged practice or meet.
///
/// Sessions are created fully formed by a save action and never edited
/// afterwards; the only mutation is deleting the whole session. Every length
/// is stored in canonical inches, and a length of `0.0` means "not recorded".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: Uuid,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub goals: String,
    #[serde(default)]
    pub notes: String,
    /// Number of steps in the approach run, if counted.
    #[serde(default)]
    pub approach_steps: Option<u32>,
    /// Distance from the back of the box to the takeoff mark.
    #[serde(default)]
    pub takeoff_in: f64,
    /// Standards setting (bar position relative to the box).
    #[serde(default)]
    pub standards_in: f64,
    #[serde(flatten)]
    pub kind: SessionKind,
}

/// Practice or meet specific data, tagged as `"type"` in JSON.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionKind {
    Practice {
        /// Weekday label of the plan the routine was taken from.
        day: String,
        /// Snapshot of the day's routine at logging time.
        #[serde(default)]
        routine: Vec<RoutineItem>,
    },
    Meet {
        #[serde(default, rename = "meetName")]
        meet_name: Option<String>,
        /// Attempts in the order they were taken.
        #[serde(default)]
        attempts: Vec<Attempt>,
    },
}

impl SessionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Practice { .. } => "practice",
            Self::Meet { .. } => "meet",
        }
    }
}

impl Session {
    pub fn is_practice(&self) -> bool {
        matches!(self.kind, SessionKind::Practice { .. })
    }

    pub fn is_meet(&self) -> bool {
        matches!(self.kind, SessionKind::Meet { .. })
    }

    /// Attempts of a meet; empty for practices.
    pub fn attempts(&self) -> &[Attempt] {
        match &self.kind {
            SessionKind::Meet { attempts, .. } => attempts,
            SessionKind::Practice { .. } => &[],
        }
    }

    /// First eight characters of the id, enough to address a session from the CLI.
    pub fn short_id(&self) -> String {
        self.id.simple().to_string()[..8].to_string()
    }
}

/// One item of a practice routine and whether it was done.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoutineItem {
    pub text: String,
    #[serde(default)]
    pub done: bool,
}

/// One try at a bar height.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Attempt {
    pub height_in: f64,
    pub result: AttemptResult,
}

/// Outcome of an attempt.
///
/// - `Clear`: the bar stayed up
/// - `Miss`: the bar came down, or the vaulter ran through
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AttemptResult {
    Clear,
    Miss,
}

impl AttemptResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::Miss => "miss",
        }
    }

    /// Scoresheet mark: `O` for a clearance, `X` for a miss.
    pub fn mark(&self) -> char {
        match self {
            Self::Clear => 'O',
            Self::Miss => 'X',
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clear" | "o" | "make" => Some(Self::Clear),
            "miss" | "x" => Some(Self::Miss),
            _ => None,
        }
    }
}

/// Input for logging a new session.
///
/// The id is always generated on save. `date` defaults to the moment of
/// saving when not provided.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionInput {
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub goals: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub approach_steps: Option<u32>,
    #[serde(default)]
    pub takeoff_in: f64,
    #[serde(default)]
    pub standards_in: f64,
    #[serde(flatten)]
    pub kind: SessionKind,
}

impl CreateSessionInput {
    /// Build the session this input describes.
    pub fn into_session(self, id: Uuid, now: DateTime<Utc>) -> Session {
        Session {
            id,
            date: self.date.unwrap_or(now),
            goals: self.goals,
            notes: self.notes,
            approach_steps: self.approach_steps,
            takeoff_in: self.takeoff_in,
            standards_in: self.standards_in,
            kind: self.kind,
        }
    }
}
