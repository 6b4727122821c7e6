//! Derived values over the session history.
//!
//! Everything here is a pure function of the slice it is given. Callers pass
//! whatever snapshot of the history they hold; nothing is cached or mutated.

use serde::Serialize;

use crate::models::{AttemptResult, Session};

/// Best cleared height across every meet attempt, in inches.
///
/// Returns 0 when nothing has been cleared yet.
pub fn personal_record(sessions: &[Session]) -> f64 {
    sessions
        .iter()
        .filter(|s| s.is_meet())
        .map(best_clear)
        .fold(0.0, f64::max)
}

/// Best cleared height of a single meet, 0 for practices or no clears.
pub fn best_clear(session: &Session) -> f64 {
    session
        .attempts()
        .iter()
        .filter(|a| a.result == AttemptResult::Clear)
        .map(|a| a.height_in)
        .fold(0.0, f64::max)
}

/// The practice with the most recent date.
///
/// Practices dated identically resolve to the one that comes first in
/// `sessions`.
pub fn latest_practice(sessions: &[Session]) -> Option<&Session> {
    sessions
        .iter()
        .filter(|s| s.is_practice())
        .fold(None, |latest: Option<&Session>, s| match latest {
            Some(l) if l.date >= s.date => Some(l),
            _ => Some(s),
        })
}

/// Arithmetic mean, 0 for an empty slice.
///
/// Callers drop missing samples before calling.
pub fn average(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Summary of the whole history, as shown on the stats screen.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionStats {
    pub total: usize,
    pub practices: usize,
    pub meets: usize,
    pub attempts: usize,
    pub clears: usize,
    /// Inches; 0 when no clears.
    pub personal_record: f64,
    /// Mean over sessions that recorded a step count.
    pub avg_approach_steps: f64,
    /// Inches, over sessions that recorded a takeoff mark.
    pub avg_takeoff_in: f64,
    /// Inches, over sessions that recorded a standards setting.
    pub avg_standards_in: f64,
}

impl SessionStats {
    /// Fraction of attempts cleared, 0 with no attempts.
    pub fn clear_rate(&self) -> f64 {
        if self.attempts == 0 {
            return 0.0;
        }
        self.clears as f64 / self.attempts as f64
    }
}

pub fn summarize(sessions: &[Session]) -> SessionStats {
    let practices = sessions.iter().filter(|s| s.is_practice()).count();
    let attempts: Vec<_> = sessions.iter().flat_map(|s| s.attempts()).collect();
    let clears = attempts
        .iter()
        .filter(|a| a.result == AttemptResult::Clear)
        .count();

    let steps: Vec<f64> = sessions
        .iter()
        .filter_map(|s| s.approach_steps)
        .filter(|&n| n > 0)
        .map(f64::from)
        .collect();

    SessionStats {
        total: sessions.len(),
        practices,
        meets: sessions.len() - practices,
        attempts: attempts.len(),
        clears,
        personal_record: personal_record(sessions),
        avg_approach_steps: average(&steps),
        avg_takeoff_in: average(&recorded(sessions.iter().map(|s| s.takeoff_in))),
        avg_standards_in: average(&recorded(sessions.iter().map(|s| s.standards_in))),
    }
}

/// Keep only lengths that were actually recorded.
fn recorded(values: impl Iterator<Item = f64>) -> Vec<f64> {
    values.filter(|v| *v > 0.0).collect()
}
