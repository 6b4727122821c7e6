//! The application state container.
//!
//! [`Store`] owns the session history and the unit preference. The binary
//! creates one at startup and passes slices of its state into the pure
//! [`units`](crate::units) and [`stats`](crate::stats) functions; nothing else
//! holds state.
//!
//! Each logical action (add, delete, change units) is applied to a copy of
//! the document and saved before it replaces the in-memory state, so a failed
//! save leaves the store exactly as it was.

use anyhow::{ensure, Result};
use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use crate::db::{AppDocument, Database};
use crate::models::{Attempt, CreateSessionInput, Session, SessionKind, Settings};
use crate::units::Units;

/// Failure to resolve a session reference typed by the user.
#[derive(Debug, Error, PartialEq)]
pub enum LookupError {
    #[error("Session not found: {0}")]
    NotFound(String),

    #[error("Session id '{0}' is ambiguous, type more characters")]
    Ambiguous(String),
}

pub struct Store {
    db: Database,
    doc: AppDocument,
}

impl Store {
    /// Load the stored state.
    pub fn open(db: Database) -> Result<Self> {
        let doc = db.load_document()?;
        Ok(Self { db, doc })
    }

    pub fn sessions(&self) -> &[Session] {
        &self.doc.sessions
    }

    pub fn settings(&self) -> &Settings {
        &self.doc.settings
    }

    pub fn units(&self) -> Units {
        self.doc.settings.units
    }

    /// Look up a session by id. `None` if it was deleted or never existed.
    pub fn session(&self, id: Uuid) -> Option<&Session> {
        self.doc.sessions.iter().find(|s| s.id == id)
    }

    /// Resolve a full id or a unique prefix of one.
    pub fn find(&self, reference: &str) -> Result<&Session, LookupError> {
        let reference = reference.trim();
        if let Ok(id) = Uuid::parse_str(reference) {
            return self
                .session(id)
                .ok_or_else(|| LookupError::NotFound(reference.to_string()));
        }

        let prefix = reference.to_ascii_lowercase().replace('-', "");
        if prefix.is_empty() {
            return Err(LookupError::NotFound(reference.to_string()));
        }

        let mut matches = self
            .doc
            .sessions
            .iter()
            .filter(|s| s.id.simple().to_string().starts_with(&prefix));

        match (matches.next(), matches.next()) {
            (Some(session), None) => Ok(session),
            (Some(_), Some(_)) => Err(LookupError::Ambiguous(reference.to_string())),
            (None, _) => Err(LookupError::NotFound(reference.to_string())),
        }
    }

    /// Save a new session and return it.
    ///
    /// Lengths must be finite and non-negative; anything else is rejected
    /// before the document is touched.
    pub fn add_session(&mut self, input: CreateSessionInput) -> Result<Session> {
        check_lengths(&input)?;

        let mut id = Uuid::new_v4();
        while self.session(id).is_some() {
            id = Uuid::new_v4();
        }

        let session = input.into_session(id, Utc::now());
        let mut doc = self.doc.clone();
        doc.sessions.push(session.clone());
        self.commit(doc)?;

        tracing::info!(
            "Logged {} session {}",
            session.kind.as_str(),
            session.short_id()
        );
        Ok(session)
    }

    /// Delete a session. Returns `false` if no session has that id.
    pub fn delete_session(&mut self, id: Uuid) -> Result<bool> {
        if self.session(id).is_none() {
            return Ok(false);
        }

        let mut doc = self.doc.clone();
        doc.sessions.retain(|s| s.id != id);
        self.commit(doc)?;

        tracing::info!("Deleted session {}", id);
        Ok(true)
    }

    pub fn set_units(&mut self, units: Units) -> Result<()> {
        if self.doc.settings.units == units {
            return Ok(());
        }

        let mut doc = self.doc.clone();
        doc.settings.units = units;
        self.commit(doc)?;

        tracing::info!("Units set to {}", units);
        Ok(())
    }

    fn commit(&mut self, doc: AppDocument) -> Result<()> {
        self.db.save_document(&doc)?;
        self.doc = doc;
        Ok(())
    }
}

// serde_json writes non-finite floats as null, which the next load rejects
fn check_lengths(input: &CreateSessionInput) -> Result<()> {
    let attempts: &[Attempt] = match &input.kind {
        SessionKind::Meet { attempts, .. } => attempts.as_slice(),
        SessionKind::Practice { .. } => &[],
    };

    let lengths = [("takeoff", input.takeoff_in), ("standards", input.standards_in)]
        .into_iter()
        .chain(attempts.iter().map(|a| ("attempt height", a.height_in)));

    for (name, value) in lengths {
        ensure!(
            value.is_finite() && value >= 0.0,
            "Invalid {} length: {}",
            name,
            value
        );
    }
    Ok(())
}
