//! The persisted application document and its forward migrations.
//!
//! The whole application state is one JSON document:
//!
//! ```json
//! { "version": 2, "settings": { "units": "imperial" }, "sessions": [ ... ] }
//! ```
//!
//! Older documents are upgraded step by step on load. The rest of the crate
//! only ever sees the current shape.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::models::{Session, Settings};

/// Version written by this build.
pub const CURRENT_VERSION: u32 = 2;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppDocument {
    pub version: u32,
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub sessions: Vec<Session>,
}

impl Default for AppDocument {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            settings: Settings::default(),
            sessions: Vec::new(),
        }
    }
}

struct DocumentMigration {
    /// Version this migration upgrades from.
    from: u32,
    name: &'static str,
    apply: fn(&mut Map<String, Value>),
}

const DOCUMENT_MIGRATIONS: &[DocumentMigration] = &[DocumentMigration {
    from: 1,
    name: "settings_object",
    apply: settings_object,
}];

/// Upgrade a raw document to the current version and parse it.
///
/// A missing `version` field means version 1. Documents written by a newer
/// build are rejected rather than downgraded.
pub fn migrate(mut value: Value) -> Result<AppDocument> {
    let Some(doc) = value.as_object_mut() else {
        bail!("State document is not a JSON object");
    };

    let mut version = match doc.get("version") {
        None | Some(Value::Null) => 1,
        Some(v) => v
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .with_context(|| format!("Invalid state document version: {}", v))?,
    };

    if version > CURRENT_VERSION {
        bail!(
            "State document version {} is newer than supported version {}",
            version,
            CURRENT_VERSION
        );
    }

    for migration in DOCUMENT_MIGRATIONS {
        if migration.from == version {
            tracing::info!(
                "Migrating state document from version {}: {}",
                migration.from,
                migration.name
            );
            (migration.apply)(doc);
            version = migration.from + 1;
            doc.insert("version".to_string(), Value::from(version));
        }
    }

    serde_json::from_value(value).context("Failed to parse state document")
}

/// v1 → v2: `units` moves under `settings`, sessions without an id get one.
fn settings_object(doc: &mut Map<String, Value>) {
    let units = doc.remove("units");
    if !doc.contains_key("settings") {
        let mut settings = Map::new();
        if let Some(units) = units {
            settings.insert("units".to_string(), units);
        }
        doc.insert("settings".to_string(), Value::Object(settings));
    }

    if let Some(Value::Array(sessions)) = doc.get_mut("sessions") {
        for session in sessions.iter_mut().filter_map(Value::as_object_mut) {
            if !matches!(session.get("id"), Some(Value::String(_))) {
                session.insert("id".to_string(), Value::from(Uuid::new_v4().to_string()));
            }
        }
    }
}
