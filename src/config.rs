use anyhow::{Context, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::units::InputMode;

const APP_NAME: &str = "vaultlog";
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    /// Database file. Defaults to the platform data directory.
    pub data_path: Option<PathBuf>,
    /// Recipient filled in when exporting a session by mail.
    pub mail_to: Option<String>,
    /// Reject malformed numbers instead of treating them as 0.
    pub strict_input: bool,
}

impl AppConfig {
    /// Load configuration from the user's config directory, then apply
    /// environment overrides.
    /// Falls back to defaults if the file doesn't exist or fails to parse.
    pub fn load() -> Self {
        let config = match get_config_path().and_then(|path| Self::load_from(&path)) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Failed to load config, using defaults: {:#}", e);
                Self::default()
            }
        };
        config.with_env_overrides(|key| std::env::var(key).ok())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config = serde_json::from_str(&content).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Apply `VAULTLOG_DATA_PATH`, `VAULTLOG_MAIL_TO` and `VAULTLOG_STRICT_INPUT`.
    pub fn with_env_overrides(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(path) = var("VAULTLOG_DATA_PATH").filter(|v| !v.is_empty()) {
            self.data_path = Some(PathBuf::from(path));
        }
        if let Some(to) = var("VAULTLOG_MAIL_TO").filter(|v| !v.is_empty()) {
            self.mail_to = Some(to);
        }
        if let Some(strict) = var("VAULTLOG_STRICT_INPUT") {
            self.strict_input = matches!(strict.trim(), "1" | "true" | "yes");
        }
        self
    }

    pub fn input_mode(&self) -> InputMode {
        if self.strict_input {
            InputMode::Strict
        } else {
            InputMode::Lenient
        }
    }

    /// Save the current configuration to the user's config directory.
    pub fn save(&self) -> Result<()> {
        let config_path = get_config_path()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&config_path, content).context("Failed to write config file")?;

        Ok(())
    }
}

pub fn get_config_path() -> Result<PathBuf> {
    let mut path =
        config_dir().ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    path.push(APP_NAME);
    path.push(CONFIG_FILE);
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "mail_to": "coach@example.com" }"#).unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.mail_to.as_deref(), Some("coach@example.com"));
        assert!(!config.strict_input);
        assert_eq!(config.input_mode(), InputMode::Lenient);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "not json").unwrap();

        assert!(AppConfig::load_from(&path).is_err());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("VAULTLOG_DATA_PATH", "/tmp/vault.db"),
            ("VAULTLOG_STRICT_INPUT", "true"),
            ("VAULTLOG_MAIL_TO", ""),
        ]
        .into_iter()
        .collect();

        let config = AppConfig {
            mail_to: Some("me@example.com".to_string()),
            ..AppConfig::default()
        }
        .with_env_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.data_path, Some(PathBuf::from("/tmp/vault.db")));
        assert_eq!(config.mail_to.as_deref(), Some("me@example.com"));
        assert_eq!(config.input_mode(), InputMode::Strict);
    }
}
