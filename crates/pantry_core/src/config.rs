//! Runtime configuration for a pantry session.
//!
//! # Responsibility
//! - Hold alert thresholds, search debounce and form defaults.
//! - Load and validate JSON configuration files.
//!
//! # Invariants
//! - Every field has a default; an empty JSON object is a valid config.
//! - A config returned by `load`/`from_json_str` has passed `validate()`.

use crate::alerts::AlertPolicy;
use crate::logging::LoggingConfig;
use crate::model::item::NOTES_PLACEHOLDER;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::time::Duration;

/// Configuration load/validation failure.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read config: {err}"),
            Self::Parse(err) => write!(f, "failed to parse config: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Top-level pantry configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PantryConfig {
    pub alerts: AlertPolicy,
    /// Quiet period before search-as-you-type recomputes the visible list.
    pub search_debounce_ms: u64,
    /// Text stored in `notes` when the user leaves them blank.
    pub notes_placeholder: String,
    pub logging: LoggingConfig,
}

impl Default for PantryConfig {
    fn default() -> Self {
        Self {
            alerts: AlertPolicy::default(),
            search_debounce_ms: 300,
            notes_placeholder: NOTES_PLACEHOLDER.to_string(),
            logging: LoggingConfig::default(),
        }
    }
}

impl PantryConfig {
    /// Parses and validates a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.notes_placeholder.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "notes_placeholder cannot be blank".to_string(),
            ));
        }
        if !(self.alerts.low_stock_below.is_finite() && self.alerts.low_stock_below > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "alerts.low_stock_below must be a positive number, got {}",
                self.alerts.low_stock_below
            )));
        }
        if self.alerts.expiring_within_days < 0 {
            return Err(ConfigError::Invalid(format!(
                "alerts.expiring_within_days cannot be negative, got {}",
                self.alerts.expiring_within_days
            )));
        }
        Ok(())
    }
}
