//! Engine configuration.
//!
//! # Responsibility
//! - Carry tunables the classifiers and resolution generator read.
//! - Load them from JSON supplied by the host application.
//!
//! # Invariants
//! - Every field has a default; an empty JSON object is a valid config.
//! - `validate()` must pass before a config reaches the engine.

use crate::model::event::DEFAULT_FAMILY_SENTINEL;
use crate::schedule::free_slot::DayWindow;
use crate::schedule::interval::parse_time_of_day;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const DEFAULT_TRAVEL_BUFFER_MINUTES: i64 = 20;
const DEFAULT_COST_THRESHOLD: f64 = 50.0;
const DEFAULT_DAY_START: &str = "07:00";
const DEFAULT_DAY_END: &str = "22:00";
const DEFAULT_SLOT_STEP_MINUTES: i64 = 15;
const MAX_SLOT_STEP_MINUTES: i64 = 24 * 60;

/// Tunables for one conflict service instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Minimum gap between two located events of one person.
    pub travel_buffer_minutes: i64,
    /// Person id meaning "whole family".
    pub family_sentinel: String,
    /// Costs strictly above this add one priority point.
    pub cost_threshold: f64,
    /// Earliest reschedule suggestion, `HH:MM`.
    pub day_start: String,
    /// Latest reschedule end, `HH:MM`.
    pub day_end: String,
    pub slot_step_minutes: i64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            travel_buffer_minutes: DEFAULT_TRAVEL_BUFFER_MINUTES,
            family_sentinel: DEFAULT_FAMILY_SENTINEL.to_string(),
            cost_threshold: DEFAULT_COST_THRESHOLD,
            day_start: DEFAULT_DAY_START.to_string(),
            day_end: DEFAULT_DAY_END.to_string(),
            slot_step_minutes: DEFAULT_SLOT_STEP_MINUTES,
        }
    }
}

impl EngineConfig {
    /// Parses and validates a JSON config document.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// Checks field ranges and returns the parsed day window.
    pub fn validate(&self) -> Result<DayWindow, ConfigError> {
        if self.travel_buffer_minutes < 0 {
            return Err(ConfigError::Invalid(format!(
                "travel_buffer_minutes must be >= 0, got {}",
                self.travel_buffer_minutes
            )));
        }
        if self.family_sentinel.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "family_sentinel must not be empty".to_string(),
            ));
        }
        if !self.cost_threshold.is_finite() {
            return Err(ConfigError::Invalid(
                "cost_threshold must be a finite number".to_string(),
            ));
        }
        if !(1..=MAX_SLOT_STEP_MINUTES).contains(&self.slot_step_minutes) {
            return Err(ConfigError::Invalid(format!(
                "slot_step_minutes must be in 1..={MAX_SLOT_STEP_MINUTES}, got {}",
                self.slot_step_minutes
            )));
        }
        self.day_window()
    }

    /// Parses `day_start`/`day_end` into a window; start must precede end.
    pub fn day_window(&self) -> Result<DayWindow, ConfigError> {
        let start = parse_time_of_day(&self.day_start).ok_or_else(|| {
            ConfigError::Invalid(format!("day_start `{}` is not HH:MM", self.day_start))
        })?;
        let end = parse_time_of_day(&self.day_end).ok_or_else(|| {
            ConfigError::Invalid(format!("day_end `{}` is not HH:MM", self.day_end))
        })?;
        if start >= end {
            return Err(ConfigError::Invalid(format!(
                "day_start `{}` must be earlier than day_end `{}`",
                self.day_start, self.day_end
            )));
        }
        Ok(DayWindow { start, end })
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(serde_json::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config JSON: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, EngineConfig};

    #[test]
    fn empty_object_yields_defaults() {
        let config = EngineConfig::from_json_str("{}").expect("empty config is valid");
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.travel_buffer_minutes, 20);
        assert_eq!(config.family_sentinel, "all");
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let config = EngineConfig::from_json_str(r#"{"travel_buffer_minutes": 30}"#)
            .expect("partial config is valid");
        assert_eq!(config.travel_buffer_minutes, 30);
        assert_eq!(config.slot_step_minutes, 15);
    }

    #[test]
    fn rejects_negative_buffer_and_inverted_window() {
        let err = EngineConfig::from_json_str(r#"{"travel_buffer_minutes": -1}"#)
            .expect_err("negative buffer must fail");
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = EngineConfig::from_json_str(r#"{"day_start": "20:00", "day_end": "08:00"}"#)
            .expect_err("inverted window must fail");
        assert!(err.to_string().contains("earlier than"));
    }

    #[test]
    fn rejects_blank_sentinel_and_zero_step() {
        assert!(EngineConfig::from_json_str(r#"{"family_sentinel": " "}"#).is_err());
        assert!(EngineConfig::from_json_str(r#"{"slot_step_minutes": 0}"#).is_err());
    }

    #[test]
    fn rejects_step_longer_than_a_day() {
        let err = EngineConfig::from_json_str(r#"{"slot_step_minutes": 9223372036854775807}"#)
            .expect_err("huge step must fail");
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(EngineConfig::from_json_str(r#"{"slot_step_minutes": 1441}"#).is_err());

        let config = EngineConfig::from_json_str(r#"{"slot_step_minutes": 1440}"#)
            .expect("one-day step is valid");
        assert_eq!(config.slot_step_minutes, 1440);
    }

    #[test]
    fn rejects_malformed_json() {
        let err = EngineConfig::from_json_str("{not json").expect_err("malformed must fail");
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
