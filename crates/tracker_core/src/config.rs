//! Runtime configuration resolved from environment variables.
//!
//! # Responsibility
//! - Resolve database path, log settings and poll interval in one place.
//! - Reject malformed values up front instead of at first use.
//!
//! # Invariants
//! - Blank variables behave as if unset.
//! - `poll_interval` is never zero.

use crate::logging::{default_log_level, normalize_level};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;

pub const DB_PATH_ENV: &str = "TRACKER_DB_PATH";
pub const LOG_DIR_ENV: &str = "TRACKER_LOG_DIR";
pub const LOG_LEVEL_ENV: &str = "TRACKER_LOG_LEVEL";
pub const POLL_INTERVAL_ENV: &str = "TRACKER_POLL_INTERVAL_SECS";

const DEFAULT_DB_FILE_NAME: &str = "tracker.sqlite3";
/// Notification refresh period.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidLogLevel(String),
    InvalidPollInterval(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLogLevel(message) => write!(f, "{LOG_LEVEL_ENV}: {message}"),
            Self::InvalidPollInterval(value) => write!(
                f,
                "{POLL_INTERVAL_ENV} must be a positive number of seconds, got `{value}`"
            ),
        }
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    pub db_path: PathBuf,
    /// File logging is disabled when unset.
    pub log_dir: Option<PathBuf>,
    pub log_level: &'static str,
    pub poll_interval: Duration,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            log_dir: None,
            log_level: default_log_level(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl TrackerConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, which maps a variable name to
    /// its raw value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let mut config = Self::default();

        if let Some(path) = read(DB_PATH_ENV) {
            config.db_path = PathBuf::from(path);
        }
        config.log_dir = read(LOG_DIR_ENV).map(PathBuf::from);
        if let Some(level) = read(LOG_LEVEL_ENV) {
            config.log_level = normalize_level(&level).map_err(ConfigError::InvalidLogLevel)?;
        }
        if let Some(raw) = read(POLL_INTERVAL_ENV) {
            config.poll_interval = match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => return Err(ConfigError::InvalidPollInterval(raw)),
            };
        }

        Ok(config)
    }
}
