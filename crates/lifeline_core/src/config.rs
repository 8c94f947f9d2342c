//! Environment-driven runtime configuration.
//!
//! # Responsibility
//! - Resolve database path, weather endpoint settings and log settings.
//! - Keep the weather API key out of source code.
//!
//! # Invariants
//! - Blank variables behave as unset.
//! - Malformed numeric values are rejected, never silently defaulted.

use crate::logging::{default_log_level, normalize_level};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_DB_PATH: &str = "LIFELINE_DB_PATH";
pub const ENV_WEATHER_API_KEY: &str = "LIFELINE_WEATHER_API_KEY";
pub const ENV_WEATHER_URL: &str = "LIFELINE_WEATHER_URL";
pub const ENV_WEATHER_TIMEOUT_SECS: &str = "LIFELINE_WEATHER_TIMEOUT_SECS";
pub const ENV_LOG_LEVEL: &str = "LIFELINE_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "LIFELINE_LOG_DIR";

pub const DEFAULT_DB_FILE_NAME: &str = "lifeline.sqlite3";
pub const DEFAULT_LOG_DIR_NAME: &str = "lifeline-logs";
pub const DEFAULT_WEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";
pub const DEFAULT_WEATHER_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration load errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidNumber { variable: &'static str, value: String },
    ZeroTimeout,
    InvalidLogLevel(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidNumber { variable, value } => {
                write!(f, "{variable} must be a positive integer, got `{value}`")
            }
            Self::ZeroTimeout => write!(f, "{ENV_WEATHER_TIMEOUT_SECS} must be greater than zero"),
            Self::InvalidLogLevel(value) => write!(
                f,
                "{ENV_LOG_LEVEL} must be one of trace|debug|info|warn|error, got `{value}`"
            ),
        }
    }
}

impl Error for ConfigError {}

/// Remote weather endpoint settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherConfig {
    pub base_url: String,
    /// `None` means every weather lookup fails with a missing-key error.
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_WEATHER_URL.to_string(),
            api_key: None,
            timeout: DEFAULT_WEATHER_TIMEOUT,
        }
    }
}

/// Fully resolved application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub weather: WeatherConfig,
    /// Canonical level name accepted by [`crate::logging::init_logging`].
    pub log_level: String,
    pub log_dir: PathBuf,
}

impl AppConfig {
    /// Resolves configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolves configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |name: &str| {
            lookup(name)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let db_path = read(ENV_DB_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME));

        let timeout = match read(ENV_WEATHER_TIMEOUT_SECS) {
            Some(raw) => {
                let secs = raw.parse::<u64>().map_err(|_| ConfigError::InvalidNumber {
                    variable: ENV_WEATHER_TIMEOUT_SECS,
                    value: raw.clone(),
                })?;
                if secs == 0 {
                    return Err(ConfigError::ZeroTimeout);
                }
                Duration::from_secs(secs)
            }
            None => DEFAULT_WEATHER_TIMEOUT,
        };

        let log_level = match read(ENV_LOG_LEVEL) {
            Some(raw) => normalize_level(&raw)
                .map_err(|_| ConfigError::InvalidLogLevel(raw.clone()))?
                .to_string(),
            None => default_log_level().to_string(),
        };

        Ok(Self {
            db_path,
            weather: WeatherConfig {
                base_url: read(ENV_WEATHER_URL).unwrap_or_else(|| DEFAULT_WEATHER_URL.to_string()),
                api_key: read(ENV_WEATHER_API_KEY),
                timeout,
            },
            log_level,
            log_dir: read(ENV_LOG_DIR)
                .map(PathBuf::from)
                .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_LOG_DIR_NAME)),
        })
    }
}
