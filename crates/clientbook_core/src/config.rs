//! Runtime configuration loaded from the environment.
//!
//! # Responsibility
//! - Resolve the database location and logging settings.
//! - Keep credentials and paths out of source code.
//!
//! # Invariants
//! - Unset variables fall back to defaults; set-but-invalid values are errors.
//! - The log level is validated even when file logging stays off.

use crate::logging::{default_log_level, parse_level, LogConfig};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const ENV_DB_PATH: &str = "CLIENTBOOK_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "CLIENTBOOK_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "CLIENTBOOK_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "clientbook.sqlite3";
const IN_MEMORY_MARKER: &str = ":memory:";

/// Where the client directory lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbLocation {
    File(PathBuf),
    InMemory,
}

/// Resolved application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db: DbLocation,
    /// `None` when `CLIENTBOOK_LOG_DIR` is unset: logging stays off.
    pub log: Option<LogConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Blank { key: &'static str },
    InvalidLogLevel(String),
    RelativeLogDir(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Blank { key } => write!(f, "`{key}` is set but empty"),
            Self::InvalidLogLevel(message) => write!(f, "`{ENV_LOG_LEVEL}`: {message}"),
            Self::RelativeLogDir(value) => {
                write!(f, "`{ENV_LOG_DIR}` must be an absolute path, got `{value}`")
            }
        }
    }
}

impl Error for ConfigError {}

impl AppConfig {
    /// Reads configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let db = match lookup(ENV_DB_PATH) {
            None => DbLocation::File(PathBuf::from(DEFAULT_DB_FILE_NAME)),
            Some(value) => {
                let trimmed = non_blank(ENV_DB_PATH, &value)?;
                if trimmed == IN_MEMORY_MARKER {
                    DbLocation::InMemory
                } else {
                    DbLocation::File(PathBuf::from(trimmed))
                }
            }
        };

        let level = match lookup(ENV_LOG_LEVEL) {
            None => default_log_level(),
            Some(value) => parse_level(non_blank(ENV_LOG_LEVEL, &value)?)
                .map_err(ConfigError::InvalidLogLevel)?,
        };

        let log = match lookup(ENV_LOG_DIR) {
            None => None,
            Some(value) => {
                let trimmed = non_blank(ENV_LOG_DIR, &value)?;
                let dir = Path::new(trimmed);
                if !dir.is_absolute() {
                    return Err(ConfigError::RelativeLogDir(trimmed.to_string()));
                }
                Some(LogConfig {
                    level,
                    dir: dir.to_path_buf(),
                })
            }
        };

        Ok(Self { db, log })
    }
}

fn non_blank<'a>(key: &'static str, value: &'a str) -> Result<&'a str, ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Blank { key });
    }
    Ok(trimmed)
}
