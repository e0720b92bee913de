//! Database configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::DbError;

/// Environment variable naming the database file.
pub const ENV_DB_PATH: &str = "PRIMARY_SCHOOL_DB_PATH";
/// Environment variable overriding the busy timeout.
pub const ENV_BUSY_TIMEOUT_MS: &str = "PRIMARY_SCHOOL_DB_BUSY_TIMEOUT_MS";

/// Database configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DbConfig {
    /// Database file attached as the `ps` schema
    pub database_path: PathBuf,
    /// How long a statement waits on a locked database, in milliseconds
    pub busy_timeout_ms: u64,
    /// Deploy the schema right after connecting
    pub deploy_schema: bool,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("./primary_school.db"),
            busy_timeout_ms: 5000,
            deploy_schema: false,
        }
    }
}

impl DbConfig {
    /// Creates a configuration for the given database file.
    pub fn for_path(path: impl Into<PathBuf>) -> Self {
        Self {
            database_path: path.into(),
            ..Default::default()
        }
    }

    /// Builds a configuration from `PRIMARY_SCHOOL_DB_*` environment variables,
    /// falling back to defaults for unset ones.
    pub fn from_env() -> Result<Self, DbError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, DbError> {
        let mut config = Self::default();
        if let Some(path) = lookup(ENV_DB_PATH) {
            if path.trim().is_empty() {
                return Err(DbError::Config(format!("{ENV_DB_PATH} is empty")));
            }
            config.database_path = PathBuf::from(path);
        }
        if let Some(raw) = lookup(ENV_BUSY_TIMEOUT_MS) {
            config.busy_timeout_ms = raw.trim().parse().map_err(|_| {
                DbError::Config(format!(
                    "{ENV_BUSY_TIMEOUT_MS} must be a number of milliseconds, got '{raw}'"
                ))
            })?;
        }
        Ok(config)
    }

    /// Reads a configuration from a JSON file. Missing keys take defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, DbError> {
        let contents = std::fs::read_to_string(path)?;
        serde_json::from_str(&contents)
            .map_err(|e| DbError::Config(format!("{}: {e}", path.display())))
    }
}
