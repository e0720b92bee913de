//! Database error types.

use thiserror::Error;

/// Database operation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DbError {
    /// The database could not be opened or attached
    #[error("Cannot connect to '{target}': {reason}")]
    ConnectionFailed { target: String, reason: String },

    /// A statement failed to prepare or execute
    #[error("Statement failed: {reason} (sql: {sql})")]
    Statement { sql: String, reason: String },

    /// Procedure not registered
    #[error("Procedure '{name}' not found")]
    ProcedureNotFound { name: String },

    /// Required procedure parameter absent
    #[error("Procedure '{procedure}' requires parameter '{param}'")]
    MissingParameter { procedure: String, param: String },

    /// Column not present in a result row
    #[error("Column '{column}' not found in row")]
    ColumnNotFound { column: String },

    /// Type mismatch error
    #[error("Type mismatch: expected {expected}, got {got}")]
    TypeMismatch { expected: String, got: String },

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error while reading configuration or database files
    #[error("I/O error: {0}")]
    IoError(String),
}

impl DbError {
    /// Wraps a SQLite error raised while running `sql`.
    pub(crate) fn statement(sql: &str, err: rusqlite::Error) -> Self {
        DbError::Statement {
            sql: sql.trim().to_string(),
            reason: err.to_string(),
        }
    }

    /// Whether this error came from failing to reach the store at all.
    pub fn is_connection_failure(&self) -> bool {
        matches!(self, DbError::ConnectionFailed { .. })
    }
}

impl From<std::io::Error> for DbError {
    fn from(err: std::io::Error) -> Self {
        DbError::IoError(err.to_string())
    }
}
