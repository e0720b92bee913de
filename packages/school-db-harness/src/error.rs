//! Harness error types.

use thiserror::Error;

use school_db_core::DbError;

use crate::record::{Teacher, TeacherId, TeacherViewRow};

/// A check that did not hold.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerificationFailure {
    /// Pre-existing teachers disappeared or changed after the fixture was created
    #[error("{} pre-existing teacher(s) missing after creation: {}", .missing.len(), list(.missing))]
    BaselineChanged { missing: Vec<Teacher> },

    /// The fixture is not in the post-creation snapshot
    #[error("teacher {teacher} not found in snapshot")]
    FixtureMissing { teacher: Teacher },

    /// The fixture appears more than once
    #[error("teacher {teacher} appears {count} times in snapshot")]
    FixtureDuplicated { teacher: Teacher, count: usize },

    /// The fixture is still present after removal
    #[error("teacher {teacher} still present after removal")]
    FixtureLeaked { teacher: Teacher },

    /// The view returned other than one row for the fixture
    #[error("view returned {count} row(s) for teacher {teacher_id}, expected 1")]
    ViewRowCount { teacher_id: TeacherId, count: usize },

    /// The view row disagrees with the table or carries a class assignment
    #[error("view row {actual:?} does not match expected {expected:?}")]
    ViewMismatch {
        expected: TeacherViewRow,
        actual: TeacherViewRow,
    },
}

fn list(teachers: &[Teacher]) -> String {
    teachers
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Harness operation errors.
#[derive(Error, Debug)]
pub enum HarnessError {
    /// Connection or statement failure reported by the store
    #[error(transparent)]
    Db(#[from] DbError),

    /// A verification check failed
    #[error("Verification failed: {0}")]
    Verification(#[from] VerificationFailure),

    /// A procedure returned a status other than success
    #[error("Procedure '{procedure}' returned status {code}, expected 0")]
    UnexpectedStatus { procedure: String, code: i64 },

    /// A procedure did not set an expected output parameter
    #[error("Procedure '{procedure}' did not set output '{output}'")]
    MissingOutput { procedure: String, output: String },

    /// The row just inserted could not be looked up again
    #[error("Teacher {teacher} not found right after insert")]
    CreatedRowNotFound { teacher: Teacher },

    /// Invalid harness configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Coarse classification used when reporting a failed scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Connection,
    Statement,
    Verification,
    Configuration,
}

impl HarnessError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            HarnessError::Db(e) if e.is_connection_failure() => ErrorKind::Connection,
            HarnessError::Db(DbError::Config(_)) | HarnessError::Config(_) => {
                ErrorKind::Configuration
            }
            HarnessError::Db(_)
            | HarnessError::MissingOutput { .. }
            | HarnessError::CreatedRowNotFound { .. } => ErrorKind::Statement,
            HarnessError::Verification(_) | HarnessError::UnexpectedStatus { .. } => {
                ErrorKind::Verification
            }
        }
    }
}
