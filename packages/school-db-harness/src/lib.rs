//! Fixture-verification harness for the primary school teacher schema.
//!
//! A scenario snapshots the teachers already in the store, creates a
//! uniquely named teacher through either the table or `ps.sTeacherCreate`,
//! checks that the new row is visible exactly once without disturbing any
//! pre-existing row (and that `ps.vTeacher` agrees), then removes it again.
//! Removal is tied to a guard so it also happens when a check fails.

pub mod config;
pub mod error;
pub mod fixture;
pub mod gateway;
pub mod names;
pub mod record;
pub mod scenario;
pub mod verify;

pub use config::HarnessConfig;
pub use error::{ErrorKind, HarnessError, VerificationFailure};
pub use fixture::TeacherFixture;
pub use gateway::{CreationPath, RemovalPath, TeacherGateway};
pub use names::{generate_unique_name, NameGenerator};
pub use record::{Teacher, TeacherId, TeacherViewRow};
pub use scenario::{run_all, run_with_config, Scenario, ScenarioReport};

/// Result type for harness operations
pub type Result<T> = std::result::Result<T, HarnessError>;
