//! Store side of the primary school database.
//!
//! Provides the value and parameter model, the statement interface used by
//! clients, the `ps` schema, stored procedures, and a SQLite-backed
//! connection.

pub mod config;
pub mod connection;
pub mod error;
pub mod procedure;
pub mod schema;
pub mod sqlite;
pub mod value;

pub use config::DbConfig;
pub use connection::Connection;
pub use error::DbError;
pub use procedure::{ProcedureFn, ProcedureOutcome, ProcedureRegistry};
pub use sqlite::SqliteConnection;
pub use value::{Params, Row, Value};

/// Result type for store operations
pub type Result<T> = std::result::Result<T, DbError>;
