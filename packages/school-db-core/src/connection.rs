//! Statement interface shared by every store backend.

use crate::error::DbError;
use crate::procedure::ProcedureOutcome;
use crate::value::{Params, Row, Value};

/// A live connection to the school database.
///
/// Statements are issued one at a time and each completes before the next
/// starts. Methods take `&self` so that a fixture guard can keep a shared
/// borrow of the connection while the caller continues to run statements.
pub trait Connection {
    /// Runs a statement that returns no rows and reports the affected row count.
    fn execute(&self, sql: &str, params: &Params) -> Result<usize, DbError>;

    /// Runs a query and returns the first column of the first row, if any.
    fn scalar(&self, sql: &str, params: &Params) -> Result<Option<Value>, DbError>;

    /// Runs a query and returns every row.
    fn query(&self, sql: &str, params: &Params) -> Result<Vec<Row>, DbError>;

    /// Invokes a stored procedure by name.
    fn call_procedure(&self, name: &str, params: &Params) -> Result<ProcedureOutcome, DbError>;
}

impl<C: Connection + ?Sized> Connection for &C {
    fn execute(&self, sql: &str, params: &Params) -> Result<usize, DbError> {
        (**self).execute(sql, params)
    }

    fn scalar(&self, sql: &str, params: &Params) -> Result<Option<Value>, DbError> {
        (**self).scalar(sql, params)
    }

    fn query(&self, sql: &str, params: &Params) -> Result<Vec<Row>, DbError> {
        (**self).query(sql, params)
    }

    fn call_procedure(&self, name: &str, params: &Params) -> Result<ProcedureOutcome, DbError> {
        (**self).call_procedure(name, params)
    }
}
