//! SQLite-backed connection.
//!
//! The configured database file is attached as the `ps` schema of an
//! in-memory main database, so statements address objects as `ps.tTeacher`
//! and so on. Procedures run from the [`ProcedureRegistry`] inside an
//! immediate transaction.

use std::fmt;
use std::time::Duration;

use rusqlite::types::ToSql;
use rusqlite::{params_from_iter, Statement, TransactionBehavior};
use tracing::{debug, info};

use crate::config::DbConfig;
use crate::connection::Connection;
use crate::error::DbError;
use crate::procedure::{ProcedureOutcome, ProcedureRegistry};
use crate::schema;
use crate::value::{Params, Row, Value};

/// A connection to a school database file.
pub struct SqliteConnection {
    conn: rusqlite::Connection,
    registry: ProcedureRegistry,
    target: String,
}

impl fmt::Debug for SqliteConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteConnection")
            .field("target", &self.target)
            .field("procedures", &self.registry.names())
            .finish()
    }
}

impl SqliteConnection {
    /// Opens the configured database with the school procedures registered.
    ///
    /// Deploys the schema first when `config.deploy_schema` is set.
    pub fn open(config: &DbConfig) -> Result<Self, DbError> {
        Self::open_with_registry(config, ProcedureRegistry::with_school_procedures())
    }

    /// Opens the configured database with a caller-supplied procedure registry.
    pub fn open_with_registry(
        config: &DbConfig,
        registry: ProcedureRegistry,
    ) -> Result<Self, DbError> {
        let target = config.database_path.display().to_string();
        let connection_failed = |e: rusqlite::Error| DbError::ConnectionFailed {
            target: target.clone(),
            reason: e.to_string(),
        };

        let conn = rusqlite::Connection::open_in_memory().map_err(connection_failed)?;
        conn.busy_timeout(Duration::from_millis(config.busy_timeout_ms))
            .map_err(connection_failed)?;
        conn.execute(
            &format!("attach database ?1 as {};", schema::SCHEMA),
            [target.as_str()],
        )
        .map_err(connection_failed)?;
        // Attaching is lazy; touching the schema forces the file open.
        conn.query_row("select count(*) from ps.sqlite_master;", [], |row| {
            row.get::<_, i64>(0)
        })
        .map_err(connection_failed)?;
        conn.pragma_update(None, "foreign_keys", true)
            .map_err(connection_failed)?;

        info!(database = %target, "connected");
        let connection = Self {
            conn,
            registry,
            target,
        };
        if config.deploy_schema {
            connection.deploy_schema()?;
        }
        Ok(connection)
    }

    /// Path of the attached database file.
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn registry(&self) -> &ProcedureRegistry {
        &self.registry
    }

    /// Creates the `ps` tables, view, and sentinel rows if missing.
    pub fn deploy_schema(&self) -> Result<(), DbError> {
        self.conn
            .execute_batch(schema::DDL)
            .map_err(|e| DbError::statement("<schema ddl>", e))?;
        info!(database = %self.target, "schema deployed");
        Ok(())
    }

    /// Whether the `ps` tables and view all exist.
    pub fn is_schema_deployed(&self) -> Result<bool, DbError> {
        let found = self
            .scalar(schema::COUNT_OBJECTS_SQL, &Params::new())?
            .and_then(|v| v.as_int())
            .unwrap_or(0);
        Ok(found == schema::REQUIRED_OBJECTS.len() as i64)
    }

    fn prepare(&self, sql: &str) -> Result<rusqlite::CachedStatement<'_>, DbError> {
        self.conn
            .prepare_cached(sql.trim())
            .map_err(|e| DbError::statement(sql, e))
    }
}

fn named_refs(pairs: &[(String, Value)]) -> Vec<(&str, &dyn ToSql)> {
    pairs
        .iter()
        .map(|(name, value)| (name.as_str(), value as &dyn ToSql))
        .collect()
}

fn column_names(stmt: &Statement<'_>) -> Vec<String> {
    stmt.column_names().into_iter().map(String::from).collect()
}

fn collect_rows(mut rows: rusqlite::Rows<'_>, columns: &[String]) -> rusqlite::Result<Vec<Row>> {
    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        let values = (0..columns.len())
            .map(|i| row.get::<_, Value>(i))
            .collect::<rusqlite::Result<Vec<_>>>()?;
        out.push(Row::new(columns.to_vec(), values));
    }
    Ok(out)
}

impl Connection for SqliteConnection {
    fn execute(&self, sql: &str, params: &Params) -> Result<usize, DbError> {
        debug!(sql = sql.trim(), params = params.len(), "execute");
        let mut stmt = self.prepare(sql)?;
        let result = match params {
            Params::Named(pairs) => stmt.execute(named_refs(pairs).as_slice()),
            Params::Positional(values) => stmt.execute(params_from_iter(values.iter())),
        };
        result.map_err(|e| DbError::statement(sql, e))
    }

    fn scalar(&self, sql: &str, params: &Params) -> Result<Option<Value>, DbError> {
        Ok(self
            .query(sql, params)?
            .into_iter()
            .next()
            .and_then(|row| row.values().first().cloned()))
    }

    fn query(&self, sql: &str, params: &Params) -> Result<Vec<Row>, DbError> {
        debug!(sql = sql.trim(), params = params.len(), "query");
        let mut stmt = self.prepare(sql)?;
        let columns = column_names(&stmt);
        let result = match params {
            Params::Named(pairs) => {
                let refs = named_refs(pairs);
                stmt.query(refs.as_slice())
                    .and_then(|rows| collect_rows(rows, &columns))
            }
            Params::Positional(values) => stmt
                .query(params_from_iter(values.iter()))
                .and_then(|rows| collect_rows(rows, &columns)),
        };
        result.map_err(|e| DbError::statement(sql, e))
    }

    fn call_procedure(&self, name: &str, params: &Params) -> Result<ProcedureOutcome, DbError> {
        let func = self.registry.resolve(name, params)?;
        debug!(procedure = name, params = params.len(), "call procedure");

        let tx = rusqlite::Transaction::new_unchecked(&self.conn, TransactionBehavior::Immediate)
            .map_err(|e| DbError::statement(&format!("begin immediate /* {name} */"), e))?;
        // Dropping `tx` on the error path rolls it back.
        let outcome = func(&tx, params)?;
        tx.commit()
            .map_err(|e| DbError::statement(&format!("commit /* {name} */"), e))?;

        debug!(procedure = name, return_code = outcome.return_code, "procedure returned");
        Ok(outcome)
    }
}
