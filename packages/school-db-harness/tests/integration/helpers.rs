//! Shared setup for harness integration tests.

use tempfile::TempDir;
use tracing_subscriber::EnvFilter;

use school_db_core::{
    Connection, DbConfig, DbError, Params, ProcedureOutcome, Row, SqliteConnection, Value,
};
use school_db_harness::{Teacher, TeacherGateway};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A deployed database in a temporary directory, seeded with real teachers.
pub struct TestDb {
    pub dir: TempDir,
    pub config: DbConfig,
}

impl TestDb {
    pub fn new() -> anyhow::Result<Self> {
        init_tracing();
        let dir = tempfile::tempdir()?;
        let config = DbConfig {
            deploy_schema: true,
            ..DbConfig::for_path(dir.path().join("primary_school.db"))
        };
        let db = Self { dir, config };
        let gateway = db.gateway()?;
        for (first, last) in [("Alice", "Smith"), ("Bob", "Jones")] {
            gateway.create_direct(&Teacher::new(first, last))?;
        }
        Ok(db)
    }

    pub fn connect(&self) -> anyhow::Result<SqliteConnection> {
        Ok(SqliteConnection::open(&self.config)?)
    }

    pub fn gateway(&self) -> anyhow::Result<TeacherGateway<SqliteConnection>> {
        Ok(TeacherGateway::new(self.connect()?))
    }
}

pub fn seeded_teachers() -> Vec<Teacher> {
    vec![Teacher::new("Alice", "Smith"), Teacher::new("Bob", "Jones")]
}

/// Wraps a connection and hides every `ps.vTeacher` row.
pub struct EmptyView<C> {
    pub inner: C,
}

impl<C: Connection> Connection for EmptyView<C> {
    fn execute(&self, sql: &str, params: &Params) -> Result<usize, DbError> {
        self.inner.execute(sql, params)
    }

    fn scalar(&self, sql: &str, params: &Params) -> Result<Option<Value>, DbError> {
        self.inner.scalar(sql, params)
    }

    fn query(&self, sql: &str, params: &Params) -> Result<Vec<Row>, DbError> {
        if sql.contains("ps.vTeacher") {
            return Ok(Vec::new());
        }
        self.inner.query(sql, params)
    }

    fn call_procedure(&self, name: &str, params: &Params) -> Result<ProcedureOutcome, DbError> {
        self.inner.call_procedure(name, params)
    }
}

/// Wraps a connection and deletes `victim` whenever a teacher is inserted,
/// as if another client mutated pre-existing data mid-scenario.
pub struct LoseOnInsert<C> {
    pub inner: C,
    pub victim: Teacher,
}

impl<C: Connection> Connection for LoseOnInsert<C> {
    fn execute(&self, sql: &str, params: &Params) -> Result<usize, DbError> {
        let affected = self.inner.execute(sql, params)?;
        if sql.contains("insert into ps.tTeacher") {
            self.inner.execute(
                "delete from ps.tTeacher where FirstName = @FirstName and LastName = @LastName;",
                &Params::new()
                    .with("@FirstName", self.victim.first_name.as_str())
                    .with("@LastName", self.victim.last_name.as_str()),
            )?;
        }
        Ok(affected)
    }

    fn scalar(&self, sql: &str, params: &Params) -> Result<Option<Value>, DbError> {
        self.inner.scalar(sql, params)
    }

    fn query(&self, sql: &str, params: &Params) -> Result<Vec<Row>, DbError> {
        self.inner.query(sql, params)
    }

    fn call_procedure(&self, name: &str, params: &Params) -> Result<ProcedureOutcome, DbError> {
        self.inner.call_procedure(name, params)
    }
}
