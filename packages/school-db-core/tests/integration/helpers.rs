//! Shared setup for store integration tests.

use tempfile::TempDir;

use school_db_core::{Connection, DbConfig, Params, SqliteConnection};

/// A freshly deployed database in a temporary directory.
pub struct TestDb {
    pub dir: TempDir,
    pub config: DbConfig,
    pub conn: SqliteConnection,
}

impl TestDb {
    pub fn new() -> anyhow::Result<Self> {
        let dir = tempfile::tempdir()?;
        let config = DbConfig {
            deploy_schema: true,
            ..DbConfig::for_path(dir.path().join("primary_school.db"))
        };
        let conn = SqliteConnection::open(&config)?;
        Ok(Self { dir, config, conn })
    }

    /// Opens a second connection to the same file.
    pub fn reconnect(&self) -> anyhow::Result<SqliteConnection> {
        Ok(SqliteConnection::open(&self.config)?)
    }
}

pub fn insert_teacher(conn: &impl Connection, first: &str, last: &str) -> i64 {
    conn.execute(
        "insert into ps.tTeacher(FirstName, LastName) values(@FirstName, @LastName);",
        &Params::new()
            .with("@FirstName", first)
            .with("@LastName", last),
    )
    .unwrap();
    conn.scalar(
        "select TeacherId from ps.tTeacher where FirstName = @FirstName and LastName = @LastName;",
        &Params::new()
            .with("@FirstName", first)
            .with("@LastName", last),
    )
    .unwrap()
    .and_then(|v| v.as_int())
    .unwrap()
}

pub fn insert_class(conn: &impl Connection, name: &str, level: &str, teacher_id: i64) -> i64 {
    conn.execute(
        "insert into ps.tClass(Name, Level, TeacherId) values(?1, ?2, ?3);",
        &Params::positional([
            school_db_core::Value::from(name),
            level.into(),
            teacher_id.into(),
        ]),
    )
    .unwrap();
    conn.scalar(
        "select ClassId from ps.tClass where Name = ?1;",
        &Params::positional([name]),
    )
    .unwrap()
    .and_then(|v| v.as_int())
    .unwrap()
}

pub fn teacher_count(conn: &impl Connection) -> i64 {
    conn.scalar(
        "select count(*) from ps.tTeacher where TeacherId <> 0;",
        &Params::new(),
    )
    .unwrap()
    .and_then(|v| v.as_int())
    .unwrap()
}
