//! Connection lifecycle and statement interface.

use ntest::timeout;

use school_db_core::{Connection, DbConfig, DbError, Params, SqliteConnection, Value};

use super::helpers::{insert_teacher, teacher_count, TestDb};

#[test]
#[timeout(5000)]
fn test_open_unreachable_path_fails_as_connection_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = DbConfig::for_path(dir.path().join("missing").join("nested").join("db.sqlite"));

    let err = SqliteConnection::open(&config).unwrap_err();
    assert!(err.is_connection_failure(), "unexpected error: {err}");
}

#[test]
#[timeout(5000)]
fn test_open_without_deploy_leaves_schema_absent() {
    let dir = tempfile::tempdir().unwrap();
    let conn = SqliteConnection::open(&DbConfig::for_path(dir.path().join("empty.db"))).unwrap();

    assert!(!conn.is_schema_deployed().unwrap());
    conn.deploy_schema().unwrap();
    assert!(conn.is_schema_deployed().unwrap());
}

#[test]
#[timeout(5000)]
fn test_execute_scalar_and_query() {
    let db = TestDb::new().unwrap();
    let id = insert_teacher(&db.conn, "Grace", "Hopper");
    assert!(id > 0);

    let first = db
        .conn
        .scalar(
            "select FirstName from ps.tTeacher where TeacherId = @TeacherId;",
            &Params::new().with("@TeacherId", id),
        )
        .unwrap();
    assert_eq!(first, Some(Value::from("Grace")));

    let rows = db
        .conn
        .query(
            "select TeacherId, FirstName, LastName from ps.tTeacher order by TeacherId;",
            &Params::new(),
        )
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].get_int("TeacherId").unwrap(), 0);
    assert_eq!(rows[1].get_text("LastName").unwrap(), "Hopper");

    let none = db
        .conn
        .scalar(
            "select TeacherId from ps.tTeacher where FirstName = ?1;",
            &Params::positional(["Nobody"]),
        )
        .unwrap();
    assert_eq!(none, None);
}

#[test]
#[timeout(5000)]
fn test_execute_reports_affected_rows() {
    let db = TestDb::new().unwrap();
    let id = insert_teacher(&db.conn, "Alan", "Turing");

    let deleted = db
        .conn
        .execute(
            "delete from ps.tTeacher where TeacherId = @TeacherId;",
            &Params::new().with("@TeacherId", id),
        )
        .unwrap();
    assert_eq!(deleted, 1);

    // Deleting a missing id is not an error.
    let deleted = db
        .conn
        .execute(
            "delete from ps.tTeacher where TeacherId = @TeacherId;",
            &Params::new().with("@TeacherId", id),
        )
        .unwrap();
    assert_eq!(deleted, 0);
}

#[test]
#[timeout(5000)]
fn test_statement_errors_are_reported() {
    let db = TestDb::new().unwrap();

    let err = db
        .conn
        .query("select * from ps.tNothing;", &Params::new())
        .unwrap_err();
    assert!(matches!(err, DbError::Statement { .. }));

    insert_teacher(&db.conn, "Ada", "Lovelace");
    let err = db
        .conn
        .execute(
            "insert into ps.tTeacher(FirstName, LastName) values(@FirstName, @LastName);",
            &Params::new()
                .with("@FirstName", "Ada")
                .with("@LastName", "Lovelace"),
        )
        .unwrap_err();
    assert!(matches!(err, DbError::Statement { ref reason, .. } if reason.contains("UNIQUE")));
    assert!(!err.is_connection_failure());
}

#[test]
#[timeout(5000)]
fn test_rows_visible_across_connections() {
    let db = TestDb::new().unwrap();
    let other = db.reconnect().unwrap();

    insert_teacher(&db.conn, "Edsger", "Dijkstra");
    assert_eq!(teacher_count(&other), 1);
}
