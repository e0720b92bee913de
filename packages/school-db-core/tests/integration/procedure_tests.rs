//! Teacher procedures.

use ntest::timeout;

use school_db_core::procedure::{TEACHER_CREATE, TEACHER_DESTROY};
use school_db_core::{Connection, DbError, Params, Value};

use super::helpers::{insert_class, insert_teacher, teacher_count, TestDb};

fn create(conn: &impl Connection, first: &str, last: &str) -> school_db_core::ProcedureOutcome {
    conn.call_procedure(
        TEACHER_CREATE,
        &Params::new()
            .with("@FirstName", first)
            .with("@LastName", last),
    )
    .unwrap()
}

#[test]
#[timeout(5000)]
fn test_create_returns_id_and_success() {
    let db = TestDb::new().unwrap();

    let outcome = create(&db.conn, "Margaret", "Hamilton");
    assert!(outcome.is_success());
    let id = outcome
        .get_output("@TeacherId")
        .and_then(Value::as_int)
        .unwrap();

    let last = db
        .conn
        .scalar(
            "select LastName from ps.tTeacher where TeacherId = ?1;",
            &Params::positional([id]),
        )
        .unwrap();
    assert_eq!(last, Some(Value::from("Hamilton")));
}

#[test]
#[timeout(5000)]
fn test_create_refuses_duplicate_names() {
    let db = TestDb::new().unwrap();
    insert_teacher(&db.conn, "Ken", "Thompson");

    let outcome = create(&db.conn, "Ken", "Thompson");
    assert_eq!(outcome.return_code, 1);
    assert!(outcome.get_output("@TeacherId").is_none());
    assert_eq!(teacher_count(&db.conn), 1);
}

#[test]
#[timeout(5000)]
fn test_create_rejects_missing_parameter() {
    let db = TestDb::new().unwrap();
    let err = db
        .conn
        .call_procedure(TEACHER_CREATE, &Params::new().with("@FirstName", "Solo"))
        .unwrap_err();
    assert!(matches!(err, DbError::MissingParameter { ref param, .. } if param == "@LastName"));
    assert_eq!(teacher_count(&db.conn), 0);
}

#[test]
#[timeout(5000)]
fn test_destroy_removes_teacher_and_frees_class() {
    let db = TestDb::new().unwrap();
    let id = insert_teacher(&db.conn, "Dennis", "Ritchie");
    let class_id = insert_class(&db.conn, "Foxes", "CM2", id);

    let outcome = db
        .conn
        .call_procedure(TEACHER_DESTROY, &Params::new().with("@TeacherId", id))
        .unwrap();
    assert!(outcome.is_success());
    assert_eq!(teacher_count(&db.conn), 0);

    let owner = db
        .conn
        .scalar(
            "select TeacherId from ps.tClass where ClassId = ?1;",
            &Params::positional([class_id]),
        )
        .unwrap();
    assert_eq!(owner, Some(Value::Int(0)));
}

#[test]
#[timeout(5000)]
fn test_destroy_missing_id_is_not_validated() {
    let db = TestDb::new().unwrap();
    let outcome = db
        .conn
        .call_procedure(TEACHER_DESTROY, &Params::new().with("@TeacherId", 12345))
        .unwrap();
    assert!(outcome.is_success());
}

#[test]
#[timeout(5000)]
fn test_destroy_refuses_sentinel() {
    let db = TestDb::new().unwrap();
    let outcome = db
        .conn
        .call_procedure(TEACHER_DESTROY, &Params::new().with("@TeacherId", 0))
        .unwrap();
    assert_eq!(outcome.return_code, 1);

    let sentinel = db
        .conn
        .scalar(
            "select count(*) from ps.tTeacher where TeacherId = 0;",
            &Params::new(),
        )
        .unwrap();
    assert_eq!(sentinel, Some(Value::Int(1)));
}

#[test]
#[timeout(5000)]
fn test_unknown_procedure() {
    let db = TestDb::new().unwrap();
    let err = db
        .conn
        .call_procedure("ps.sClassCreate", &Params::new())
        .unwrap_err();
    assert!(matches!(err, DbError::ProcedureNotFound { .. }));
}
