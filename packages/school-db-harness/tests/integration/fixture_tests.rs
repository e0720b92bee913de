//! Fixture cleanup on every exit path.

use std::panic::{catch_unwind, AssertUnwindSafe};

use ntest::timeout;

use school_db_harness::{
    generate_unique_name, CreationPath, HarnessError, RemovalPath, Teacher, TeacherFixture,
    VerificationFailure,
};

use super::helpers::{seeded_teachers, TestDb};

fn fresh_teacher() -> Teacher {
    Teacher::new(generate_unique_name(), generate_unique_name())
}

#[test]
#[timeout(5000)]
fn test_release_removes_fixture() {
    let db = TestDb::new().unwrap();
    let gateway = db.gateway().unwrap();

    for removal in [RemovalPath::Direct, RemovalPath::Procedure] {
        let teacher = fresh_teacher();
        let fixture =
            TeacherFixture::create(&gateway, teacher.clone(), CreationPath::Direct, removal)
                .unwrap();
        assert_eq!(fixture.teacher(), &teacher);
        assert!(gateway.snapshot().unwrap().contains(&teacher));

        fixture.release().unwrap();
        assert_eq!(gateway.snapshot().unwrap(), seeded_teachers());
    }
}

#[test]
#[timeout(5000)]
fn test_early_return_still_removes_fixture() {
    let db = TestDb::new().unwrap();
    let gateway = db.gateway().unwrap();
    let teacher = fresh_teacher();

    let failing_check = || -> Result<(), HarnessError> {
        let fixture = TeacherFixture::create(
            &gateway,
            teacher.clone(),
            CreationPath::Procedure,
            RemovalPath::Procedure,
        )?;
        if !fixture.id().is_unassigned() {
            return Err(VerificationFailure::FixtureMissing {
                teacher: fixture.teacher().clone(),
            }
            .into());
        }
        fixture.release()
    };

    assert!(matches!(
        failing_check(),
        Err(HarnessError::Verification(_))
    ));
    assert_eq!(gateway.snapshot().unwrap(), seeded_teachers());
}

#[test]
#[timeout(5000)]
fn test_panic_still_removes_fixture() {
    let db = TestDb::new().unwrap();
    let gateway = db.gateway().unwrap();
    let teacher = fresh_teacher();

    let outcome = catch_unwind(AssertUnwindSafe(|| {
        let _fixture = TeacherFixture::create(
            &gateway,
            teacher.clone(),
            CreationPath::Direct,
            RemovalPath::Direct,
        )
        .unwrap();
        panic!("assertion failing mid-scenario");
    }));

    assert!(outcome.is_err());
    let snapshot = gateway.snapshot().unwrap();
    assert!(!snapshot.contains(&teacher));
    assert_eq!(snapshot, seeded_teachers());
}

#[test]
#[timeout(5000)]
fn test_failed_creation_leaves_nothing_behind() {
    let db = TestDb::new().unwrap();
    let gateway = db.gateway().unwrap();

    let result = TeacherFixture::create(
        &gateway,
        Teacher::new("Alice", "Smith"),
        CreationPath::Procedure,
        RemovalPath::Procedure,
    );
    assert!(matches!(
        result,
        Err(HarnessError::UnexpectedStatus { code: 1, .. })
    ));
    assert_eq!(gateway.snapshot().unwrap(), seeded_teachers());
}
