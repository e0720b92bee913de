//! Checks over snapshots and view rows.
//!
//! Pure functions; the scenario runner feeds them what it read from the store.

use std::collections::HashMap;

use crate::error::VerificationFailure;
use crate::names::NameGenerator;
use crate::record::{Teacher, TeacherId, TeacherViewRow};

fn counts(records: &[Teacher]) -> HashMap<&Teacher, usize> {
    let mut counts = HashMap::with_capacity(records.len());
    for record in records {
        *counts.entry(record).or_insert(0) += 1;
    }
    counts
}

/// The intersection of `after` with `baseline` must be `baseline` itself:
/// every pre-existing teacher is still there, as many times as before.
pub fn baseline_preserved(baseline: &[Teacher], after: &[Teacher]) -> Result<(), VerificationFailure> {
    let mut available = counts(after);
    let mut missing = Vec::new();
    for teacher in baseline {
        match available.get_mut(teacher) {
            Some(n) if *n > 0 => *n -= 1,
            _ => missing.push(teacher.clone()),
        }
    }
    if missing.is_empty() {
        Ok(())
    } else {
        Err(VerificationFailure::BaselineChanged { missing })
    }
}

/// `teacher` must appear exactly once in `records`.
pub fn contains_exactly_once(records: &[Teacher], teacher: &Teacher) -> Result<(), VerificationFailure> {
    match records.iter().filter(|r| *r == teacher).count() {
        1 => Ok(()),
        0 => Err(VerificationFailure::FixtureMissing {
            teacher: teacher.clone(),
        }),
        count => Err(VerificationFailure::FixtureDuplicated {
            teacher: teacher.clone(),
            count,
        }),
    }
}

/// `teacher` must be gone from `records`.
pub fn fixture_absent(records: &[Teacher], teacher: &Teacher) -> Result<(), VerificationFailure> {
    if records.contains(teacher) {
        Err(VerificationFailure::FixtureLeaked {
            teacher: teacher.clone(),
        })
    } else {
        Ok(())
    }
}

/// The view must show exactly one row for `teacher_id`, with the fixture's
/// names and no class assigned.
pub fn view_matches(
    rows: &[TeacherViewRow],
    teacher_id: TeacherId,
    teacher: &Teacher,
) -> Result<(), VerificationFailure> {
    let [row] = rows else {
        return Err(VerificationFailure::ViewRowCount {
            teacher_id,
            count: rows.len(),
        });
    };
    let expected = TeacherViewRow::unassigned(teacher_id, teacher);
    if *row == expected {
        Ok(())
    } else {
        Err(VerificationFailure::ViewMismatch {
            expected,
            actual: row.clone(),
        })
    }
}

/// Drops rows that other harness runs created, keeping `own`.
///
/// Concurrent scenarios add and remove their own fixtures between our
/// snapshots; those rows are not pre-existing data.
pub fn without_foreign_fixtures(
    records: &[Teacher],
    names: &NameGenerator,
    own: &Teacher,
) -> Vec<Teacher> {
    records
        .iter()
        .filter(|r| {
            *r == own || !(names.is_generated(&r.first_name) && names.is_generated(&r.last_name))
        })
        .cloned()
        .collect()
}
