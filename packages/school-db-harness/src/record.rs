//! Teacher records as seen through the table and the view.

use std::fmt;

use serde::{Deserialize, Serialize};

use school_db_core::schema::UNASSIGNED_ID;
use school_db_core::{DbError, Row};

/// Store-assigned teacher identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeacherId(pub i64);

impl TeacherId {
    /// The reserved "no teacher assigned" row. Never a fixture.
    pub const UNASSIGNED: TeacherId = TeacherId(UNASSIGNED_ID);

    pub fn get(self) -> i64 {
        self.0
    }

    pub fn is_unassigned(self) -> bool {
        self == Self::UNASSIGNED
    }
}

impl fmt::Display for TeacherId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A teacher compared by name only.
///
/// The identifier is left out so a generated fixture can be matched against
/// snapshots taken before the store assigned it one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Teacher {
    pub first_name: String,
    pub last_name: String,
}

impl Teacher {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    pub(crate) fn from_row(row: &Row) -> Result<Self, DbError> {
        Ok(Self::new(row.get_text("FirstName")?, row.get_text("LastName")?))
    }
}

impl fmt::Display for Teacher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.first_name, self.last_name)
    }
}

/// One row of `ps.vTeacher`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeacherViewRow {
    pub teacher_id: TeacherId,
    pub first_name: String,
    pub last_name: String,
    pub class_id: i64,
    pub class_name: String,
    pub class_level: String,
}

impl TeacherViewRow {
    /// The row the view should show for a teacher with no class.
    pub fn unassigned(teacher_id: TeacherId, teacher: &Teacher) -> Self {
        Self {
            teacher_id,
            first_name: teacher.first_name.clone(),
            last_name: teacher.last_name.clone(),
            class_id: UNASSIGNED_ID,
            class_name: String::new(),
            class_level: String::new(),
        }
    }

    pub(crate) fn from_row(row: &Row) -> Result<Self, DbError> {
        Ok(Self {
            teacher_id: TeacherId(row.get_int("TeacherId")?),
            first_name: row.get_text("FirstName")?.to_string(),
            last_name: row.get_text("LastName")?.to_string(),
            class_id: row.get_int("ClassId")?,
            class_name: row.get_text("ClassName")?.to_string(),
            class_level: row.get_text("ClassLevel")?.to_string(),
        })
    }

    pub fn teacher(&self) -> Teacher {
        Teacher::new(self.first_name.clone(), self.last_name.clone())
    }

    pub fn has_class(&self) -> bool {
        self.class_id != UNASSIGNED_ID
    }
}
