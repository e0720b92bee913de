//! Teacher operations against the store, through the table, the view, and
//! the procedures.

use serde::{Deserialize, Serialize};
use tracing::debug;

use school_db_core::procedure::{TEACHER_CREATE, TEACHER_DESTROY};
use school_db_core::{Connection, DbError, Params};

use crate::error::HarnessError;
use crate::record::{Teacher, TeacherId, TeacherViewRow};
use crate::verify;

const SELECT_TEACHERS: &str = "select t.FirstName, t.LastName \
     from ps.tTeacher t \
     where t.TeacherId <> @UnassignedId \
     order by t.TeacherId;";

const INSERT_TEACHER: &str =
    "insert into ps.tTeacher(FirstName, LastName) values(@FirstName, @LastName);";

const SELECT_TEACHER_ID: &str = "select t.TeacherId \
     from ps.tTeacher t \
     where t.FirstName = @FirstName and t.LastName = @LastName;";

const DELETE_TEACHER: &str = "delete from ps.tTeacher where TeacherId = @TeacherId;";

const SELECT_VIEW_ROWS: &str = "select v.TeacherId, v.FirstName, v.LastName, \
            v.ClassId, v.ClassName, v.ClassLevel \
     from ps.vTeacher v \
     where v.TeacherId = @TeacherId;";

/// How a fixture teacher gets into the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreationPath {
    /// Insert into `ps.tTeacher`, then look the id up by name
    Direct,
    /// Call `ps.sTeacherCreate`
    Procedure,
}

/// How a fixture teacher is taken out again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalPath {
    /// Delete from `ps.tTeacher`
    Direct,
    /// Call `ps.sTeacherDestroy`
    Procedure,
}

fn name_params(teacher: &Teacher) -> Params {
    Params::new()
        .with("@FirstName", teacher.first_name.as_str())
        .with("@LastName", teacher.last_name.as_str())
}

/// Teacher reads and writes over one connection.
#[derive(Debug)]
pub struct TeacherGateway<C> {
    conn: C,
}

impl<C: Connection> TeacherGateway<C> {
    pub fn new(conn: C) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &C {
        &self.conn
    }

    /// All teachers except the unassigned sentinel, in id order.
    pub fn snapshot(&self) -> Result<Vec<Teacher>, HarnessError> {
        let rows = self.conn.query(
            SELECT_TEACHERS,
            &Params::new().with("@UnassignedId", TeacherId::UNASSIGNED.get()),
        )?;
        let teachers = rows
            .iter()
            .map(Teacher::from_row)
            .collect::<Result<Vec<_>, DbError>>()?;
        debug!(count = teachers.len(), "snapshot");
        Ok(teachers)
    }

    /// Inserts the teacher, then resolves its id by name.
    ///
    /// The name pair is assumed unique at the time of the call.
    pub fn create_direct(&self, teacher: &Teacher) -> Result<TeacherId, HarnessError> {
        self.conn.execute(INSERT_TEACHER, &name_params(teacher))?;
        let id = self
            .conn
            .scalar(SELECT_TEACHER_ID, &name_params(teacher))?
            .ok_or_else(|| HarnessError::CreatedRowNotFound {
                teacher: teacher.clone(),
            })?;
        let id = id.as_int().ok_or_else(|| DbError::TypeMismatch {
            expected: "integer TeacherId".to_string(),
            got: id.type_name().to_string(),
        })?;
        debug!(teacher = %teacher, teacher_id = id, "created through table");
        Ok(TeacherId(id))
    }

    /// Calls `ps.sTeacherCreate`; any return code but 0 is an error.
    pub fn create_via_procedure(&self, teacher: &Teacher) -> Result<TeacherId, HarnessError> {
        let outcome = self
            .conn
            .call_procedure(TEACHER_CREATE, &name_params(teacher))?;
        if !outcome.is_success() {
            return Err(HarnessError::UnexpectedStatus {
                procedure: TEACHER_CREATE.to_string(),
                code: outcome.return_code,
            });
        }
        let id = outcome
            .get_output("@TeacherId")
            .and_then(|v| v.as_int())
            .ok_or_else(|| HarnessError::MissingOutput {
                procedure: TEACHER_CREATE.to_string(),
                output: "@TeacherId".to_string(),
            })?;
        debug!(teacher = %teacher, teacher_id = id, "created through procedure");
        Ok(TeacherId(id))
    }

    pub fn create(&self, path: CreationPath, teacher: &Teacher) -> Result<TeacherId, HarnessError> {
        match path {
            CreationPath::Direct => self.create_direct(teacher),
            CreationPath::Procedure => self.create_via_procedure(teacher),
        }
    }

    /// Rows of `ps.vTeacher` for one teacher.
    pub fn view_rows_for(&self, teacher_id: TeacherId) -> Result<Vec<TeacherViewRow>, HarnessError> {
        let rows = self.conn.query(
            SELECT_VIEW_ROWS,
            &Params::new().with("@TeacherId", teacher_id.get()),
        )?;
        Ok(rows
            .iter()
            .map(TeacherViewRow::from_row)
            .collect::<Result<Vec<_>, DbError>>()?)
    }

    /// Checks that the view shows the teacher once, unassigned, under its names.
    pub fn check_view(&self, teacher_id: TeacherId, teacher: &Teacher) -> Result<(), HarnessError> {
        let rows = self.view_rows_for(teacher_id)?;
        verify::view_matches(&rows, teacher_id, teacher)?;
        Ok(())
    }

    /// Like [`check_view`](Self::check_view), but a mismatch is `Ok(false)`.
    pub fn verify_view(&self, teacher_id: TeacherId, teacher: &Teacher) -> Result<bool, HarnessError> {
        match self.check_view(teacher_id, teacher) {
            Ok(()) => Ok(true),
            Err(HarnessError::Verification(failure)) => {
                debug!(%failure, "view check failed");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Deletes the teacher row. A missing id is not reported.
    pub fn remove_direct(&self, teacher_id: TeacherId) -> Result<(), HarnessError> {
        let deleted = self.conn.execute(
            DELETE_TEACHER,
            &Params::new().with("@TeacherId", teacher_id.get()),
        )?;
        debug!(%teacher_id, deleted, "removed through table");
        Ok(())
    }

    /// Calls `ps.sTeacherDestroy`; any return code but 0 is an error.
    pub fn remove_via_procedure(&self, teacher_id: TeacherId) -> Result<(), HarnessError> {
        let outcome = self.conn.call_procedure(
            TEACHER_DESTROY,
            &Params::new().with("@TeacherId", teacher_id.get()),
        )?;
        if !outcome.is_success() {
            return Err(HarnessError::UnexpectedStatus {
                procedure: TEACHER_DESTROY.to_string(),
                code: outcome.return_code,
            });
        }
        debug!(%teacher_id, "removed through procedure");
        Ok(())
    }

    pub fn remove(&self, path: RemovalPath, teacher_id: TeacherId) -> Result<(), HarnessError> {
        match path {
            RemovalPath::Direct => self.remove_direct(teacher_id),
            RemovalPath::Procedure => self.remove_via_procedure(teacher_id),
        }
    }
}
