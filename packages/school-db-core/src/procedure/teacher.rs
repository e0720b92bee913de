//! `sTeacherCreate` and `sTeacherDestroy`.

use rusqlite::{params, OptionalExtension};
use tracing::debug;

use super::{ParamRequirement, ParamType, ProcedureOutcome, ProcedureRegistry, ProcedureSchema};
use crate::error::DbError;
use crate::schema::UNASSIGNED_ID;
use crate::value::{Params, Value};

pub const TEACHER_CREATE: &str = "ps.sTeacherCreate";
pub const TEACHER_DESTROY: &str = "ps.sTeacherDestroy";

/// Returned by both procedures when they refuse to act.
const RETURN_REFUSED: i64 = 1;

pub(super) fn register(registry: &mut ProcedureRegistry) {
    registry.register_with_schema(
        TEACHER_CREATE,
        teacher_create,
        ProcedureSchema {
            params: vec![
                ParamRequirement::required("@FirstName", ParamType::Text),
                ParamRequirement::required("@LastName", ParamType::Text),
            ],
        },
    );
    registry.register_with_schema(
        TEACHER_DESTROY,
        teacher_destroy,
        ProcedureSchema {
            params: vec![ParamRequirement::required("@TeacherId", ParamType::Integer)],
        },
    );
}

fn text_param<'p>(params: &'p Params, procedure: &str, name: &str) -> Result<&'p str, DbError> {
    params
        .get(name)
        .and_then(Value::as_text)
        .ok_or_else(|| DbError::MissingParameter {
            procedure: procedure.to_string(),
            param: name.to_string(),
        })
}

fn int_param(params: &Params, procedure: &str, name: &str) -> Result<i64, DbError> {
    params
        .get(name)
        .and_then(Value::as_int)
        .ok_or_else(|| DbError::MissingParameter {
            procedure: procedure.to_string(),
            param: name.to_string(),
        })
}

/// Inserts a teacher and returns its id in `@TeacherId`.
///
/// Refuses (return code 1, no output) when the name pair is already taken.
fn teacher_create(
    conn: &rusqlite::Connection,
    params: &Params,
) -> Result<ProcedureOutcome, DbError> {
    let first_name = text_param(params, TEACHER_CREATE, "@FirstName")?;
    let last_name = text_param(params, TEACHER_CREATE, "@LastName")?;

    const FIND: &str =
        "select TeacherId from ps.tTeacher where FirstName = ?1 and LastName = ?2;";
    let existing: Option<i64> = conn
        .query_row(FIND, params![first_name, last_name], |row| row.get(0))
        .optional()
        .map_err(|e| DbError::statement(FIND, e))?;
    if let Some(id) = existing {
        debug!(teacher_id = id, "{TEACHER_CREATE}: name pair already taken");
        return Ok(ProcedureOutcome::with_code(RETURN_REFUSED));
    }

    const INSERT: &str = "insert into ps.tTeacher(FirstName, LastName) values(?1, ?2);";
    conn.execute(INSERT, params![first_name, last_name])
        .map_err(|e| DbError::statement(INSERT, e))?;
    let teacher_id = conn.last_insert_rowid();

    Ok(ProcedureOutcome::success().output("@TeacherId", teacher_id))
}

/// Frees the teacher's class, then deletes the teacher.
///
/// The sentinel teacher cannot be destroyed. A missing id is not an error.
fn teacher_destroy(
    conn: &rusqlite::Connection,
    params: &Params,
) -> Result<ProcedureOutcome, DbError> {
    let teacher_id = int_param(params, TEACHER_DESTROY, "@TeacherId")?;
    if teacher_id == UNASSIGNED_ID {
        return Ok(ProcedureOutcome::with_code(RETURN_REFUSED));
    }

    const UNASSIGN: &str = "update ps.tClass set TeacherId = 0 where TeacherId = ?1;";
    conn.execute(UNASSIGN, params![teacher_id])
        .map_err(|e| DbError::statement(UNASSIGN, e))?;

    const DELETE: &str = "delete from ps.tTeacher where TeacherId = ?1;";
    let deleted = conn
        .execute(DELETE, params![teacher_id])
        .map_err(|e| DbError::statement(DELETE, e))?;
    debug!(teacher_id, deleted, "{TEACHER_DESTROY} done");

    Ok(ProcedureOutcome::success())
}
