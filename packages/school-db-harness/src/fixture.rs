//! Scoped ownership of one fixture teacher.

use tracing::{error, warn};

use school_db_core::Connection;

use crate::error::HarnessError;
use crate::gateway::{CreationPath, RemovalPath, TeacherGateway};
use crate::record::{Teacher, TeacherId};

/// A teacher created for one scenario.
///
/// Call [`release`](Self::release) to remove it and see whether removal
/// worked. If the guard is dropped first (a check returned early or
/// panicked), the drop removes the row and logs the outcome.
#[must_use = "dropping the fixture removes it immediately"]
pub struct TeacherFixture<'g, C: Connection> {
    gateway: &'g TeacherGateway<C>,
    id: TeacherId,
    teacher: Teacher,
    removal: RemovalPath,
    released: bool,
}

impl<'g, C: Connection> TeacherFixture<'g, C> {
    /// Creates `teacher` through `creation`; it will be removed through `removal`.
    pub fn create(
        gateway: &'g TeacherGateway<C>,
        teacher: Teacher,
        creation: CreationPath,
        removal: RemovalPath,
    ) -> Result<Self, HarnessError> {
        let id = gateway.create(creation, &teacher)?;
        Ok(Self {
            gateway,
            id,
            teacher,
            removal,
            released: false,
        })
    }

    pub fn id(&self) -> TeacherId {
        self.id
    }

    pub fn teacher(&self) -> &Teacher {
        &self.teacher
    }

    /// Removes the fixture now.
    pub fn release(mut self) -> Result<(), HarnessError> {
        self.released = true;
        self.gateway.remove(self.removal, self.id)
    }
}

impl<C: Connection> Drop for TeacherFixture<'_, C> {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        warn!(
            teacher_id = %self.id,
            teacher = %self.teacher,
            panicking = std::thread::panicking(),
            "fixture dropped without release, removing"
        );
        if let Err(e) = self.gateway.remove(self.removal, self.id) {
            error!(teacher_id = %self.id, error = %e, "fixture cleanup failed, row leaked");
        }
    }
}
