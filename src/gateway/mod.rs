//! Remote store gateway: the only way roster data is read from or written to the store.

mod memory;
mod postgres;
mod validation;

pub use memory::MemoryGateway;
pub use postgres::PgGateway;
pub use validation::StudentValidator;

use crate::error::StoreError;
use crate::model::{Course, NewStudent, Student, StudentId, StudentPatch};
use async_trait::async_trait;

/// Each call is one logical operation against the store. Nothing retries, and a
/// failed step aborts the steps after it without undoing the ones before.
#[async_trait]
pub trait StudentGateway: Send + Sync {
    /// All students ordered by name, each with its courses unwrapped from the association table.
    async fn list_students(&self) -> Result<Vec<Student>, StoreError>;

    /// Insert the student row, then one association row per course id.
    /// The student row stays if the association insert fails.
    async fn create_student(&self, input: &NewStudent) -> Result<StudentId, StoreError>;

    /// Update scalar fields if any are set; replace all associations if `course_ids` is set.
    async fn update_student(&self, id: StudentId, patch: &StudentPatch) -> Result<(), StoreError>;

    /// Delete the student row. Associations go with it through the store's cascade.
    async fn delete_student(&self, id: StudentId) -> Result<(), StoreError>;

    /// Course catalog ordered by name.
    async fn list_courses(&self) -> Result<Vec<Course>, StoreError>;

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
