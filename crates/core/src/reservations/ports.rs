//! Port interfaces for the student-class join table

use async_trait::async_trait;
use semester_domain::{Class, Result, Student};

/// Trait for persisting seat reservations
#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Students currently reserved into a class.
    async fn roster(&self, class_id: i64) -> Result<Vec<Student>>;

    /// Classes a student is currently reserved into.
    async fn classes_for_student(&self, student_id: i64) -> Result<Vec<Class>>;

    /// Whether a reservation exists for the pair.
    async fn contains(&self, class_id: i64, student_id: i64) -> Result<bool>;

    /// Insert the join row, re-validating capacity in the same unit of work
    /// that inserts.
    ///
    /// `Conflict` when the class is full or the pair already exists;
    /// `NotFound` when the class id does not exist.
    async fn append(&self, class_id: i64, student_id: i64) -> Result<()>;

    /// Delete the join row. Returns false when it did not exist.
    async fn remove(&self, class_id: i64, student_id: i64) -> Result<bool>;
}
