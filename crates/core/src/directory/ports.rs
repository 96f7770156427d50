//! Port interfaces for student and teacher records

use async_trait::async_trait;
use semester_domain::{
    NewStudent, NewTeacher, Page, PersonFilter, Result, Student, StudentUpdate, Teacher,
    TeacherUpdate,
};

/// Trait for persisting students
#[async_trait]
pub trait StudentRepository: Send + Sync {
    /// Insert a student; a duplicate email surfaces as `Conflict`.
    async fn insert(&self, student: NewStudent) -> Result<Student>;

    /// Load a student by id.
    async fn find(&self, id: i64) -> Result<Option<Student>>;

    /// Apply a partial update. Returns false when the id does not exist.
    async fn update(&self, id: i64, update: StudentUpdate) -> Result<bool>;

    /// Delete a student. Returns false when the id does not exist.
    async fn delete(&self, id: i64) -> Result<bool>;

    /// List students matching the filter, paginated.
    async fn list(&self, filter: &PersonFilter, page: Page) -> Result<Vec<Student>>;
}

/// Trait for persisting teachers
#[async_trait]
pub trait TeacherRepository: Send + Sync {
    /// Insert a teacher; a duplicate email surfaces as `Conflict`.
    async fn insert(&self, teacher: NewTeacher) -> Result<Teacher>;

    /// Load a teacher by id.
    async fn find(&self, id: i64) -> Result<Option<Teacher>>;

    /// Apply a partial update. Returns false when the id does not exist.
    async fn update(&self, id: i64, update: TeacherUpdate) -> Result<bool>;

    /// Delete a teacher. Returns false when the id does not exist.
    async fn delete(&self, id: i64) -> Result<bool>;

    /// List teachers matching the filter, paginated.
    async fn list(&self, filter: &PersonFilter, page: Page) -> Result<Vec<Teacher>>;
}
