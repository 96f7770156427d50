//! Port interfaces for class persistence

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use semester_domain::{Class, ClassFilter, ClassUpdate, NewClass, Page, Result};

/// Trait for persisting classes
#[async_trait]
pub trait ClassRepository: Send + Sync {
    /// Insert a class with its confirmed calendar event id.
    ///
    /// A `(name, start, end)` collision surfaces as `Conflict`.
    async fn insert(&self, class: NewClass, event_id: &str) -> Result<Class>;

    /// Load a class by id.
    async fn find(&self, id: i64) -> Result<Option<Class>>;

    /// Look up a class by its identity tuple `(name, start, end)`.
    async fn find_by_signature(
        &self,
        name: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Option<Class>>;

    /// Apply a partial update. Returns false when the id does not exist.
    async fn update(&self, id: i64, update: ClassUpdate) -> Result<bool>;

    /// Delete the class together with its invoices and reservations, as one
    /// unit of work.
    async fn delete_cascade(&self, id: i64) -> Result<()>;

    /// List classes matching the filter, paginated.
    async fn list(&self, filter: &ClassFilter, page: Page) -> Result<Vec<Class>>;

    /// All classes owned by a teacher.
    async fn list_for_teacher(&self, teacher_id: i64) -> Result<Vec<Class>>;
}
