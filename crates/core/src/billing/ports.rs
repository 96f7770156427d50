//! Port interfaces for billing records

use async_trait::async_trait;
use chrono::NaiveDate;
use semester_domain::{
    Invoice, InvoiceFilter, NewInvoice, NewPaycheck, NewWorkHourLog, Page, Paycheck,
    PaycheckFilter, Result, WorkHourFilter, WorkHourLog,
};

/// Trait for persisting invoices
#[async_trait]
pub trait InvoiceRepository: Send + Sync {
    /// Insert an invoice, unpaid.
    async fn insert(&self, invoice: NewInvoice) -> Result<Invoice>;

    /// Load an invoice by id.
    async fn find(&self, id: i64) -> Result<Option<Invoice>>;

    /// List invoices matching the filter, paginated.
    async fn list(&self, filter: &InvoiceFilter, page: Page) -> Result<Vec<Invoice>>;

    /// Set payment status to paid. Returns the updated invoice, `None`
    /// when the id does not exist.
    async fn mark_paid(&self, id: i64) -> Result<Option<Invoice>>;

    /// Delete the invoices raised for one `(student, class)` reservation.
    /// Returns the number of rows removed.
    async fn delete_for_reservation(&self, student_id: i64, class_id: i64) -> Result<usize>;
}

/// Trait for persisting work-hour logs
#[async_trait]
pub trait WorkHourRepository: Send + Sync {
    /// Whether an identical `(teacher, date, hours)` log exists.
    async fn exists(&self, teacher_id: i64, date: NaiveDate, hours: f64) -> Result<bool>;

    /// Insert a log; an exact-duplicate triple surfaces as `Conflict`.
    async fn insert(&self, log: NewWorkHourLog) -> Result<WorkHourLog>;

    /// List logs matching the filter, paginated.
    async fn list(&self, filter: &WorkHourFilter, page: Page) -> Result<Vec<WorkHourLog>>;

    /// All logs for a teacher with a date in `[start, end]` inclusive.
    async fn in_period(
        &self,
        teacher_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<WorkHourLog>>;
}

/// Trait for persisting paychecks
#[async_trait]
pub trait PaycheckRepository: Send + Sync {
    /// Whether a paycheck exists for the exact period triple.
    async fn exists_for_period(
        &self,
        teacher_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<bool>;

    /// Insert a paycheck; a duplicate period triple surfaces as `Conflict`.
    async fn insert(&self, paycheck: NewPaycheck) -> Result<Paycheck>;

    /// Load a paycheck by id.
    async fn find(&self, id: i64) -> Result<Option<Paycheck>>;

    /// List paychecks matching the filter, paginated.
    async fn list(&self, filter: &PaycheckFilter, page: Page) -> Result<Vec<Paycheck>>;

    /// Set payment status to paid, stamping the payment date. Returns the
    /// updated paycheck, `None` when the id does not exist.
    async fn mark_paid(&self, id: i64, date: NaiveDate) -> Result<Option<Paycheck>>;
}
