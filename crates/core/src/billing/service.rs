//! Billing service - work-hour logging, paycheck generation, payments
//!
//! Paychecks aggregate logged work hours over an inclusive date period.
//! Raw hours are rescaled into school hours (one school hour = 45 minutes,
//! factor 60/45) and multiplied by the teacher's hourly rate, snapshotted
//! at generation time. At most one paycheck may exist per
//! `(teacher, start, end)` period.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use semester_domain::{
    EarningsPreview, Invoice, InvoiceFilter, NewPaycheck, NewWorkHourLog, Page, Paycheck,
    PaycheckFilter, Result, SemesterError, Student, Teacher, WorkHourFilter, WorkHourLog,
};
use tracing::{info, instrument};

use super::ports::{InvoiceRepository, PaycheckRepository, WorkHourRepository};
use crate::directory::ports::{StudentRepository, TeacherRepository};
use crate::scheduling::ports::ClassRepository;

/// Minutes in a school hour; raw hours are rescaled by 60/45.
const SCHOOL_HOUR_MINUTES: f64 = 45.0;

/// Round to two decimal places, the billing precision used everywhere.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Billing service
pub struct BillingService {
    teachers: Arc<dyn TeacherRepository>,
    students: Arc<dyn StudentRepository>,
    classes: Arc<dyn ClassRepository>,
    invoices: Arc<dyn InvoiceRepository>,
    work_hours: Arc<dyn WorkHourRepository>,
    paychecks: Arc<dyn PaycheckRepository>,
}

impl BillingService {
    /// Create a new billing service
    pub fn new(
        teachers: Arc<dyn TeacherRepository>,
        students: Arc<dyn StudentRepository>,
        classes: Arc<dyn ClassRepository>,
        invoices: Arc<dyn InvoiceRepository>,
        work_hours: Arc<dyn WorkHourRepository>,
        paychecks: Arc<dyn PaycheckRepository>,
    ) -> Self {
        Self { teachers, students, classes, invoices, work_hours, paychecks }
    }

    async fn load_teacher(&self, id: i64) -> Result<Teacher> {
        self.teachers
            .find(id)
            .await?
            .ok_or_else(|| SemesterError::NotFound(format!("teacher id {id}")))
    }

    /// Log hours worked by a teacher on a date
    ///
    /// An exact `(teacher, date, hours)` duplicate is rejected; the same
    /// teacher and date with a different hour value is a second shift and
    /// is accepted.
    #[instrument(skip(self, log), fields(teacher_id = log.teacher_id, date = %log.date))]
    pub async fn log_work_hours(&self, log: NewWorkHourLog) -> Result<WorkHourLog> {
        self.load_teacher(log.teacher_id).await?;
        if self.work_hours.exists(log.teacher_id, log.date, log.hours).await? {
            return Err(SemesterError::Conflict(format!(
                "hours already logged for teacher id {} on {}",
                log.teacher_id, log.date
            )));
        }
        self.work_hours.insert(log).await
    }

    /// List work-hour logs, filtered and paginated
    ///
    /// `NotFound` when nothing matches.
    pub async fn list_work_hours(
        &self,
        filter: &WorkHourFilter,
        page: Page,
    ) -> Result<Vec<WorkHourLog>> {
        let logs = self.work_hours.list(filter, page).await?;
        if logs.is_empty() {
            return Err(SemesterError::NotFound(
                "no work hours match the given teacher and period".into(),
            ));
        }
        Ok(logs)
    }

    /// Generate a paycheck from logged hours over `[start, end]` inclusive
    ///
    /// Logged hours are the authoritative source; see
    /// [`Self::scheduled_earnings_preview`] for the schedule-derived
    /// estimate. `Conflict` when a paycheck for the exact period exists.
    #[instrument(skip(self))]
    pub async fn generate_paycheck(
        &self,
        teacher_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Paycheck> {
        let teacher = self.load_teacher(teacher_id).await?;

        let logs = self.work_hours.in_period(teacher_id, start, end).await?;
        if logs.is_empty() {
            return Err(SemesterError::NotFound(format!(
                "no hours logged for teacher id {teacher_id} between {start} and {end}"
            )));
        }

        let work_hours: f64 = logs.iter().map(|log| log.hours).sum();
        let school_hours = round2(work_hours * 60.0 / SCHOOL_HOUR_MINUTES);
        let amount = round2(school_hours * teacher.hourly);

        if self.paychecks.exists_for_period(teacher_id, start, end).await? {
            return Err(SemesterError::Conflict(format!(
                "paycheck for teacher id {teacher_id} between {start} and {end} already exists"
            )));
        }

        let paycheck = self
            .paychecks
            .insert(NewPaycheck {
                teacher_id,
                start_date: start,
                end_date: end,
                work_hours,
                school_hours,
                hourly: teacher.hourly,
                amount,
            })
            .await?;
        info!(paycheck_id = paycheck.id, amount, "paycheck generated");
        Ok(paycheck)
    }

    /// Estimate earnings from the teacher's scheduled classes
    ///
    /// Walks classes whose start and end fall inside the period; per class,
    /// hours = duration x occurrences-per-week x weeks from the recurrence
    /// descriptor (one occurrence when the class has none). Report only -
    /// nothing is persisted and no period exclusivity applies.
    #[instrument(skip(self))]
    pub async fn scheduled_earnings_preview(
        &self,
        teacher_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<EarningsPreview> {
        let teacher = self.load_teacher(teacher_id).await?;
        let classes = self.classes.list_for_teacher(teacher_id).await?;

        let mut work_hours = 0.0;
        for class in &classes {
            let class_start = class.start.date_naive();
            let class_end = class.end.date_naive();
            if class_start < start || class_end > end {
                continue;
            }
            let duration = (class.end - class.start).num_seconds() as f64 / 3600.0;
            let occurrences = class
                .recurrence
                .as_ref()
                .map(|r| u64::from(r.occurrences_per_week()) * u64::from(r.weeks))
                .unwrap_or(1);
            work_hours += duration * occurrences as f64;
        }

        let school_hours = round2(work_hours * 60.0 / SCHOOL_HOUR_MINUTES);
        let amount = round2(school_hours * teacher.hourly);
        Ok(EarningsPreview {
            teacher_id,
            start_date: start,
            end_date: end,
            work_hours,
            school_hours,
            hourly: teacher.hourly,
            amount,
        })
    }

    /// Mark a paycheck as paid, stamping today's date
    ///
    /// Re-paying an already-paid paycheck refreshes the payment date and is
    /// not an error.
    #[instrument(skip(self))]
    pub async fn pay_paycheck(&self, id: i64) -> Result<Paycheck> {
        self.paychecks
            .mark_paid(id, Utc::now().date_naive())
            .await?
            .ok_or_else(|| SemesterError::NotFound(format!("paycheck id {id}")))
    }

    /// List paychecks, filtered and paginated
    ///
    /// `NotFound` when nothing matches.
    pub async fn list_paychecks(
        &self,
        filter: &PaycheckFilter,
        page: Page,
    ) -> Result<Vec<Paycheck>> {
        let paychecks = self.paychecks.list(filter, page).await?;
        if paychecks.is_empty() {
            return Err(SemesterError::NotFound("no paychecks match the given filters".into()));
        }
        Ok(paychecks)
    }

    /// Mark an invoice as paid
    ///
    /// Idempotent like [`Self::pay_paycheck`].
    #[instrument(skip(self))]
    pub async fn pay_invoice(&self, id: i64) -> Result<Invoice> {
        self.invoices
            .mark_paid(id)
            .await?
            .ok_or_else(|| SemesterError::NotFound(format!("invoice id {id}")))
    }

    /// List invoices, filtered and paginated
    pub async fn list_invoices(&self, filter: &InvoiceFilter, page: Page) -> Result<Vec<Invoice>> {
        self.invoices.list(filter, page).await
    }

    /// The student an invoice was raised against
    pub async fn invoice_student(&self, invoice_id: i64) -> Result<Student> {
        let invoice = self
            .invoices
            .find(invoice_id)
            .await?
            .ok_or_else(|| SemesterError::NotFound(format!("invoice id {invoice_id}")))?;
        self.students
            .find(invoice.student_id)
            .await?
            .ok_or_else(|| SemesterError::NotFound(format!("student id {}", invoice.student_id)))
    }
}
