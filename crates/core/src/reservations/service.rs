//! Reservation service - seat assignment with attendee sync and invoicing
//!
//! A reservation means three synchronized facts: the join row exists, the
//! student's email is on the calendar event's attendee list, and exactly
//! one invoice for the pair exists. The attendee mutation runs before the
//! local writes and a calendar failure aborts with no local change; a
//! local failure after the attendee mutation is logged with the event id
//! and email so reconciliation can repair the drift.

use std::sync::Arc;

use chrono::Utc;
use semester_domain::{
    CalendarSession, Class, ClassWithRoster, NewInvoice, Result, SemesterError, Student,
};
use tracing::{error, info, instrument};

use super::ports::ReservationRepository;
use crate::billing::ports::InvoiceRepository;
use crate::calendar_ports::{CalendarGateway, CalendarSessions};
use crate::directory::ports::StudentRepository;
use crate::scheduling::ports::ClassRepository;

/// Reservation service
pub struct ReservationService {
    classes: Arc<dyn ClassRepository>,
    students: Arc<dyn StudentRepository>,
    reservations: Arc<dyn ReservationRepository>,
    invoices: Arc<dyn InvoiceRepository>,
    gateway: Arc<dyn CalendarGateway>,
    sessions: Arc<dyn CalendarSessions>,
}

impl ReservationService {
    /// Create a new reservation service
    pub fn new(
        classes: Arc<dyn ClassRepository>,
        students: Arc<dyn StudentRepository>,
        reservations: Arc<dyn ReservationRepository>,
        invoices: Arc<dyn InvoiceRepository>,
        gateway: Arc<dyn CalendarGateway>,
        sessions: Arc<dyn CalendarSessions>,
    ) -> Self {
        Self { classes, students, reservations, invoices, gateway, sessions }
    }

    async fn require_session(&self) -> Result<CalendarSession> {
        self.sessions
            .session()
            .await?
            .ok_or_else(|| SemesterError::Unauthorized("calendar login required".into()))
    }

    async fn load_class(&self, id: i64) -> Result<Class> {
        self.classes
            .find(id)
            .await?
            .ok_or_else(|| SemesterError::NotFound(format!("class id {id}")))
    }

    async fn load_student(&self, id: i64) -> Result<Student> {
        self.students
            .find(id)
            .await?
            .ok_or_else(|| SemesterError::NotFound(format!("student id {id}")))
    }

    /// Reserve a seat for a student
    ///
    /// Capacity is checked before the calendar call so a full class never
    /// causes a wasted attendee write; the repository re-validates it when
    /// inserting. A successful reservation raises one unpaid invoice tied
    /// to the class.
    #[instrument(skip(self))]
    pub async fn reserve(
        &self,
        class_id: i64,
        student_id: i64,
        amount: f64,
    ) -> Result<ClassWithRoster> {
        let session = self.require_session().await?;

        let class = self.load_class(class_id).await?;
        let roster = self.reservations.roster(class_id).await?;
        if roster.len() as u32 >= class.class_size {
            return Err(SemesterError::Conflict(format!(
                "class '{}' is full ({} seats)",
                class.name, class.class_size
            )));
        }
        let student = self.load_student(student_id).await?;

        self.gateway.add_attendee(&session, &class.event_id, &student.email).await?;

        if let Err(err) = self.reservations.append(class_id, student_id).await {
            error!(
                event_id = %class.event_id,
                email = %student.email,
                error = %err,
                "reservation insert failed after attendee added; calendar needs reconciliation"
            );
            return Err(err);
        }

        let description = format!(
            "Reservation for: {}, at {}, Class description: {}",
            class.name,
            class.start,
            class.description.as_deref().unwrap_or("")
        );
        let invoice = NewInvoice {
            student_id,
            class_id: Some(class_id),
            invoice_date: Utc::now().date_naive(),
            description,
            amount,
        };
        if let Err(err) = self.invoices.insert(invoice).await {
            error!(
                event_id = %class.event_id,
                email = %student.email,
                error = %err,
                "invoice insert failed after reservation; billing needs reconciliation"
            );
            return Err(err);
        }

        info!(event_id = %class.event_id, email = %student.email, "reservation confirmed");

        let roster = self.reservations.roster(class_id).await?;
        Ok(ClassWithRoster { class, roster })
    }

    /// Cancel a student's reservation
    ///
    /// The attendee removal runs first and a failure aborts everything.
    /// Invoice deletion is scoped to this `(student, class)` pair so a
    /// student's other reservations keep their invoices.
    #[instrument(skip(self))]
    pub async fn cancel(&self, class_id: i64, student_id: i64) -> Result<ClassWithRoster> {
        let session = self.require_session().await?;

        let class = self.load_class(class_id).await?;
        let student = self.load_student(student_id).await?;

        if !self.reservations.contains(class_id, student_id).await? {
            return Err(SemesterError::NotFound(format!(
                "student id {student_id} is not reserved into class id {class_id}"
            )));
        }

        self.gateway.remove_attendee(&session, &class.event_id, &student.email).await?;

        if let Err(err) = self.reservations.remove(class_id, student_id).await {
            error!(
                event_id = %class.event_id,
                email = %student.email,
                error = %err,
                "reservation delete failed after attendee removed; calendar needs reconciliation"
            );
            return Err(err);
        }
        self.invoices.delete_for_reservation(student_id, class_id).await?;

        info!(event_id = %class.event_id, email = %student.email, "reservation cancelled");

        let roster = self.reservations.roster(class_id).await?;
        Ok(ClassWithRoster { class, roster })
    }

    /// Current roster of a class
    pub async fn class_roster(&self, class_id: i64) -> Result<ClassWithRoster> {
        let class = self.load_class(class_id).await?;
        let roster = self.reservations.roster(class_id).await?;
        Ok(ClassWithRoster { class, roster })
    }

    /// Classes a student is reserved into
    pub async fn student_classes(&self, student_id: i64) -> Result<Vec<Class>> {
        self.load_student(student_id).await?;
        self.reservations.classes_for_student(student_id).await
    }
}
