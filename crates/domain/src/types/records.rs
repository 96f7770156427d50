//! Entity records and their typed insert/update companions
//!
//! The store owns the rows; these structs are transient views. Updates go
//! through per-entity `*Update` structs with per-field optionality instead
//! of untyped field maps, so only the fields an entity actually allows to
//! change can be touched.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::calendar::Recurrence;

/// A student enrolled with the school
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    /// Unique across students; doubles as the calendar attendee identity.
    pub email: String,
    pub phone: String,
    pub parent_phone: Option<String>,
    pub birth_year: i32,
}

/// Insert payload for a student
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewStudent {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub parent_phone: Option<String>,
    pub birth_year: i32,
}

/// Partial update for a student; `None` fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StudentUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub parent_phone: Option<String>,
    pub birth_year: Option<i32>,
}

impl StudentUpdate {
    /// True when no field is set
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.parent_phone.is_none()
            && self.birth_year.is_none()
    }
}

/// A teacher employed by the school
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Teacher {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    /// Hourly pay rate; snapshotted onto paychecks at generation time.
    pub hourly: f64,
    pub hire_date: NaiveDate,
}

/// Insert payload for a teacher; `hire_date` defaults to today when absent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTeacher {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub hourly: f64,
    pub hire_date: Option<NaiveDate>,
}

/// Partial update for a teacher
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TeacherUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub hourly: Option<f64>,
    pub hire_date: Option<NaiveDate>,
}

impl TeacherUpdate {
    /// True when no field is set
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.hourly.is_none()
            && self.hire_date.is_none()
    }
}

/// A scheduled class, mirrored as one external calendar event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Class {
    pub id: i64,
    pub name: String,
    pub teacher_id: i64,
    /// Seat capacity; the roster may never exceed it.
    pub class_size: u32,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub description: Option<String>,
    pub recurrence: Option<Recurrence>,
    /// External calendar event identifier. Always set: a class row is only
    /// written after the calendar create call confirmed the event.
    pub event_id: String,
}

/// Insert payload for a class; the event id is supplied by the scheduler
/// after the calendar event is confirmed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewClass {
    pub name: String,
    pub teacher_id: i64,
    pub class_size: u32,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub description: Option<String>,
    pub recurrence: Option<Recurrence>,
}

/// Partial update for a class
///
/// The recurrence descriptor and event id are deliberately absent: the
/// recurrence is fixed at creation (a change requires delete + recreate)
/// and the event id is owned by the scheduler.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassUpdate {
    pub name: Option<String>,
    pub teacher_id: Option<i64>,
    pub class_size: Option<u32>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub description: Option<String>,
}

impl ClassUpdate {
    /// True when no field is set
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.teacher_id.is_none()
            && self.class_size.is_none()
            && self.start.is_none()
            && self.end.is_none()
            && self.description.is_none()
    }
}

/// A class together with its current roster
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassWithRoster {
    pub class: Class,
    pub roster: Vec<Student>,
}

/// A billing record raised against a student
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: i64,
    pub student_id: i64,
    /// Set when the invoice was raised by a class reservation.
    pub class_id: Option<i64>,
    pub invoice_date: NaiveDate,
    pub description: String,
    pub amount: f64,
    pub payment_status: bool,
}

/// Insert payload for an invoice; payment status starts unpaid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewInvoice {
    pub student_id: i64,
    pub class_id: Option<i64>,
    pub invoice_date: NaiveDate,
    pub description: String,
    pub amount: f64,
}

/// One logged stretch of work for a teacher on a date
///
/// The same teacher and date may carry several logs with different hour
/// values (multiple shifts); only an exact triple duplicate is rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkHourLog {
    pub id: i64,
    pub teacher_id: i64,
    pub date: NaiveDate,
    pub hours: f64,
}

/// Insert payload for a work-hour log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewWorkHourLog {
    pub teacher_id: i64,
    pub date: NaiveDate,
    pub hours: f64,
}

/// A generated paycheck covering an inclusive date period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paycheck {
    pub id: i64,
    pub teacher_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Raw logged hours summed over the period.
    pub work_hours: f64,
    /// Raw hours rescaled by 60/45 (one school hour = 45 minutes).
    pub school_hours: f64,
    /// Teacher's hourly rate at generation time.
    pub hourly: f64,
    pub amount: f64,
    pub creation_date: NaiveDate,
    pub payment_status: bool,
    pub payment_date: Option<NaiveDate>,
}

/// Insert payload for a paycheck
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPaycheck {
    pub teacher_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub work_hours: f64,
    pub school_hours: f64,
    pub hourly: f64,
    pub amount: f64,
}

/// Report-only earnings estimate derived from scheduled class recurrence
///
/// Unlike a [`Paycheck`] this is never persisted; logged work hours remain
/// the authoritative paycheck source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarningsPreview {
    pub teacher_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub work_hours: f64,
    pub school_hours: f64,
    pub hourly: f64,
    pub amount: f64,
}
