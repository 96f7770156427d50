//! In-memory fakes for service tests
//!
//! Each fake implements a repository port over a `Mutex<Vec<_>>` and
//! enforces the same Conflict/NotFound semantics the SQLite repositories
//! do, so service tests exercise real error paths. The recording gateway
//! keeps a per-event attendee list and can be armed to fail its next call.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use semester_domain::{
    CalendarSession, Class, ClassFilter, ClassUpdate, EventRequest, Invoice, InvoiceFilter,
    NewClass, NewInvoice, NewPaycheck, NewStudent, NewTeacher, NewWorkHourLog, Page, Paycheck,
    PaycheckFilter, PersonFilter, Result, SemesterError, Student, StudentUpdate, Teacher,
    TeacherUpdate, WorkHourFilter, WorkHourLog,
};

use crate::billing::ports::{InvoiceRepository, PaycheckRepository, WorkHourRepository};
use crate::calendar_ports::{CalendarGateway, CalendarSessions};
use crate::directory::ports::{StudentRepository, TeacherRepository};
use crate::reservations::ports::ReservationRepository;
use crate::scheduling::ports::ClassRepository;

fn paginate<T>(rows: Vec<T>, page: Page) -> Vec<T> {
    rows.into_iter().skip(page.offset() as usize).take(page.limit() as usize).collect()
}

// ---------------------------------------------------------------------------
// Seed helpers
// ---------------------------------------------------------------------------

pub fn new_student(email: &str) -> NewStudent {
    NewStudent {
        first_name: "Ana".into(),
        last_name: "Petrov".into(),
        email: email.into(),
        phone: "555-0101".into(),
        parent_phone: None,
        birth_year: 2008,
    }
}

pub fn new_teacher(email: &str, hourly: f64) -> NewTeacher {
    NewTeacher {
        first_name: "Vera".into(),
        last_name: "Ilic".into(),
        email: email.into(),
        phone: "555-0202".into(),
        hourly,
        hire_date: None,
    }
}

pub fn new_class(name: &str, class_size: u32) -> NewClass {
    NewClass {
        name: name.into(),
        teacher_id: 1,
        class_size,
        start: Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap(),
        end: Utc.with_ymd_and_hms(2024, 6, 1, 11, 0, 0).unwrap(),
        description: Some("test class".into()),
        recurrence: None,
    }
}

// ---------------------------------------------------------------------------
// Directory fakes
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct InMemoryStudents {
    rows: Mutex<Vec<Student>>,
    next_id: AtomicI64,
}

#[async_trait]
impl StudentRepository for InMemoryStudents {
    async fn insert(&self, student: NewStudent) -> Result<Student> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|s| s.email == student.email) {
            return Err(SemesterError::Conflict("unique constraint violation".into()));
        }
        let row = Student {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            first_name: student.first_name,
            last_name: student.last_name,
            email: student.email,
            phone: student.phone,
            parent_phone: student.parent_phone,
            birth_year: student.birth_year,
        };
        rows.push(row.clone());
        Ok(row)
    }

    async fn find(&self, id: i64) -> Result<Option<Student>> {
        Ok(self.rows.lock().unwrap().iter().find(|s| s.id == id).cloned())
    }

    async fn update(&self, id: i64, update: StudentUpdate) -> Result<bool> {
        let mut rows = self.rows.lock().unwrap();
        let Some(row) = rows.iter_mut().find(|s| s.id == id) else {
            return Ok(false);
        };
        if let Some(first_name) = update.first_name {
            row.first_name = first_name;
        }
        if let Some(last_name) = update.last_name {
            row.last_name = last_name;
        }
        if let Some(email) = update.email {
            row.email = email;
        }
        if let Some(phone) = update.phone {
            row.phone = phone;
        }
        if let Some(parent_phone) = update.parent_phone {
            row.parent_phone = Some(parent_phone);
        }
        if let Some(birth_year) = update.birth_year {
            row.birth_year = birth_year;
        }
        Ok(true)
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|s| s.id != id);
        Ok(rows.len() < before)
    }

    async fn list(&self, filter: &PersonFilter, page: Page) -> Result<Vec<Student>> {
        let rows = self.rows.lock().unwrap();
        let matching = rows
            .iter()
            .filter(|s| filter.last_name.as_ref().map_or(true, |v| &s.last_name == v))
            .filter(|s| filter.email.as_ref().map_or(true, |v| &s.email == v))
            .filter(|s| filter.phone.as_ref().map_or(true, |v| &s.phone == v))
            .cloned()
            .collect();
        Ok(paginate(matching, page))
    }
}

#[derive(Default)]
pub struct InMemoryTeachers {
    rows: Mutex<Vec<Teacher>>,
    next_id: AtomicI64,
}

#[async_trait]
impl TeacherRepository for InMemoryTeachers {
    async fn insert(&self, teacher: NewTeacher) -> Result<Teacher> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|t| t.email == teacher.email) {
            return Err(SemesterError::Conflict("unique constraint violation".into()));
        }
        let row = Teacher {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            first_name: teacher.first_name,
            last_name: teacher.last_name,
            email: teacher.email,
            phone: teacher.phone,
            hourly: teacher.hourly,
            hire_date: teacher.hire_date.unwrap_or_else(|| Utc::now().date_naive()),
        };
        rows.push(row.clone());
        Ok(row)
    }

    async fn find(&self, id: i64) -> Result<Option<Teacher>> {
        Ok(self.rows.lock().unwrap().iter().find(|t| t.id == id).cloned())
    }

    async fn update(&self, id: i64, update: TeacherUpdate) -> Result<bool> {
        let mut rows = self.rows.lock().unwrap();
        let Some(row) = rows.iter_mut().find(|t| t.id == id) else {
            return Ok(false);
        };
        if let Some(first_name) = update.first_name {
            row.first_name = first_name;
        }
        if let Some(last_name) = update.last_name {
            row.last_name = last_name;
        }
        if let Some(email) = update.email {
            row.email = email;
        }
        if let Some(phone) = update.phone {
            row.phone = phone;
        }
        if let Some(hourly) = update.hourly {
            row.hourly = hourly;
        }
        if let Some(hire_date) = update.hire_date {
            row.hire_date = hire_date;
        }
        Ok(true)
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|t| t.id != id);
        Ok(rows.len() < before)
    }

    async fn list(&self, filter: &PersonFilter, page: Page) -> Result<Vec<Teacher>> {
        let rows = self.rows.lock().unwrap();
        let matching = rows
            .iter()
            .filter(|t| filter.last_name.as_ref().map_or(true, |v| &t.last_name == v))
            .filter(|t| filter.email.as_ref().map_or(true, |v| &t.email == v))
            .filter(|t| filter.phone.as_ref().map_or(true, |v| &t.phone == v))
            .cloned()
            .collect();
        Ok(paginate(matching, page))
    }
}

// ---------------------------------------------------------------------------
// Scheduling fakes
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct InMemoryClasses {
    rows: Mutex<Vec<Class>>,
    next_id: AtomicI64,
}

impl InMemoryClasses {
    pub fn is_empty(&self) -> bool {
        self.rows.lock().unwrap().is_empty()
    }
}

#[async_trait]
impl ClassRepository for InMemoryClasses {
    async fn insert(&self, class: NewClass, event_id: &str) -> Result<Class> {
        let mut rows = self.rows.lock().unwrap();
        if rows
            .iter()
            .any(|c| c.name == class.name && c.start == class.start && c.end == class.end)
        {
            return Err(SemesterError::Conflict("unique constraint violation".into()));
        }
        let row = Class {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            name: class.name,
            teacher_id: class.teacher_id,
            class_size: class.class_size,
            start: class.start,
            end: class.end,
            description: class.description,
            recurrence: class.recurrence,
            event_id: event_id.to_string(),
        };
        rows.push(row.clone());
        Ok(row)
    }

    async fn find(&self, id: i64) -> Result<Option<Class>> {
        Ok(self.rows.lock().unwrap().iter().find(|c| c.id == id).cloned())
    }

    async fn find_by_signature(
        &self,
        name: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Option<Class>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.name == name && c.start == start && c.end == end)
            .cloned())
    }

    async fn update(&self, id: i64, update: ClassUpdate) -> Result<bool> {
        let mut rows = self.rows.lock().unwrap();
        let Some(row) = rows.iter_mut().find(|c| c.id == id) else {
            return Ok(false);
        };
        if let Some(name) = update.name {
            row.name = name;
        }
        if let Some(teacher_id) = update.teacher_id {
            row.teacher_id = teacher_id;
        }
        if let Some(class_size) = update.class_size {
            row.class_size = class_size;
        }
        if let Some(start) = update.start {
            row.start = start;
        }
        if let Some(end) = update.end {
            row.end = end;
        }
        if let Some(description) = update.description {
            row.description = Some(description);
        }
        Ok(true)
    }

    async fn delete_cascade(&self, id: i64) -> Result<()> {
        self.rows.lock().unwrap().retain(|c| c.id != id);
        Ok(())
    }

    async fn list(&self, filter: &ClassFilter, page: Page) -> Result<Vec<Class>> {
        let rows = self.rows.lock().unwrap();
        let matching = rows
            .iter()
            .filter(|c| {
                filter
                    .name
                    .as_ref()
                    .map_or(true, |v| c.name.to_lowercase().contains(&v.to_lowercase()))
            })
            .filter(|c| filter.start_date.map_or(true, |v| c.start.date_naive() == v))
            .filter(|c| {
                filter.description.as_ref().map_or(true, |v| {
                    c.description
                        .as_ref()
                        .is_some_and(|d| d.to_lowercase().contains(&v.to_lowercase()))
                })
            })
            .cloned()
            .collect();
        Ok(paginate(matching, page))
    }

    async fn list_for_teacher(&self, teacher_id: i64) -> Result<Vec<Class>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.teacher_id == teacher_id)
            .cloned()
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Reservation fake
// ---------------------------------------------------------------------------

pub struct InMemoryReservations {
    classes: std::sync::Arc<InMemoryClasses>,
    students: std::sync::Arc<InMemoryStudents>,
    pairs: Mutex<Vec<(i64, i64)>>, // (class_id, student_id)
}

impl InMemoryReservations {
    pub fn new(
        classes: std::sync::Arc<InMemoryClasses>,
        students: std::sync::Arc<InMemoryStudents>,
    ) -> Self {
        Self { classes, students, pairs: Mutex::new(Vec::new()) }
    }
}

#[async_trait]
impl ReservationRepository for InMemoryReservations {
    async fn roster(&self, class_id: i64) -> Result<Vec<Student>> {
        let student_ids: Vec<i64> = self
            .pairs
            .lock()
            .unwrap()
            .iter()
            .filter(|(c, _)| *c == class_id)
            .map(|(_, s)| *s)
            .collect();
        let mut roster = Vec::new();
        for id in student_ids {
            if let Some(student) = self.students.find(id).await? {
                roster.push(student);
            }
        }
        Ok(roster)
    }

    async fn classes_for_student(&self, student_id: i64) -> Result<Vec<Class>> {
        let class_ids: Vec<i64> = self
            .pairs
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, s)| *s == student_id)
            .map(|(c, _)| *c)
            .collect();
        let mut classes = Vec::new();
        for id in class_ids {
            if let Some(class) = self.classes.find(id).await? {
                classes.push(class);
            }
        }
        Ok(classes)
    }

    async fn contains(&self, class_id: i64, student_id: i64) -> Result<bool> {
        Ok(self.pairs.lock().unwrap().contains(&(class_id, student_id)))
    }

    async fn append(&self, class_id: i64, student_id: i64) -> Result<()> {
        let class = self
            .classes
            .find(class_id)
            .await?
            .ok_or_else(|| SemesterError::NotFound(format!("class id {class_id}")))?;
        let mut pairs = self.pairs.lock().unwrap();
        if pairs.contains(&(class_id, student_id)) {
            return Err(SemesterError::Conflict("unique constraint violation".into()));
        }
        let taken = pairs.iter().filter(|(c, _)| *c == class_id).count();
        if taken as u32 >= class.class_size {
            return Err(SemesterError::Conflict(format!("class id {class_id} is full")));
        }
        pairs.push((class_id, student_id));
        Ok(())
    }

    async fn remove(&self, class_id: i64, student_id: i64) -> Result<bool> {
        let mut pairs = self.pairs.lock().unwrap();
        let before = pairs.len();
        pairs.retain(|pair| *pair != (class_id, student_id));
        Ok(pairs.len() < before)
    }
}

// ---------------------------------------------------------------------------
// Billing fakes
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct InMemoryInvoices {
    rows: Mutex<Vec<Invoice>>,
    next_id: AtomicI64,
}

impl InMemoryInvoices {
    pub fn all(&self) -> Vec<Invoice> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl InvoiceRepository for InMemoryInvoices {
    async fn insert(&self, invoice: NewInvoice) -> Result<Invoice> {
        let row = Invoice {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            student_id: invoice.student_id,
            class_id: invoice.class_id,
            invoice_date: invoice.invoice_date,
            description: invoice.description,
            amount: invoice.amount,
            payment_status: false,
        };
        self.rows.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn find(&self, id: i64) -> Result<Option<Invoice>> {
        Ok(self.rows.lock().unwrap().iter().find(|i| i.id == id).cloned())
    }

    async fn list(&self, filter: &InvoiceFilter, page: Page) -> Result<Vec<Invoice>> {
        let rows = self.rows.lock().unwrap();
        let matching = rows
            .iter()
            .filter(|i| filter.payment_status.map_or(true, |v| i.payment_status == v))
            .filter(|i| filter.invoice_date.map_or(true, |v| i.invoice_date == v))
            .cloned()
            .collect();
        Ok(paginate(matching, page))
    }

    async fn mark_paid(&self, id: i64) -> Result<Option<Invoice>> {
        let mut rows = self.rows.lock().unwrap();
        let Some(row) = rows.iter_mut().find(|i| i.id == id) else {
            return Ok(None);
        };
        row.payment_status = true;
        Ok(Some(row.clone()))
    }

    async fn delete_for_reservation(&self, student_id: i64, class_id: i64) -> Result<usize> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|i| !(i.student_id == student_id && i.class_id == Some(class_id)));
        Ok(before - rows.len())
    }
}

#[derive(Default)]
pub struct InMemoryWorkHours {
    rows: Mutex<Vec<WorkHourLog>>,
    next_id: AtomicI64,
}

#[async_trait]
impl WorkHourRepository for InMemoryWorkHours {
    async fn exists(&self, teacher_id: i64, date: NaiveDate, hours: f64) -> Result<bool> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .any(|l| l.teacher_id == teacher_id && l.date == date && l.hours == hours))
    }

    async fn insert(&self, log: NewWorkHourLog) -> Result<WorkHourLog> {
        let mut rows = self.rows.lock().unwrap();
        if rows
            .iter()
            .any(|l| l.teacher_id == log.teacher_id && l.date == log.date && l.hours == log.hours)
        {
            return Err(SemesterError::Conflict("unique constraint violation".into()));
        }
        let row = WorkHourLog {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            teacher_id: log.teacher_id,
            date: log.date,
            hours: log.hours,
        };
        rows.push(row.clone());
        Ok(row)
    }

    async fn list(&self, filter: &WorkHourFilter, page: Page) -> Result<Vec<WorkHourLog>> {
        let rows = self.rows.lock().unwrap();
        let matching = rows
            .iter()
            .filter(|l| filter.teacher_id.map_or(true, |v| l.teacher_id == v))
            .filter(|l| {
                filter.period.map_or(true, |range| l.date >= range.start && l.date <= range.end)
            })
            .cloned()
            .collect();
        Ok(paginate(matching, page))
    }

    async fn in_period(
        &self,
        teacher_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<WorkHourLog>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|l| l.teacher_id == teacher_id && l.date >= start && l.date <= end)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct InMemoryPaychecks {
    rows: Mutex<Vec<Paycheck>>,
    next_id: AtomicI64,
}

#[async_trait]
impl PaycheckRepository for InMemoryPaychecks {
    async fn exists_for_period(
        &self,
        teacher_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<bool> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .any(|p| p.teacher_id == teacher_id && p.start_date == start && p.end_date == end))
    }

    async fn insert(&self, paycheck: NewPaycheck) -> Result<Paycheck> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|p| {
            p.teacher_id == paycheck.teacher_id
                && p.start_date == paycheck.start_date
                && p.end_date == paycheck.end_date
        }) {
            return Err(SemesterError::Conflict("unique constraint violation".into()));
        }
        let row = Paycheck {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            teacher_id: paycheck.teacher_id,
            start_date: paycheck.start_date,
            end_date: paycheck.end_date,
            work_hours: paycheck.work_hours,
            school_hours: paycheck.school_hours,
            hourly: paycheck.hourly,
            amount: paycheck.amount,
            creation_date: Utc::now().date_naive(),
            payment_status: false,
            payment_date: None,
        };
        rows.push(row.clone());
        Ok(row)
    }

    async fn find(&self, id: i64) -> Result<Option<Paycheck>> {
        Ok(self.rows.lock().unwrap().iter().find(|p| p.id == id).cloned())
    }

    async fn list(&self, filter: &PaycheckFilter, page: Page) -> Result<Vec<Paycheck>> {
        let rows = self.rows.lock().unwrap();
        let matching = rows
            .iter()
            .filter(|p| filter.teacher_id.map_or(true, |v| p.teacher_id == v))
            .filter(|p| filter.paid.map_or(true, |v| p.payment_status == v))
            .filter(|p| {
                filter
                    .period
                    .map_or(true, |range| p.start_date >= range.start && p.end_date <= range.end)
            })
            .cloned()
            .collect();
        Ok(paginate(matching, page))
    }

    async fn mark_paid(&self, id: i64, date: NaiveDate) -> Result<Option<Paycheck>> {
        let mut rows = self.rows.lock().unwrap();
        let Some(row) = rows.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        row.payment_status = true;
        row.payment_date = Some(date);
        Ok(Some(row.clone()))
    }
}

// ---------------------------------------------------------------------------
// Calendar fakes
// ---------------------------------------------------------------------------

/// A single recorded gateway call
#[derive(Debug, Clone)]
pub enum GatewayCall {
    Create { request: EventRequest },
    Update { event_id: String, request: EventRequest },
    Delete { event_id: String },
    AddAttendee { event_id: String, email: String },
    RemoveAttendee { event_id: String, email: String },
}

/// Recording calendar gateway with per-event attendee state
#[derive(Default)]
pub struct RecordingGateway {
    calls: Mutex<Vec<GatewayCall>>,
    attendees: Mutex<HashMap<String, Vec<String>>>,
    next_event: AtomicI64,
    fail_next: Mutex<Option<SemesterError>>,
}

impl RecordingGateway {
    /// Arm the gateway to fail its next call with the given error
    pub fn fail_next(&self, err: SemesterError) {
        *self.fail_next.lock().unwrap() = Some(err);
    }

    /// All calls recorded so far
    pub fn calls(&self) -> Vec<GatewayCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Attendee list of an event (empty when unknown)
    pub fn attendees(&self, event_id: &str) -> Vec<String> {
        self.attendees.lock().unwrap().get(event_id).cloned().unwrap_or_default()
    }

    fn check_armed_failure(&self) -> Result<()> {
        if let Some(err) = self.fail_next.lock().unwrap().take() {
            return Err(err);
        }
        Ok(())
    }
}

#[async_trait]
impl CalendarGateway for RecordingGateway {
    async fn create_event(
        &self,
        _session: &CalendarSession,
        request: &EventRequest,
    ) -> Result<String> {
        self.check_armed_failure()?;
        let event_id = format!("evt-{}", self.next_event.fetch_add(1, Ordering::SeqCst) + 1);
        self.attendees.lock().unwrap().insert(event_id.clone(), Vec::new());
        self.calls.lock().unwrap().push(GatewayCall::Create { request: request.clone() });
        Ok(event_id)
    }

    async fn update_event(
        &self,
        _session: &CalendarSession,
        event_id: &str,
        request: &EventRequest,
    ) -> Result<()> {
        self.check_armed_failure()?;
        self.calls.lock().unwrap().push(GatewayCall::Update {
            event_id: event_id.to_string(),
            request: request.clone(),
        });
        Ok(())
    }

    async fn delete_event(&self, _session: &CalendarSession, event_id: &str) -> Result<()> {
        self.check_armed_failure()?;
        self.attendees.lock().unwrap().remove(event_id);
        self.calls.lock().unwrap().push(GatewayCall::Delete { event_id: event_id.to_string() });
        Ok(())
    }

    async fn add_attendee(
        &self,
        _session: &CalendarSession,
        event_id: &str,
        email: &str,
    ) -> Result<Vec<String>> {
        self.check_armed_failure()?;
        let mut attendees = self.attendees.lock().unwrap();
        let list = attendees.entry(event_id.to_string()).or_default();
        if !list.iter().any(|e| e == email) {
            list.push(email.to_string());
        }
        let snapshot = list.clone();
        drop(attendees);
        self.calls.lock().unwrap().push(GatewayCall::AddAttendee {
            event_id: event_id.to_string(),
            email: email.to_string(),
        });
        Ok(snapshot)
    }

    async fn remove_attendee(
        &self,
        _session: &CalendarSession,
        event_id: &str,
        email: &str,
    ) -> Result<Vec<String>> {
        self.check_armed_failure()?;
        let mut attendees = self.attendees.lock().unwrap();
        let list = attendees.entry(event_id.to_string()).or_default();
        if let Some(pos) = list.iter().position(|e| e == email) {
            list.remove(pos);
        }
        let snapshot = list.clone();
        drop(attendees);
        self.calls.lock().unwrap().push(GatewayCall::RemoveAttendee {
            event_id: event_id.to_string(),
            email: email.to_string(),
        });
        Ok(snapshot)
    }
}

/// Session source that is either always logged in or always logged out
pub struct FixedSessions {
    session: Option<CalendarSession>,
}

impl FixedSessions {
    pub fn logged_in() -> Self {
        Self {
            session: Some(CalendarSession {
                access_token: "test-token".into(),
                account: "school@example.com".into(),
            }),
        }
    }

    pub fn logged_out() -> Self {
        Self { session: None }
    }
}

#[async_trait]
impl CalendarSessions for FixedSessions {
    async fn session(&self) -> Result<Option<CalendarSession>> {
        Ok(self.session.clone())
    }
}
