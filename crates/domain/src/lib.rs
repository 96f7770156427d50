//! # Semester Domain
//!
//! Shared domain types for the Semester school backend: entity records,
//! calendar descriptors, query filters, configuration, and the error
//! taxonomy used across every layer.
//!
//! This crate has no I/O dependencies and is depended on by both the core
//! business-logic layer and the infrastructure layer.

pub mod config;
pub mod errors;
pub mod types;

pub use config::{CalendarConfig, Config, DatabaseConfig};
pub use errors::{Result, SemesterError};
pub use types::calendar::{CalendarSession, EventRequest, Frequency, Recurrence, WeekdayCode};
pub use types::query::{ClassFilter, DateRange, InvoiceFilter, Page, PaycheckFilter, PersonFilter, WorkHourFilter};
pub use types::records::{
    Class, ClassUpdate, ClassWithRoster, EarningsPreview, Invoice, NewClass, NewInvoice,
    NewPaycheck, NewStudent, NewTeacher, NewWorkHourLog, Paycheck, Student, StudentUpdate,
    Teacher, TeacherUpdate, WorkHourLog,
};
