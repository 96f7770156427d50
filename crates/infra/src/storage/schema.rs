//! Embedded database schema
//!
//! Applied idempotently when a pool is created. The UNIQUE constraints
//! back the uniqueness checks the services perform up front, so a race
//! between two concurrent writers still resolves to a Conflict.

use rusqlite::Connection;

use crate::errors::InfraError;

/// All table definitions, in dependency order.
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS students (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name    TEXT NOT NULL,
    last_name     TEXT NOT NULL,
    email         TEXT NOT NULL UNIQUE,
    phone         TEXT NOT NULL,
    parent_phone  TEXT,
    birth_year    INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS teachers (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name    TEXT NOT NULL,
    last_name     TEXT NOT NULL,
    email         TEXT NOT NULL UNIQUE,
    phone         TEXT NOT NULL,
    hourly        REAL NOT NULL,
    hire_date     TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS classes (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    name          TEXT NOT NULL,
    teacher_id    INTEGER NOT NULL REFERENCES teachers(id),
    class_size    INTEGER NOT NULL,
    start_ts      INTEGER NOT NULL,
    end_ts        INTEGER NOT NULL,
    description   TEXT,
    recurrence    TEXT,
    event_id      TEXT NOT NULL,
    UNIQUE(name, start_ts, end_ts)
);

CREATE TABLE IF NOT EXISTS reservations (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    student_id    INTEGER NOT NULL REFERENCES students(id),
    class_id      INTEGER NOT NULL REFERENCES classes(id),
    UNIQUE(student_id, class_id)
);

CREATE TABLE IF NOT EXISTS invoices (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    student_id     INTEGER NOT NULL REFERENCES students(id),
    class_id       INTEGER REFERENCES classes(id),
    invoice_date   TEXT NOT NULL,
    description    TEXT NOT NULL,
    amount         REAL NOT NULL,
    payment_status INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS work_hours (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    teacher_id    INTEGER NOT NULL REFERENCES teachers(id),
    date          TEXT NOT NULL,
    hours         REAL NOT NULL,
    UNIQUE(teacher_id, date, hours)
);

CREATE TABLE IF NOT EXISTS paychecks (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    teacher_id     INTEGER NOT NULL REFERENCES teachers(id),
    start_date     TEXT NOT NULL,
    end_date       TEXT NOT NULL,
    work_hours     REAL NOT NULL,
    school_hours   REAL NOT NULL,
    hourly         REAL NOT NULL,
    amount         REAL NOT NULL,
    creation_date  TEXT NOT NULL,
    payment_status INTEGER NOT NULL DEFAULT 0,
    payment_date   TEXT,
    UNIQUE(teacher_id, start_date, end_date)
);

CREATE INDEX IF NOT EXISTS idx_reservations_class ON reservations(class_id);
CREATE INDEX IF NOT EXISTS idx_invoices_student ON invoices(student_id);
CREATE INDEX IF NOT EXISTS idx_work_hours_teacher_date ON work_hours(teacher_id, date);
";

/// Apply the schema to a connection.
pub fn apply(conn: &Connection) -> Result<(), InfraError> {
    conn.execute_batch(SCHEMA).map_err(InfraError::from)
}
