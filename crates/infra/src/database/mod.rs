//! SQLite-backed implementations of the core repository ports
//!
//! One repository per aggregate. Timestamps are stored as epoch seconds,
//! dates as ISO `YYYY-MM-DD` text, and the recurrence descriptor as JSON
//! text; conversions happen here and nowhere else.

pub mod class_repository;
pub mod invoice_repository;
pub mod paycheck_repository;
pub mod reservation_repository;
pub mod student_repository;
pub mod teacher_repository;
pub mod work_hour_repository;

pub use class_repository::SqliteClassRepository;
pub use invoice_repository::SqliteInvoiceRepository;
pub use paycheck_repository::SqlitePaycheckRepository;
pub use reservation_repository::SqliteReservationRepository;
pub use student_repository::SqliteStudentRepository;
pub use teacher_repository::SqliteTeacherRepository;
pub use work_hour_repository::SqliteWorkHourRepository;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::Type;

/// Date column encoding
pub(crate) fn date_to_sql(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Decode a date column read at `idx`
pub(crate) fn date_from_sql(idx: usize, text: &str) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Decode a timestamp column read at `idx`
pub(crate) fn timestamp_from_sql(idx: usize, ts: i64) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Integer,
            format!("timestamp {ts} out of range").into(),
        )
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    use semester_core::directory::ports::{StudentRepository, TeacherRepository};
    use semester_core::scheduling::ports::ClassRepository;
    use semester_domain::{Class, NewClass, NewStudent, NewTeacher, Student, Teacher};
    use tempfile::TempDir;

    use super::{SqliteClassRepository, SqliteStudentRepository, SqliteTeacherRepository};
    use crate::storage::{SqlitePool, SqlitePoolConfig};

    pub fn test_pool() -> (SqlitePool, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let pool =
            SqlitePool::new(&temp_dir.path().join("test.db"), SqlitePoolConfig::default()).unwrap();
        (pool, temp_dir)
    }

    pub async fn seed_student(pool: &SqlitePool, email: &str) -> Student {
        SqliteStudentRepository::new(pool.clone())
            .insert(NewStudent {
                first_name: "Ana".into(),
                last_name: "Petrov".into(),
                email: email.into(),
                phone: "555-0101".into(),
                parent_phone: None,
                birth_year: 2008,
            })
            .await
            .unwrap()
    }

    pub async fn seed_teacher(pool: &SqlitePool, email: &str, hourly: f64) -> Teacher {
        SqliteTeacherRepository::new(pool.clone())
            .insert(NewTeacher {
                first_name: "Vera".into(),
                last_name: "Ilic".into(),
                email: email.into(),
                phone: "555-0202".into(),
                hourly,
                hire_date: None,
            })
            .await
            .unwrap()
    }

    pub async fn seed_class(
        pool: &SqlitePool,
        teacher_id: i64,
        name: &str,
        class_size: u32,
        event_id: &str,
    ) -> Class {
        use chrono::TimeZone;
        SqliteClassRepository::new(pool.clone())
            .insert(
                NewClass {
                    name: name.into(),
                    teacher_id,
                    class_size,
                    start: chrono::Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap(),
                    end: chrono::Utc.with_ymd_and_hms(2024, 6, 1, 11, 0, 0).unwrap(),
                    description: Some("seeded class".into()),
                    recurrence: None,
                },
                event_id,
            )
            .await
            .unwrap()
    }
}
