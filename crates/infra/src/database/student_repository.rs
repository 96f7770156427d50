//! SQLite-backed implementation of the StudentRepository port.

use async_trait::async_trait;
use rusqlite::{params, OptionalExtension, Row, ToSql};
use semester_core::directory::ports::StudentRepository;
use semester_domain::{NewStudent, Page, PersonFilter, Result, Student, StudentUpdate};
use tracing::{debug, instrument};

use crate::errors::InfraError;
use crate::storage::SqlitePool;

const COLUMNS: &str = "id, first_name, last_name, email, phone, parent_phone, birth_year";

/// SQLite implementation of StudentRepository
pub struct SqliteStudentRepository {
    pool: SqlitePool,
}

impl SqliteStudentRepository {
    /// Create a new student repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn row_to_student(row: &Row<'_>) -> rusqlite::Result<Student> {
    Ok(Student {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        email: row.get(3)?,
        phone: row.get(4)?,
        parent_phone: row.get(5)?,
        birth_year: row.get(6)?,
    })
}

#[async_trait]
impl StudentRepository for SqliteStudentRepository {
    #[instrument(skip(self, student), fields(email = %student.email))]
    async fn insert(&self, student: NewStudent) -> Result<Student> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO students (first_name, last_name, email, phone, parent_phone, birth_year)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                student.first_name,
                student.last_name,
                student.email,
                student.phone,
                student.parent_phone,
                student.birth_year,
            ],
        )
        .map_err(InfraError::from)?;

        let id = conn.last_insert_rowid();
        debug!(student_id = id, "student inserted");

        Ok(Student {
            id,
            first_name: student.first_name,
            last_name: student.last_name,
            email: student.email,
            phone: student.phone,
            parent_phone: student.parent_phone,
            birth_year: student.birth_year,
        })
    }

    #[instrument(skip(self))]
    async fn find(&self, id: i64) -> Result<Option<Student>> {
        let conn = self.pool.get()?;
        conn.query_row(
            &format!("SELECT {COLUMNS} FROM students WHERE id = ?1"),
            [id],
            row_to_student,
        )
        .optional()
        .map_err(|e| InfraError::from(e).into())
    }

    #[instrument(skip(self, update))]
    async fn update(&self, id: i64, update: StudentUpdate) -> Result<bool> {
        if update.is_empty() {
            return Ok(self.find(id).await?.is_some());
        }

        let mut sets: Vec<&str> = Vec::new();
        let mut values: Vec<Box<dyn ToSql>> = Vec::new();
        if let Some(first_name) = update.first_name {
            sets.push("first_name = ?");
            values.push(Box::new(first_name));
        }
        if let Some(last_name) = update.last_name {
            sets.push("last_name = ?");
            values.push(Box::new(last_name));
        }
        if let Some(email) = update.email {
            sets.push("email = ?");
            values.push(Box::new(email));
        }
        if let Some(phone) = update.phone {
            sets.push("phone = ?");
            values.push(Box::new(phone));
        }
        if let Some(parent_phone) = update.parent_phone {
            sets.push("parent_phone = ?");
            values.push(Box::new(parent_phone));
        }
        if let Some(birth_year) = update.birth_year {
            sets.push("birth_year = ?");
            values.push(Box::new(birth_year));
        }
        values.push(Box::new(id));

        let conn = self.pool.get()?;
        let sql = format!("UPDATE students SET {} WHERE id = ?", sets.join(", "));
        let params: Vec<&dyn ToSql> = values.iter().map(|value| value.as_ref()).collect();
        let affected = conn.execute(&sql, &params[..]).map_err(InfraError::from)?;
        Ok(affected > 0)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: i64) -> Result<bool> {
        let conn = self.pool.get()?;
        let affected = conn
            .execute("DELETE FROM students WHERE id = ?1", [id])
            .map_err(InfraError::from)?;
        Ok(affected > 0)
    }

    #[instrument(skip(self, filter))]
    async fn list(&self, filter: &PersonFilter, page: Page) -> Result<Vec<Student>> {
        let mut sql = format!("SELECT {COLUMNS} FROM students WHERE 1 = 1");
        let mut values: Vec<Box<dyn ToSql>> = Vec::new();
        if let Some(last_name) = &filter.last_name {
            sql.push_str(" AND last_name = ?");
            values.push(Box::new(last_name.clone()));
        }
        if let Some(email) = &filter.email {
            sql.push_str(" AND email = ?");
            values.push(Box::new(email.clone()));
        }
        if let Some(phone) = &filter.phone {
            sql.push_str(" AND phone = ?");
            values.push(Box::new(phone.clone()));
        }
        sql.push_str(" ORDER BY id LIMIT ? OFFSET ?");
        values.push(Box::new(page.limit()));
        values.push(Box::new(page.offset()));

        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&sql).map_err(InfraError::from)?;
        let params: Vec<&dyn ToSql> = values.iter().map(|value| value.as_ref()).collect();
        let rows = stmt
            .query_map(&params[..], row_to_student)
            .map_err(InfraError::from)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(InfraError::from)?;

        debug!(count = rows.len(), "listed students");
        Ok(rows)
    }
}
