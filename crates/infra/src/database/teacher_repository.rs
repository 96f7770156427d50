//! SQLite-backed implementation of the TeacherRepository port.

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row, ToSql};
use semester_core::directory::ports::TeacherRepository;
use semester_domain::{NewTeacher, Page, PersonFilter, Result, Teacher, TeacherUpdate};
use tracing::{debug, instrument};

use super::{date_from_sql, date_to_sql};
use crate::errors::InfraError;
use crate::storage::SqlitePool;

const COLUMNS: &str = "id, first_name, last_name, email, phone, hourly, hire_date";

/// SQLite implementation of TeacherRepository
pub struct SqliteTeacherRepository {
    pool: SqlitePool,
}

impl SqliteTeacherRepository {
    /// Create a new teacher repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn row_to_teacher(row: &Row<'_>) -> rusqlite::Result<Teacher> {
    let hire_date: String = row.get(6)?;
    Ok(Teacher {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        email: row.get(3)?,
        phone: row.get(4)?,
        hourly: row.get(5)?,
        hire_date: date_from_sql(6, &hire_date)?,
    })
}

#[async_trait]
impl TeacherRepository for SqliteTeacherRepository {
    #[instrument(skip(self, teacher), fields(email = %teacher.email))]
    async fn insert(&self, teacher: NewTeacher) -> Result<Teacher> {
        let hire_date = teacher.hire_date.unwrap_or_else(|| Utc::now().date_naive());

        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO teachers (first_name, last_name, email, phone, hourly, hire_date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                teacher.first_name,
                teacher.last_name,
                teacher.email,
                teacher.phone,
                teacher.hourly,
                date_to_sql(hire_date),
            ],
        )
        .map_err(InfraError::from)?;

        let id = conn.last_insert_rowid();
        debug!(teacher_id = id, "teacher inserted");

        Ok(Teacher {
            id,
            first_name: teacher.first_name,
            last_name: teacher.last_name,
            email: teacher.email,
            phone: teacher.phone,
            hourly: teacher.hourly,
            hire_date,
        })
    }

    #[instrument(skip(self))]
    async fn find(&self, id: i64) -> Result<Option<Teacher>> {
        let conn = self.pool.get()?;
        conn.query_row(
            &format!("SELECT {COLUMNS} FROM teachers WHERE id = ?1"),
            [id],
            row_to_teacher,
        )
        .optional()
        .map_err(|e| InfraError::from(e).into())
    }

    #[instrument(skip(self, update))]
    async fn update(&self, id: i64, update: TeacherUpdate) -> Result<bool> {
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
        if let Some(hourly) = update.hourly {
            sets.push("hourly = ?");
            values.push(Box::new(hourly));
        }
        if let Some(hire_date) = update.hire_date {
            sets.push("hire_date = ?");
            values.push(Box::new(date_to_sql(hire_date)));
        }
        values.push(Box::new(id));

        let conn = self.pool.get()?;
        let sql = format!("UPDATE teachers SET {} WHERE id = ?", sets.join(", "));
        let params: Vec<&dyn ToSql> = values.iter().map(|value| value.as_ref()).collect();
        let affected = conn.execute(&sql, &params[..]).map_err(InfraError::from)?;
        Ok(affected > 0)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: i64) -> Result<bool> {
        let conn = self.pool.get()?;
        let affected = conn
            .execute("DELETE FROM teachers WHERE id = ?1", [id])
            .map_err(InfraError::from)?;
        Ok(affected > 0)
    }

    #[instrument(skip(self, filter))]
    async fn list(&self, filter: &PersonFilter, page: Page) -> Result<Vec<Teacher>> {
        let mut sql = format!("SELECT {COLUMNS} FROM teachers WHERE 1 = 1");
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
            .query_map(&params[..], row_to_teacher)
            .map_err(InfraError::from)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(InfraError::from)?;

        debug!(count = rows.len(), "listed teachers");
        Ok(rows)
    }
}
