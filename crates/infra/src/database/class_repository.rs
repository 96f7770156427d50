//! SQLite-backed implementation of the ClassRepository port.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::Type;
use rusqlite::{params, OptionalExtension, Row, ToSql};
use semester_core::scheduling::ports::ClassRepository;
use semester_domain::{Class, ClassFilter, ClassUpdate, NewClass, Page, Recurrence, Result};
use tracing::{debug, instrument};

use super::timestamp_from_sql;
use crate::errors::InfraError;
use crate::storage::SqlitePool;

const COLUMNS: &str =
    "id, name, teacher_id, class_size, start_ts, end_ts, description, recurrence, event_id";

/// SQLite implementation of ClassRepository
pub struct SqliteClassRepository {
    pool: SqlitePool,
}

impl SqliteClassRepository {
    /// Create a new class repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn recurrence_to_sql(recurrence: Option<&Recurrence>) -> rusqlite::Result<Option<String>> {
    recurrence
        .map(|r| {
            serde_json::to_string(r).map_err(|e| {
                rusqlite::Error::ToSqlConversionFailure(Box::new(e))
            })
        })
        .transpose()
}

fn row_to_class(row: &Row<'_>) -> rusqlite::Result<Class> {
    let start_ts: i64 = row.get(4)?;
    let end_ts: i64 = row.get(5)?;
    let recurrence: Option<String> = row.get(7)?;
    let recurrence = recurrence
        .map(|json| {
            serde_json::from_str(&json).map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(7, Type::Text, Box::new(e))
            })
        })
        .transpose()?;
    Ok(Class {
        id: row.get(0)?,
        name: row.get(1)?,
        teacher_id: row.get(2)?,
        class_size: row.get(3)?,
        start: timestamp_from_sql(4, start_ts)?,
        end: timestamp_from_sql(5, end_ts)?,
        description: row.get(6)?,
        recurrence,
        event_id: row.get(8)?,
    })
}

#[async_trait]
impl ClassRepository for SqliteClassRepository {
    #[instrument(skip(self, class), fields(name = %class.name))]
    async fn insert(&self, class: NewClass, event_id: &str) -> Result<Class> {
        let recurrence_json =
            recurrence_to_sql(class.recurrence.as_ref()).map_err(InfraError::from)?;

        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO classes
                (name, teacher_id, class_size, start_ts, end_ts, description, recurrence, event_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                class.name,
                class.teacher_id,
                class.class_size,
                class.start.timestamp(),
                class.end.timestamp(),
                class.description,
                recurrence_json,
                event_id,
            ],
        )
        .map_err(InfraError::from)?;

        let id = conn.last_insert_rowid();
        debug!(class_id = id, "class inserted");

        Ok(Class {
            id,
            name: class.name,
            teacher_id: class.teacher_id,
            class_size: class.class_size,
            start: class.start,
            end: class.end,
            description: class.description,
            recurrence: class.recurrence,
            event_id: event_id.to_string(),
        })
    }

    #[instrument(skip(self))]
    async fn find(&self, id: i64) -> Result<Option<Class>> {
        let conn = self.pool.get()?;
        conn.query_row(&format!("SELECT {COLUMNS} FROM classes WHERE id = ?1"), [id], row_to_class)
            .optional()
            .map_err(|e| InfraError::from(e).into())
    }

    #[instrument(skip(self, name))]
    async fn find_by_signature(
        &self,
        name: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Option<Class>> {
        let conn = self.pool.get()?;
        conn.query_row(
            &format!(
                "SELECT {COLUMNS} FROM classes
                 WHERE name = ?1 AND start_ts = ?2 AND end_ts = ?3"
            ),
            params![name, start.timestamp(), end.timestamp()],
            row_to_class,
        )
        .optional()
        .map_err(|e| InfraError::from(e).into())
    }

    #[instrument(skip(self, update))]
    async fn update(&self, id: i64, update: ClassUpdate) -> Result<bool> {
        if update.is_empty() {
            return Ok(self.find(id).await?.is_some());
        }

        let mut sets: Vec<&str> = Vec::new();
        let mut values: Vec<Box<dyn ToSql>> = Vec::new();
        if let Some(name) = update.name {
            sets.push("name = ?");
            values.push(Box::new(name));
        }
        if let Some(teacher_id) = update.teacher_id {
            sets.push("teacher_id = ?");
            values.push(Box::new(teacher_id));
        }
        if let Some(class_size) = update.class_size {
            sets.push("class_size = ?");
            values.push(Box::new(class_size));
        }
        if let Some(start) = update.start {
            sets.push("start_ts = ?");
            values.push(Box::new(start.timestamp()));
        }
        if let Some(end) = update.end {
            sets.push("end_ts = ?");
            values.push(Box::new(end.timestamp()));
        }
        if let Some(description) = update.description {
            sets.push("description = ?");
            values.push(Box::new(description));
        }
        values.push(Box::new(id));

        let conn = self.pool.get()?;
        let sql = format!("UPDATE classes SET {} WHERE id = ?", sets.join(", "));
        let params: Vec<&dyn ToSql> = values.iter().map(|value| value.as_ref()).collect();
        let affected = conn.execute(&sql, &params[..]).map_err(InfraError::from)?;
        Ok(affected > 0)
    }

    /// Delete the class row together with its invoices and reservations.
    ///
    /// One transaction: either all dependent records go with the class or
    /// nothing does.
    #[instrument(skip(self))]
    async fn delete_cascade(&self, id: i64) -> Result<()> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction().map_err(InfraError::from)?;

        let invoices = tx
            .execute("DELETE FROM invoices WHERE class_id = ?1", [id])
            .map_err(InfraError::from)?;
        let reservations = tx
            .execute("DELETE FROM reservations WHERE class_id = ?1", [id])
            .map_err(InfraError::from)?;
        tx.execute("DELETE FROM classes WHERE id = ?1", [id]).map_err(InfraError::from)?;

        tx.commit().map_err(InfraError::from)?;
        debug!(class_id = id, invoices, reservations, "class deleted with dependents");
        Ok(())
    }

    #[instrument(skip(self, filter))]
    async fn list(&self, filter: &ClassFilter, page: Page) -> Result<Vec<Class>> {
        let mut sql = format!("SELECT {COLUMNS} FROM classes WHERE 1 = 1");
        let mut values: Vec<Box<dyn ToSql>> = Vec::new();
        if let Some(name) = &filter.name {
            sql.push_str(" AND name LIKE ?");
            values.push(Box::new(format!("%{name}%")));
        }
        if let Some(start_date) = filter.start_date {
            // classes starting on this calendar date (UTC)
            let (day_start, day_end) = day_bounds(start_date);
            sql.push_str(" AND start_ts >= ? AND start_ts < ?");
            values.push(Box::new(day_start));
            values.push(Box::new(day_end));
        }
        if let Some(description) = &filter.description {
            sql.push_str(" AND description LIKE ?");
            values.push(Box::new(format!("%{description}%")));
        }
        sql.push_str(" ORDER BY start_ts LIMIT ? OFFSET ?");
        values.push(Box::new(page.limit()));
        values.push(Box::new(page.offset()));

        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&sql).map_err(InfraError::from)?;
        let params: Vec<&dyn ToSql> = values.iter().map(|value| value.as_ref()).collect();
        let rows = stmt
            .query_map(&params[..], row_to_class)
            .map_err(InfraError::from)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(InfraError::from)?;

        debug!(count = rows.len(), "listed classes");
        Ok(rows)
    }

    #[instrument(skip(self))]
    async fn list_for_teacher(&self, teacher_id: i64) -> Result<Vec<Class>> {
        let conn = self.pool.get()?;
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {COLUMNS} FROM classes WHERE teacher_id = ?1 ORDER BY start_ts"
            ))
            .map_err(InfraError::from)?;
        let rows = stmt
            .query_map([teacher_id], row_to_class)
            .map_err(InfraError::from)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(InfraError::from)?;
        Ok(rows)
    }
}

/// Epoch-second bounds `[start, end)` of a UTC calendar date
fn day_bounds(date: NaiveDate) -> (i64, i64) {
    let start = date.and_hms_opt(0, 0, 0).map_or(0, |dt| dt.and_utc().timestamp());
    (start, start + 86_400)
}
