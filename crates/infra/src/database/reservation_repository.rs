//! SQLite-backed implementation of the ReservationRepository port.

use async_trait::async_trait;
use rusqlite::{params, TransactionBehavior};
use semester_core::reservations::ports::ReservationRepository;
use semester_core::scheduling::ports::ClassRepository;
use semester_domain::{Class, Result, SemesterError, Student};
use tracing::{debug, instrument};

use super::class_repository::SqliteClassRepository;
use crate::errors::InfraError;
use crate::storage::SqlitePool;

/// SQLite implementation of ReservationRepository
pub struct SqliteReservationRepository {
    pool: SqlitePool,
}

impl SqliteReservationRepository {
    /// Create a new reservation repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReservationRepository for SqliteReservationRepository {
    #[instrument(skip(self))]
    async fn roster(&self, class_id: i64) -> Result<Vec<Student>> {
        let conn = self.pool.get()?;
        let mut stmt = conn
            .prepare(
                "SELECT s.id, s.first_name, s.last_name, s.email, s.phone, s.parent_phone,
                        s.birth_year
                 FROM students s
                 JOIN reservations r ON r.student_id = s.id
                 WHERE r.class_id = ?1
                 ORDER BY r.id",
            )
            .map_err(InfraError::from)?;
        let rows = stmt
            .query_map([class_id], |row| {
                Ok(Student {
                    id: row.get(0)?,
                    first_name: row.get(1)?,
                    last_name: row.get(2)?,
                    email: row.get(3)?,
                    phone: row.get(4)?,
                    parent_phone: row.get(5)?,
                    birth_year: row.get(6)?,
                })
            })
            .map_err(InfraError::from)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(InfraError::from)?;
        Ok(rows)
    }

    #[instrument(skip(self))]
    async fn classes_for_student(&self, student_id: i64) -> Result<Vec<Class>> {
        // Reuse the class row decoding; the join table only contributes ids.
        let class_ids: Vec<i64> = {
            let conn = self.pool.get()?;
            let mut stmt = conn
                .prepare(
                    "SELECT class_id FROM reservations WHERE student_id = ?1 ORDER BY id",
                )
                .map_err(InfraError::from)?;
            let ids = stmt
                .query_map([student_id], |row| row.get(0))
                .map_err(InfraError::from)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(InfraError::from)?;
            ids
        };

        let classes = SqliteClassRepository::new(self.pool.clone());
        let mut result = Vec::with_capacity(class_ids.len());
        for id in class_ids {
            if let Some(class) = classes.find(id).await? {
                result.push(class);
            }
        }
        Ok(result)
    }

    #[instrument(skip(self))]
    async fn contains(&self, class_id: i64, student_id: i64) -> Result<bool> {
        let conn = self.pool.get()?;
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM reservations WHERE class_id = ?1 AND student_id = ?2",
                params![class_id, student_id],
                |row| row.get(0),
            )
            .map_err(InfraError::from)?;
        Ok(count > 0)
    }

    /// Insert the join row, re-validating capacity under the write lock.
    ///
    /// The capacity count and the insert share one immediate transaction,
    /// so two concurrent reservations cannot both observe a free seat and
    /// both commit. The UNIQUE constraint on the pair turns a double
    /// reservation into a Conflict.
    #[instrument(skip(self))]
    async fn append(&self, class_id: i64, student_id: i64) -> Result<()> {
        let mut conn = self.pool.get()?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(InfraError::from)?;

        let class_size: i64 = tx
            .query_row("SELECT class_size FROM classes WHERE id = ?1", [class_id], |row| {
                row.get(0)
            })
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => {
                    SemesterError::NotFound(format!("class id {class_id}"))
                }
                other => InfraError::from(other).into(),
            })?;
        let taken: i64 = tx
            .query_row(
                "SELECT COUNT(*) FROM reservations WHERE class_id = ?1",
                [class_id],
                |row| row.get(0),
            )
            .map_err(InfraError::from)?;
        if taken >= class_size {
            // dropping the transaction rolls back
            return Err(SemesterError::Conflict(format!(
                "class id {class_id} is full ({class_size} seats)"
            )));
        }

        tx.execute(
            "INSERT INTO reservations (student_id, class_id) VALUES (?1, ?2)",
            params![student_id, class_id],
        )
        .map_err(InfraError::from)?;
        tx.commit().map_err(InfraError::from)?;

        debug!(class_id, student_id, "reservation inserted");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn remove(&self, class_id: i64, student_id: i64) -> Result<bool> {
        let conn = self.pool.get()?;
        let affected = conn
            .execute(
                "DELETE FROM reservations WHERE class_id = ?1 AND student_id = ?2",
                params![class_id, student_id],
            )
            .map_err(InfraError::from)?;
        Ok(affected > 0)
    }
}
