//! SQLite-backed implementation of the PaycheckRepository port.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rusqlite::{params, OptionalExtension, Row, ToSql};
use semester_core::billing::ports::PaycheckRepository;
use semester_domain::{NewPaycheck, Page, Paycheck, PaycheckFilter, Result};
use tracing::{debug, instrument};

use super::{date_from_sql, date_to_sql};
use crate::errors::InfraError;
use crate::storage::SqlitePool;

const COLUMNS: &str = "id, teacher_id, start_date, end_date, work_hours, school_hours, hourly, \
                       amount, creation_date, payment_status, payment_date";

/// SQLite implementation of PaycheckRepository
pub struct SqlitePaycheckRepository {
    pool: SqlitePool,
}

impl SqlitePaycheckRepository {
    /// Create a new paycheck repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn row_to_paycheck(row: &Row<'_>) -> rusqlite::Result<Paycheck> {
    let start_date: String = row.get(2)?;
    let end_date: String = row.get(3)?;
    let creation_date: String = row.get(8)?;
    let payment_date: Option<String> = row.get(10)?;
    Ok(Paycheck {
        id: row.get(0)?,
        teacher_id: row.get(1)?,
        start_date: date_from_sql(2, &start_date)?,
        end_date: date_from_sql(3, &end_date)?,
        work_hours: row.get(4)?,
        school_hours: row.get(5)?,
        hourly: row.get(6)?,
        amount: row.get(7)?,
        creation_date: date_from_sql(8, &creation_date)?,
        payment_status: row.get(9)?,
        payment_date: payment_date.as_deref().map(|d| date_from_sql(10, d)).transpose()?,
    })
}

#[async_trait]
impl PaycheckRepository for SqlitePaycheckRepository {
    #[instrument(skip(self))]
    async fn exists_for_period(
        &self,
        teacher_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<bool> {
        let conn = self.pool.get()?;
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM paychecks
                 WHERE teacher_id = ?1 AND start_date = ?2 AND end_date = ?3",
                params![teacher_id, date_to_sql(start), date_to_sql(end)],
                |row| row.get(0),
            )
            .map_err(InfraError::from)?;
        Ok(count > 0)
    }

    #[instrument(skip(self, paycheck), fields(teacher_id = paycheck.teacher_id))]
    async fn insert(&self, paycheck: NewPaycheck) -> Result<Paycheck> {
        let creation_date = Utc::now().date_naive();

        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO paychecks
                (teacher_id, start_date, end_date, work_hours, school_hours, hourly, amount,
                 creation_date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                paycheck.teacher_id,
                date_to_sql(paycheck.start_date),
                date_to_sql(paycheck.end_date),
                paycheck.work_hours,
                paycheck.school_hours,
                paycheck.hourly,
                paycheck.amount,
                date_to_sql(creation_date),
            ],
        )
        .map_err(InfraError::from)?;

        let id = conn.last_insert_rowid();
        debug!(paycheck_id = id, "paycheck inserted");

        Ok(Paycheck {
            id,
            teacher_id: paycheck.teacher_id,
            start_date: paycheck.start_date,
            end_date: paycheck.end_date,
            work_hours: paycheck.work_hours,
            school_hours: paycheck.school_hours,
            hourly: paycheck.hourly,
            amount: paycheck.amount,
            creation_date,
            payment_status: false,
            payment_date: None,
        })
    }

    #[instrument(skip(self))]
    async fn find(&self, id: i64) -> Result<Option<Paycheck>> {
        let conn = self.pool.get()?;
        conn.query_row(
            &format!("SELECT {COLUMNS} FROM paychecks WHERE id = ?1"),
            [id],
            row_to_paycheck,
        )
        .optional()
        .map_err(|e| InfraError::from(e).into())
    }

    #[instrument(skip(self, filter))]
    async fn list(&self, filter: &PaycheckFilter, page: Page) -> Result<Vec<Paycheck>> {
        let mut sql = format!("SELECT {COLUMNS} FROM paychecks WHERE 1 = 1");
        let mut values: Vec<Box<dyn ToSql>> = Vec::new();
        if let Some(teacher_id) = filter.teacher_id {
            sql.push_str(" AND teacher_id = ?");
            values.push(Box::new(teacher_id));
        }
        if let Some(paid) = filter.paid {
            sql.push_str(" AND payment_status = ?");
            values.push(Box::new(paid));
        }
        if let Some(period) = filter.period {
            sql.push_str(" AND start_date >= ? AND end_date <= ?");
            values.push(Box::new(date_to_sql(period.start)));
            values.push(Box::new(date_to_sql(period.end)));
        }
        sql.push_str(" ORDER BY id LIMIT ? OFFSET ?");
        values.push(Box::new(page.limit()));
        values.push(Box::new(page.offset()));

        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&sql).map_err(InfraError::from)?;
        let params: Vec<&dyn ToSql> = values.iter().map(|value| value.as_ref()).collect();
        let rows = stmt
            .query_map(&params[..], row_to_paycheck)
            .map_err(InfraError::from)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(InfraError::from)?;

        debug!(count = rows.len(), "listed paychecks");
        Ok(rows)
    }

    #[instrument(skip(self))]
    async fn mark_paid(&self, id: i64, date: NaiveDate) -> Result<Option<Paycheck>> {
        let conn = self.pool.get()?;
        let affected = conn
            .execute(
                "UPDATE paychecks SET payment_status = 1, payment_date = ?1 WHERE id = ?2",
                params![date_to_sql(date), id],
            )
            .map_err(InfraError::from)?;
        if affected == 0 {
            return Ok(None);
        }
        drop(conn);
        self.find(id).await
    }
}

#[cfg(test)]
mod tests {
    use semester_domain::{DateRange, SemesterError};

    use super::*;
    use crate::database::test_support::{seed_teacher, test_pool};

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn paycheck_for(teacher_id: i64, start: NaiveDate, end: NaiveDate) -> NewPaycheck {
        NewPaycheck {
            teacher_id,
            start_date: start,
            end_date: end,
            work_hours: 45.0,
            school_hours: 60.0,
            hourly: 20.0,
            amount: 1200.0,
        }
    }

    #[tokio::test]
    async fn insert_and_find_round_trip() {
        let (pool, _temp) = test_pool();
        let repo = SqlitePaycheckRepository::new(pool.clone());
        let teacher = seed_teacher(&pool, "t@example.com", 20.0).await;

        let created = repo.insert(paycheck_for(teacher.id, date(1), date(31))).await.unwrap();
        let found = repo.find(created.id).await.unwrap().unwrap();
        assert_eq!(found, created);
        assert!(!found.payment_status);
        assert!(found.payment_date.is_none());
    }

    #[tokio::test]
    async fn duplicate_period_is_conflict_at_the_constraint() {
        let (pool, _temp) = test_pool();
        let repo = SqlitePaycheckRepository::new(pool.clone());
        let teacher = seed_teacher(&pool, "t@example.com", 20.0).await;

        repo.insert(paycheck_for(teacher.id, date(1), date(31))).await.unwrap();
        assert!(repo.exists_for_period(teacher.id, date(1), date(31)).await.unwrap());

        let err = repo.insert(paycheck_for(teacher.id, date(1), date(31))).await.unwrap_err();
        assert!(matches!(err, SemesterError::Conflict(_)));

        // a different period for the same teacher is fine
        repo.insert(paycheck_for(teacher.id, date(1), date(15))).await.unwrap();
    }

    #[tokio::test]
    async fn mark_paid_stamps_payment_date() {
        let (pool, _temp) = test_pool();
        let repo = SqlitePaycheckRepository::new(pool.clone());
        let teacher = seed_teacher(&pool, "t@example.com", 20.0).await;

        let created = repo.insert(paycheck_for(teacher.id, date(1), date(31))).await.unwrap();
        let paid = repo.mark_paid(created.id, date(31)).await.unwrap().unwrap();
        assert!(paid.payment_status);
        assert_eq!(paid.payment_date, Some(date(31)));

        assert!(repo.mark_paid(404, date(31)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_filters_by_paid_and_period() {
        let (pool, _temp) = test_pool();
        let repo = SqlitePaycheckRepository::new(pool.clone());
        let teacher = seed_teacher(&pool, "t@example.com", 20.0).await;

        let first = repo.insert(paycheck_for(teacher.id, date(1), date(15))).await.unwrap();
        repo.insert(paycheck_for(teacher.id, date(16), date(31))).await.unwrap();
        repo.mark_paid(first.id, date(16)).await.unwrap();

        let paid = repo
            .list(
                &PaycheckFilter { paid: Some(true), ..Default::default() },
                Page::default(),
            )
            .await
            .unwrap();
        assert_eq!(paid.len(), 1);
        assert_eq!(paid[0].id, first.id);

        let in_range = repo
            .list(
                &PaycheckFilter {
                    period: Some(DateRange { start: date(1), end: date(15) }),
                    ..Default::default()
                },
                Page::default(),
            )
            .await
            .unwrap();
        assert_eq!(in_range.len(), 1);
    }
}
