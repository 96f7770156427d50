//! SQLite-backed implementation of the WorkHourRepository port.

use async_trait::async_trait;
use chrono::NaiveDate;
use rusqlite::{params, Row, ToSql};
use semester_core::billing::ports::WorkHourRepository;
use semester_domain::{NewWorkHourLog, Page, Result, WorkHourFilter, WorkHourLog};
use tracing::{debug, instrument};

use super::{date_from_sql, date_to_sql};
use crate::errors::InfraError;
use crate::storage::SqlitePool;

/// SQLite implementation of WorkHourRepository
pub struct SqliteWorkHourRepository {
    pool: SqlitePool,
}

impl SqliteWorkHourRepository {
    /// Create a new work-hour repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn row_to_log(row: &Row<'_>) -> rusqlite::Result<WorkHourLog> {
    let date: String = row.get(2)?;
    Ok(WorkHourLog {
        id: row.get(0)?,
        teacher_id: row.get(1)?,
        date: date_from_sql(2, &date)?,
        hours: row.get(3)?,
    })
}

#[async_trait]
impl WorkHourRepository for SqliteWorkHourRepository {
    #[instrument(skip(self))]
    async fn exists(&self, teacher_id: i64, date: NaiveDate, hours: f64) -> Result<bool> {
        let conn = self.pool.get()?;
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM work_hours
                 WHERE teacher_id = ?1 AND date = ?2 AND hours = ?3",
                params![teacher_id, date_to_sql(date), hours],
                |row| row.get(0),
            )
            .map_err(InfraError::from)?;
        Ok(count > 0)
    }

    #[instrument(skip(self, log), fields(teacher_id = log.teacher_id, date = %log.date))]
    async fn insert(&self, log: NewWorkHourLog) -> Result<WorkHourLog> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO work_hours (teacher_id, date, hours) VALUES (?1, ?2, ?3)",
            params![log.teacher_id, date_to_sql(log.date), log.hours],
        )
        .map_err(InfraError::from)?;

        let id = conn.last_insert_rowid();
        debug!(log_id = id, "work hours logged");

        Ok(WorkHourLog { id, teacher_id: log.teacher_id, date: log.date, hours: log.hours })
    }

    #[instrument(skip(self, filter))]
    async fn list(&self, filter: &WorkHourFilter, page: Page) -> Result<Vec<WorkHourLog>> {
        let mut sql = String::from("SELECT id, teacher_id, date, hours FROM work_hours WHERE 1 = 1");
        let mut values: Vec<Box<dyn ToSql>> = Vec::new();
        if let Some(teacher_id) = filter.teacher_id {
            sql.push_str(" AND teacher_id = ?");
            values.push(Box::new(teacher_id));
        }
        if let Some(period) = filter.period {
            sql.push_str(" AND date BETWEEN ? AND ?");
            values.push(Box::new(date_to_sql(period.start)));
            values.push(Box::new(date_to_sql(period.end)));
        }
        sql.push_str(" ORDER BY date, id LIMIT ? OFFSET ?");
        values.push(Box::new(page.limit()));
        values.push(Box::new(page.offset()));

        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&sql).map_err(InfraError::from)?;
        let params: Vec<&dyn ToSql> = values.iter().map(|value| value.as_ref()).collect();
        let rows = stmt
            .query_map(&params[..], row_to_log)
            .map_err(InfraError::from)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(InfraError::from)?;

        debug!(count = rows.len(), "listed work hours");
        Ok(rows)
    }

    #[instrument(skip(self))]
    async fn in_period(
        &self,
        teacher_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<WorkHourLog>> {
        let conn = self.pool.get()?;
        let mut stmt = conn
            .prepare(
                "SELECT id, teacher_id, date, hours FROM work_hours
                 WHERE teacher_id = ?1 AND date BETWEEN ?2 AND ?3
                 ORDER BY date, id",
            )
            .map_err(InfraError::from)?;
        let rows = stmt
            .query_map(params![teacher_id, date_to_sql(start), date_to_sql(end)], row_to_log)
            .map_err(InfraError::from)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(InfraError::from)?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use semester_domain::SemesterError;

    use super::*;
    use crate::database::test_support::{seed_teacher, test_pool};

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    #[tokio::test]
    async fn exact_duplicate_triple_is_conflict_at_the_constraint() {
        let (pool, _temp) = test_pool();
        let repo = SqliteWorkHourRepository::new(pool.clone());
        let teacher = seed_teacher(&pool, "t@example.com", 20.0).await;

        let log = NewWorkHourLog { teacher_id: teacher.id, date: date(1), hours: 5.0 };
        repo.insert(log.clone()).await.unwrap();
        assert!(repo.exists(teacher.id, date(1), 5.0).await.unwrap());

        let err = repo.insert(log).await.unwrap_err();
        assert!(matches!(err, SemesterError::Conflict(_)));

        // different hours on the same date is a separate shift
        repo.insert(NewWorkHourLog { teacher_id: teacher.id, date: date(1), hours: 3.0 })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn in_period_is_inclusive_on_both_ends() {
        let (pool, _temp) = test_pool();
        let repo = SqliteWorkHourRepository::new(pool.clone());
        let teacher = seed_teacher(&pool, "t@example.com", 20.0).await;

        for d in [1, 15, 31] {
            repo.insert(NewWorkHourLog { teacher_id: teacher.id, date: date(d), hours: 2.0 })
                .await
                .unwrap();
        }

        let logs = repo.in_period(teacher.id, date(1), date(31)).await.unwrap();
        assert_eq!(logs.len(), 3);

        let partial = repo.in_period(teacher.id, date(2), date(30)).await.unwrap();
        assert_eq!(partial.len(), 1);
    }

    #[tokio::test]
    async fn list_filters_by_teacher_and_period() {
        let (pool, _temp) = test_pool();
        let repo = SqliteWorkHourRepository::new(pool.clone());
        let first = seed_teacher(&pool, "a@example.com", 20.0).await;
        let second = seed_teacher(&pool, "b@example.com", 22.0).await;

        repo.insert(NewWorkHourLog { teacher_id: first.id, date: date(1), hours: 2.0 })
            .await
            .unwrap();
        repo.insert(NewWorkHourLog { teacher_id: second.id, date: date(1), hours: 4.0 })
            .await
            .unwrap();

        let logs = repo
            .list(
                &WorkHourFilter { teacher_id: Some(first.id), period: None },
                Page::default(),
            )
            .await
            .unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].teacher_id, first.id);
    }
}
