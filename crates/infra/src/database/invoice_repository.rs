//! SQLite-backed implementation of the InvoiceRepository port.

use async_trait::async_trait;
use rusqlite::{params, OptionalExtension, Row, ToSql};
use semester_core::billing::ports::InvoiceRepository;
use semester_domain::{Invoice, InvoiceFilter, NewInvoice, Page, Result};
use tracing::{debug, instrument};

use super::{date_from_sql, date_to_sql};
use crate::errors::InfraError;
use crate::storage::SqlitePool;

const COLUMNS: &str =
    "id, student_id, class_id, invoice_date, description, amount, payment_status";

/// SQLite implementation of InvoiceRepository
pub struct SqliteInvoiceRepository {
    pool: SqlitePool,
}

impl SqliteInvoiceRepository {
    /// Create a new invoice repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn row_to_invoice(row: &Row<'_>) -> rusqlite::Result<Invoice> {
    let invoice_date: String = row.get(3)?;
    Ok(Invoice {
        id: row.get(0)?,
        student_id: row.get(1)?,
        class_id: row.get(2)?,
        invoice_date: date_from_sql(3, &invoice_date)?,
        description: row.get(4)?,
        amount: row.get(5)?,
        payment_status: row.get(6)?,
    })
}

#[async_trait]
impl InvoiceRepository for SqliteInvoiceRepository {
    #[instrument(skip(self, invoice), fields(student_id = invoice.student_id))]
    async fn insert(&self, invoice: NewInvoice) -> Result<Invoice> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO invoices (student_id, class_id, invoice_date, description, amount)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                invoice.student_id,
                invoice.class_id,
                date_to_sql(invoice.invoice_date),
                invoice.description,
                invoice.amount,
            ],
        )
        .map_err(InfraError::from)?;

        let id = conn.last_insert_rowid();
        debug!(invoice_id = id, "invoice inserted");

        Ok(Invoice {
            id,
            student_id: invoice.student_id,
            class_id: invoice.class_id,
            invoice_date: invoice.invoice_date,
            description: invoice.description,
            amount: invoice.amount,
            payment_status: false,
        })
    }

    #[instrument(skip(self))]
    async fn find(&self, id: i64) -> Result<Option<Invoice>> {
        let conn = self.pool.get()?;
        conn.query_row(
            &format!("SELECT {COLUMNS} FROM invoices WHERE id = ?1"),
            [id],
            row_to_invoice,
        )
        .optional()
        .map_err(|e| InfraError::from(e).into())
    }

    #[instrument(skip(self, filter))]
    async fn list(&self, filter: &InvoiceFilter, page: Page) -> Result<Vec<Invoice>> {
        let mut sql = format!("SELECT {COLUMNS} FROM invoices WHERE 1 = 1");
        let mut values: Vec<Box<dyn ToSql>> = Vec::new();
        if let Some(payment_status) = filter.payment_status {
            sql.push_str(" AND payment_status = ?");
            values.push(Box::new(payment_status));
        }
        if let Some(invoice_date) = filter.invoice_date {
            sql.push_str(" AND invoice_date = ?");
            values.push(Box::new(date_to_sql(invoice_date)));
        }
        sql.push_str(" ORDER BY id LIMIT ? OFFSET ?");
        values.push(Box::new(page.limit()));
        values.push(Box::new(page.offset()));

        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&sql).map_err(InfraError::from)?;
        let params: Vec<&dyn ToSql> = values.iter().map(|value| value.as_ref()).collect();
        let rows = stmt
            .query_map(&params[..], row_to_invoice)
            .map_err(InfraError::from)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(InfraError::from)?;

        debug!(count = rows.len(), "listed invoices");
        Ok(rows)
    }

    #[instrument(skip(self))]
    async fn mark_paid(&self, id: i64) -> Result<Option<Invoice>> {
        let conn = self.pool.get()?;
        let affected = conn
            .execute("UPDATE invoices SET payment_status = 1 WHERE id = ?1", [id])
            .map_err(InfraError::from)?;
        if affected == 0 {
            return Ok(None);
        }
        drop(conn);
        self.find(id).await
    }

    #[instrument(skip(self))]
    async fn delete_for_reservation(&self, student_id: i64, class_id: i64) -> Result<usize> {
        let conn = self.pool.get()?;
        let affected = conn
            .execute(
                "DELETE FROM invoices WHERE student_id = ?1 AND class_id = ?2",
                params![student_id, class_id],
            )
            .map_err(InfraError::from)?;
        debug!(student_id, class_id, affected, "deleted reservation invoices");
        Ok(affected)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::database::test_support::{seed_class, seed_student, seed_teacher, test_pool};

    fn invoice_for(student_id: i64, class_id: Option<i64>, amount: f64) -> NewInvoice {
        NewInvoice {
            student_id,
            class_id,
            invoice_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            description: "Reservation for: Algebra".into(),
            amount,
        }
    }

    #[tokio::test]
    async fn insert_starts_unpaid_and_mark_paid_flips_status() {
        let (pool, _temp) = test_pool();
        let repo = SqliteInvoiceRepository::new(pool.clone());
        let student = seed_student(&pool, "s@example.com").await;

        let created = repo.insert(invoice_for(student.id, None, 90.0)).await.unwrap();
        assert!(!created.payment_status);

        let paid = repo.mark_paid(created.id).await.unwrap().unwrap();
        assert!(paid.payment_status);

        // idempotent
        let repaid = repo.mark_paid(created.id).await.unwrap().unwrap();
        assert!(repaid.payment_status);

        assert!(repo.mark_paid(404).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_for_reservation_is_scoped_to_the_pair() {
        let (pool, _temp) = test_pool();
        let repo = SqliteInvoiceRepository::new(pool.clone());
        let teacher = seed_teacher(&pool, "t@example.com", 20.0).await;
        let student = seed_student(&pool, "s@example.com").await;
        let algebra = seed_class(&pool, teacher.id, "Algebra", 5, "evt-1").await;
        let geometry = seed_class(&pool, teacher.id, "Geometry", 5, "evt-2").await;

        repo.insert(invoice_for(student.id, Some(algebra.id), 100.0)).await.unwrap();
        repo.insert(invoice_for(student.id, Some(geometry.id), 80.0)).await.unwrap();

        let removed = repo.delete_for_reservation(student.id, algebra.id).await.unwrap();
        assert_eq!(removed, 1);

        let remaining = repo.list(&InvoiceFilter::default(), Page::default()).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].class_id, Some(geometry.id));
    }

    #[tokio::test]
    async fn list_filters_by_payment_status_and_date() {
        let (pool, _temp) = test_pool();
        let repo = SqliteInvoiceRepository::new(pool.clone());
        let student = seed_student(&pool, "s@example.com").await;

        let first = repo.insert(invoice_for(student.id, None, 50.0)).await.unwrap();
        repo.insert(invoice_for(student.id, None, 60.0)).await.unwrap();
        repo.mark_paid(first.id).await.unwrap();

        let paid = repo
            .list(
                &InvoiceFilter { payment_status: Some(true), ..Default::default() },
                Page::default(),
            )
            .await
            .unwrap();
        assert_eq!(paid.len(), 1);
        assert_eq!(paid[0].id, first.id);

        let on_date = repo
            .list(
                &InvoiceFilter {
                    invoice_date: NaiveDate::from_ymd_opt(2024, 6, 1),
                    ..Default::default()
                },
                Page::default(),
            )
            .await
            .unwrap();
        assert_eq!(on_date.len(), 2);
    }
}
