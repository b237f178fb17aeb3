//! # Invoice Repository
//!
//! Database operations for invoices. Totals are stored as given; the
//! consistency rule is enforced before anything reaches this layer.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use tracing::debug;

use invoices_core::{Invoice, RecordMeta, Repository};

use super::group_detail_ids;
use crate::error::{DbError, DbResult};

const INVOICE_COLUMNS: &str = "id, client_id, client_name, total_before_taxes, taxes, \
                               total_after_taxes, created_at, updated_at";

/// One row of the `invoices` table.
#[derive(Debug, FromRow)]
struct InvoiceRow {
    id: i64,
    client_id: String,
    client_name: String,
    total_before_taxes: f64,
    taxes: f64,
    total_after_taxes: f64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl InvoiceRow {
    fn into_invoice(self, invoice_detail_ids: Vec<i64>) -> Invoice {
        Invoice {
            meta: RecordMeta {
                id: Some(self.id),
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
            client_id: self.client_id,
            client_name: self.client_name,
            total_before_taxes: self.total_before_taxes,
            taxes: self.taxes,
            total_after_taxes: self.total_after_taxes,
            invoice_detail_ids,
        }
    }
}

/// Repository for invoice database operations.
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    pool: SqlitePool,
}

impl InvoiceRepository {
    /// Creates a new InvoiceRepository.
    pub fn new(pool: SqlitePool) -> Self {
        InvoiceRepository { pool }
    }

    /// Identities of the lines belonging to one invoice.
    async fn detail_ids(&self, invoice_id: i64) -> DbResult<Vec<i64>> {
        let ids = sqlx::query_scalar(
            "SELECT id FROM invoice_details WHERE invoice_id = ?1 ORDER BY id",
        )
        .bind(invoice_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }
}

#[async_trait]
impl Repository<Invoice> for InvoiceRepository {
    type Error = DbError;

    async fn find_all(&self) -> DbResult<Vec<Invoice>> {
        let sql = format!("SELECT {INVOICE_COLUMNS} FROM invoices ORDER BY id");
        let rows = sqlx::query_as::<_, InvoiceRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        let pairs: Vec<(i64, i64)> =
            sqlx::query_as("SELECT invoice_id, id FROM invoice_details ORDER BY id")
                .fetch_all(&self.pool)
                .await?;
        let mut detail_ids = group_detail_ids(pairs);

        debug!(count = rows.len(), "Loaded invoices");
        Ok(rows
            .into_iter()
            .map(|row| {
                let ids = detail_ids.remove(&row.id).unwrap_or_default();
                row.into_invoice(ids)
            })
            .collect())
    }

    async fn find_by_id(&self, id: i64) -> DbResult<Option<Invoice>> {
        let sql = format!("SELECT {INVOICE_COLUMNS} FROM invoices WHERE id = ?1");
        let row = sqlx::query_as::<_, InvoiceRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let ids = self.detail_ids(row.id).await?;
                Ok(Some(row.into_invoice(ids)))
            }
            None => Ok(None),
        }
    }

    async fn exists_by_id(&self, id: i64) -> DbResult<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM invoices WHERE id = ?1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count > 0)
    }

    async fn save(&self, invoice: Invoice) -> DbResult<Invoice> {
        debug!(id = ?invoice.meta.id, client_id = %invoice.client_id, "Saving invoice");

        let now = Utc::now();
        let sql = format!(
            r#"
            INSERT INTO invoices (
                id, client_id, client_name,
                total_before_taxes, taxes, total_after_taxes,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
            ON CONFLICT(id) DO UPDATE SET
                client_id = excluded.client_id,
                client_name = excluded.client_name,
                total_before_taxes = excluded.total_before_taxes,
                taxes = excluded.taxes,
                total_after_taxes = excluded.total_after_taxes,
                updated_at = excluded.updated_at
            RETURNING {INVOICE_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, InvoiceRow>(&sql)
            .bind(invoice.meta.id)
            .bind(&invoice.client_id)
            .bind(&invoice.client_name)
            .bind(invoice.total_before_taxes)
            .bind(invoice.taxes)
            .bind(invoice.total_after_taxes)
            .bind(now)
            .fetch_one(&self.pool)
            .await?;

        let ids = self.detail_ids(row.id).await?;
        Ok(row.into_invoice(ids))
    }

    /// Removes the invoice row only. Its lines stay behind and read back
    /// without an invoice.
    async fn delete_by_id(&self, id: i64) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM invoices WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        debug!(id, rows = result.rows_affected(), "Deleted invoice");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
