//! # Invoice Detail Repository
//!
//! Database operations for invoice lines.
//!
//! ## Reads
//! ```text
//! invoice_details d
//!   LEFT JOIN products p ON p.id = d.product_id
//!   LEFT JOIN invoices i ON i.id = d.invoice_id
//! ```
//! A line whose product or invoice has been deleted still loads; the
//! missing side comes back as `None`.
//!
//! ## Writes
//! Only the owner ids are stored. Whatever else the request carried inside
//! `product` / `invoice` is ignored, and the saved line is re-read so the
//! response shows the stored owners.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use tracing::debug;

use invoices_core::{Invoice, InvoiceDetails, Product, RecordMeta, Repository};

use crate::error::{DbError, DbResult};

const SELECT_DETAILS: &str = r#"
    SELECT
        d.id, d.totalprice, d.created_at, d.updated_at,
        p.id         AS product_id,
        p.name       AS product_name,
        p.price      AS product_price,
        p.created_at AS product_created_at,
        p.updated_at AS product_updated_at,
        i.id                 AS invoice_id,
        i.client_id          AS invoice_client_id,
        i.client_name        AS invoice_client_name,
        i.total_before_taxes AS invoice_total_before_taxes,
        i.taxes              AS invoice_taxes,
        i.total_after_taxes  AS invoice_total_after_taxes,
        i.created_at         AS invoice_created_at,
        i.updated_at         AS invoice_updated_at
    FROM invoice_details d
    LEFT JOIN products p ON p.id = d.product_id
    LEFT JOIN invoices i ON i.id = d.invoice_id
"#;

/// One invoice line joined with its owners. Owner columns are all NULL
/// when the owner row is gone.
#[derive(Debug, FromRow)]
struct InvoiceDetailRow {
    id: i64,
    totalprice: f64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,

    product_id: Option<i64>,
    product_name: Option<String>,
    product_price: Option<f64>,
    product_created_at: Option<DateTime<Utc>>,
    product_updated_at: Option<DateTime<Utc>>,

    invoice_id: Option<i64>,
    invoice_client_id: Option<String>,
    invoice_client_name: Option<String>,
    invoice_total_before_taxes: Option<f64>,
    invoice_taxes: Option<f64>,
    invoice_total_after_taxes: Option<f64>,
    invoice_created_at: Option<DateTime<Utc>>,
    invoice_updated_at: Option<DateTime<Utc>>,
}

impl InvoiceDetailRow {
    fn product(&mut self) -> Option<Product> {
        Some(Product {
            meta: RecordMeta {
                id: Some(self.product_id?),
                created_at: self.product_created_at?,
                updated_at: self.product_updated_at?,
            },
            name: self.product_name.take()?,
            price: self.product_price?,
            invoice_detail_ids: Vec::new(),
        })
    }

    fn invoice(&mut self) -> Option<Invoice> {
        Some(Invoice {
            meta: RecordMeta {
                id: Some(self.invoice_id?),
                created_at: self.invoice_created_at?,
                updated_at: self.invoice_updated_at?,
            },
            client_id: self.invoice_client_id.take()?,
            client_name: self.invoice_client_name.take()?,
            total_before_taxes: self.invoice_total_before_taxes?,
            taxes: self.invoice_taxes?,
            total_after_taxes: self.invoice_total_after_taxes?,
            invoice_detail_ids: Vec::new(),
        })
    }

    fn into_details(mut self) -> InvoiceDetails {
        let product = self.product();
        let invoice = self.invoice();

        InvoiceDetails {
            meta: RecordMeta {
                id: Some(self.id),
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
            totalprice: self.totalprice,
            product,
            invoice,
        }
    }
}

/// Repository for invoice line database operations.
#[derive(Debug, Clone)]
pub struct InvoiceDetailRepository {
    pool: SqlitePool,
}

impl InvoiceDetailRepository {
    /// Creates a new InvoiceDetailRepository.
    pub fn new(pool: SqlitePool) -> Self {
        InvoiceDetailRepository { pool }
    }
}

#[async_trait]
impl Repository<InvoiceDetails> for InvoiceDetailRepository {
    type Error = DbError;

    async fn find_all(&self) -> DbResult<Vec<InvoiceDetails>> {
        let sql = format!("{SELECT_DETAILS} ORDER BY d.id");
        let rows = sqlx::query_as::<_, InvoiceDetailRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = rows.len(), "Loaded invoice details");
        Ok(rows.into_iter().map(InvoiceDetailRow::into_details).collect())
    }

    async fn find_by_id(&self, id: i64) -> DbResult<Option<InvoiceDetails>> {
        let sql = format!("{SELECT_DETAILS} WHERE d.id = ?1");
        let row = sqlx::query_as::<_, InvoiceDetailRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(InvoiceDetailRow::into_details))
    }

    async fn exists_by_id(&self, id: i64) -> DbResult<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM invoice_details WHERE id = ?1")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count > 0)
    }

    /// Stores the line and reads it back joined, in one transaction.
    ///
    /// Both owner ids must be present; the NOT NULL columns reject a line
    /// without them.
    async fn save(&self, details: InvoiceDetails) -> DbResult<InvoiceDetails> {
        let product_id = details.product_id();
        let invoice_id = details.invoice_id();
        debug!(id = ?details.meta.id, ?product_id, ?invoice_id, "Saving invoice detail");

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO invoice_details (
                id, totalprice, product_id, invoice_id, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?5)
            ON CONFLICT(id) DO UPDATE SET
                totalprice = excluded.totalprice,
                product_id = excluded.product_id,
                invoice_id = excluded.invoice_id,
                updated_at = excluded.updated_at
            RETURNING id
            "#,
        )
        .bind(details.meta.id)
        .bind(details.totalprice)
        .bind(product_id)
        .bind(invoice_id)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        let sql = format!("{SELECT_DETAILS} WHERE d.id = ?1");
        let row = sqlx::query_as::<_, InvoiceDetailRow>(&sql)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(row.into_details())
    }

    async fn delete_by_id(&self, id: i64) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM invoice_details WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        debug!(id, rows = result.rows_affected(), "Deleted invoice detail");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    struct Fixture {
        db: Database,
        product_id: i64,
        invoice_id: i64,
    }

    async fn fixture() -> Fixture {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let product = db.products().save(Product::new("Widget", 10.0)).await.unwrap();
        let invoice = db
            .invoices()
            .save(Invoice::new("C1", "Ann", 100.0, 12.0, 112.0))
            .await
            .unwrap();

        Fixture {
            product_id: product.meta.id.unwrap(),
            invoice_id: invoice.meta.id.unwrap(),
            db,
        }
    }

    impl Fixture {
        fn line(&self, totalprice: f64) -> InvoiceDetails {
            InvoiceDetails::new(
                totalprice,
                Product::reference(self.product_id),
                Invoice::reference(self.invoice_id),
            )
        }
    }

    #[tokio::test]
    async fn test_save_returns_joined_owners() {
        let fx = fixture().await;

        let saved = fx.db.details().save(fx.line(30.0)).await.unwrap();

        assert_eq!(saved.meta.id, Some(1));
        let product = saved.product.unwrap();
        assert_eq!(product.name, "Widget");
        assert_eq!(saved.invoice.unwrap().client_name, "Ann");
    }

    #[tokio::test]
    async fn test_owner_detail_ids_are_populated() {
        let fx = fixture().await;
        let details = fx.db.details();
        let a = details.save(fx.line(10.0)).await.unwrap();
        let b = details.save(fx.line(20.0)).await.unwrap();
        let expected = vec![a.meta.id.unwrap(), b.meta.id.unwrap()];

        let product = fx.db.products().find_by_id(fx.product_id).await.unwrap().unwrap();
        assert_eq!(product.invoice_detail_ids, expected);

        let invoices = fx.db.invoices().find_all().await.unwrap();
        assert_eq!(invoices[0].invoice_detail_ids, expected);
    }

    #[tokio::test]
    async fn test_deleting_owner_leaves_line_without_reference() {
        let fx = fixture().await;
        let details = fx.db.details();
        let saved = details.save(fx.line(30.0)).await.unwrap();
        let id = saved.meta.id.unwrap();

        fx.db.products().delete_by_id(fx.product_id).await.unwrap();

        let line = details.find_by_id(id).await.unwrap().unwrap();
        assert!(line.product.is_none());
        assert_eq!(line.invoice_id(), Some(fx.invoice_id));
        assert_eq!(details.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_replace_moves_line() {
        let fx = fixture().await;
        let other = fx
            .db
            .invoices()
            .save(Invoice::new("C2", "Bob", 10.0, 1.0, 11.0))
            .await
            .unwrap();
        let details = fx.db.details();
        let saved = details.save(fx.line(30.0)).await.unwrap();

        let mut moved = saved.clone();
        moved.invoice = Some(Invoice::reference(other.meta.id.unwrap()));
        moved.totalprice = 45.0;
        let replaced = details.save(moved).await.unwrap();

        assert_eq!(replaced.meta.id, saved.meta.id);
        assert_eq!(replaced.meta.created_at, saved.meta.created_at);
        assert_eq!(replaced.invoice.unwrap().client_name, "Bob");
        assert!((replaced.totalprice - 45.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_missing_owner_id_rejected_by_schema() {
        let fx = fixture().await;
        let mut line = fx.line(30.0);
        line.invoice = None;

        let err = fx.db.details().save(line).await.unwrap_err();
        assert!(matches!(err, DbError::QueryFailed(_)));
        assert!(!fx.db.details().exists_by_id(1).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete() {
        let fx = fixture().await;
        let details = fx.db.details();
        details.save(fx.line(30.0)).await.unwrap();

        assert!(details.exists_by_id(1).await.unwrap());
        details.delete_by_id(1).await.unwrap();
        assert!(details.find_by_id(1).await.unwrap().is_none());
    }
}
