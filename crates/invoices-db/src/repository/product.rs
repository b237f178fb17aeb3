//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Key Operations
//! - CRUD through the `Repository` trait
//! - Detail ids loaded alongside every product

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use tracing::debug;

use invoices_core::{Product, RecordMeta, Repository};

use super::group_detail_ids;
use crate::error::{DbError, DbResult};

/// One row of the `products` table.
#[derive(Debug, FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    price: f64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ProductRow {
    fn into_product(self, invoice_detail_ids: Vec<i64>) -> Product {
        Product {
            meta: RecordMeta {
                id: Some(self.id),
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
            name: self.name,
            price: self.price,
            invoice_detail_ids,
        }
    }
}

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
/// let saved = repo.save(Product::new("Widget", 9.5)).await?;
/// let found = repo.find_by_id(saved.meta.id.unwrap()).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Identities of the invoice lines referencing one product.
    async fn detail_ids(&self, product_id: i64) -> DbResult<Vec<i64>> {
        let ids = sqlx::query_scalar(
            "SELECT id FROM invoice_details WHERE product_id = ?1 ORDER BY id",
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }
}

#[async_trait]
impl Repository<Product> for ProductRepository {
    type Error = DbError;

    async fn find_all(&self) -> DbResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(
            "SELECT id, name, price, created_at, updated_at FROM products ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        let pairs: Vec<(i64, i64)> =
            sqlx::query_as("SELECT product_id, id FROM invoice_details ORDER BY id")
                .fetch_all(&self.pool)
                .await?;
        let mut detail_ids = group_detail_ids(pairs);

        debug!(count = rows.len(), "Loaded products");
        Ok(rows
            .into_iter()
            .map(|row| {
                let ids = detail_ids.remove(&row.id).unwrap_or_default();
                row.into_product(ids)
            })
            .collect())
    }

    async fn find_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(
            "SELECT id, name, price, created_at, updated_at FROM products WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let ids = self.detail_ids(row.id).await?;
                Ok(Some(row.into_product(ids)))
            }
            None => Ok(None),
        }
    }

    async fn exists_by_id(&self, id: i64) -> DbResult<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE id = ?1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count > 0)
    }

    /// Inserts or replaces a product.
    ///
    /// `created_at` is only written on insert; a replace keeps the stored
    /// value and refreshes `updated_at`.
    async fn save(&self, product: Product) -> DbResult<Product> {
        debug!(id = ?product.meta.id, name = %product.name, "Saving product");

        let now = Utc::now();
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            INSERT INTO products (id, name, price, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?4)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                price = excluded.price,
                updated_at = excluded.updated_at
            RETURNING id, name, price, created_at, updated_at
            "#,
        )
        .bind(product.meta.id)
        .bind(&product.name)
        .bind(product.price)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        let ids = self.detail_ids(row.id).await?;
        Ok(row.into_product(ids))
    }

    async fn delete_by_id(&self, id: i64) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        debug!(id, rows = result.rows_affected(), "Deleted product");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
