//! # Persistence Gateway
//!
//! The storage contract the entity services depend on.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Who Implements Repository<T>                         │
//! │                                                                         │
//! │  EntityService<T, R: Repository<T>>                                    │
//! │       │                                                                 │
//! │       ├──► MemoryRepository<T>      (this module, tests)               │
//! │       │                                                                 │
//! │       └──► ProductRepository        (invoices-db, SQLite)              │
//! │            InvoiceRepository                                            │
//! │            InvoiceDetailRepository                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Save Semantics
//! - identity absent → insert, the gateway assigns the identity
//! - identity present → replace the whole record (or insert it under that
//!   identity if it does not exist yet)
//! - `created_at` is set on insert and preserved on replace,
//!   `updated_at` is refreshed on every save
//!
//! `delete_by_id` is a silent no-op for unknown identities; callers probe
//! with `exists_by_id` first.

use std::collections::BTreeMap;
use std::convert::Infallible;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::types::Entity;

// =============================================================================
// Gateway Trait
// =============================================================================

/// Key-based store for one entity type.
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// Failure type of the underlying store.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Returns every record.
    async fn find_all(&self) -> Result<Vec<T>, Self::Error>;

    /// Looks up one record by identity.
    async fn find_by_id(&self, id: i64) -> Result<Option<T>, Self::Error>;

    /// Existence probe: answers without loading the record.
    async fn exists_by_id(&self, id: i64) -> Result<bool, Self::Error>;

    /// Inserts or replaces a record, returning it with identity and
    /// timestamps populated.
    async fn save(&self, entity: T) -> Result<T, Self::Error>;

    /// Removes a record. Unknown identities are ignored.
    async fn delete_by_id(&self, id: i64) -> Result<(), Self::Error>;
}

// =============================================================================
// In-Memory Gateway
// =============================================================================

/// A `Repository` backed by an ordered map.
///
/// Identities are assigned sequentially from 1. Backward collections
/// (`invoice_detail_ids`) are not maintained; they are stored as given.
///
/// ## Usage
/// ```rust
/// use invoices_core::{MemoryRepository, Product, ProductService};
///
/// let service = ProductService::new(MemoryRepository::<Product>::new());
/// ```
#[derive(Debug)]
pub struct MemoryRepository<T> {
    state: Mutex<MemoryState<T>>,
}

#[derive(Debug)]
struct MemoryState<T> {
    next_id: i64,
    records: BTreeMap<i64, T>,
}

impl<T> MemoryRepository<T> {
    /// Creates an empty store.
    pub fn new() -> Self {
        MemoryRepository {
            state: Mutex::new(MemoryState {
                next_id: 1,
                records: BTreeMap::new(),
            }),
        }
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.state.lock().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl<T> Default for MemoryRepository<T> {
    fn default() -> Self {
        MemoryRepository::new()
    }
}

#[async_trait]
impl<T: Entity> Repository<T> for MemoryRepository<T> {
    type Error = Infallible;

    async fn find_all(&self) -> Result<Vec<T>, Infallible> {
        Ok(self.state.lock().await.records.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<T>, Infallible> {
        Ok(self.state.lock().await.records.get(&id).cloned())
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool, Infallible> {
        Ok(self.state.lock().await.records.contains_key(&id))
    }

    async fn save(&self, mut entity: T) -> Result<T, Infallible> {
        let mut state = self.state.lock().await;
        let now = Utc::now();

        let id = match entity.id() {
            Some(id) => id,
            None => state.next_id,
        };
        state.next_id = state.next_id.max(id.saturating_add(1));

        let created_at = state
            .records
            .get(&id)
            .map(|existing| existing.meta().created_at)
            .unwrap_or(now);

        let meta = entity.meta_mut();
        meta.id = Some(id);
        meta.created_at = created_at;
        meta.updated_at = now;

        state.records.insert(id, entity.clone());
        Ok(entity)
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), Infallible> {
        self.state.lock().await.records.remove(&id);
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Invoice, Product};

    #[tokio::test]
    async fn test_save_assigns_sequential_ids() {
        let repo = MemoryRepository::new();

        let a = repo.save(Product::new("Alpha", 1.0)).await.unwrap();
        let b = repo.save(Product::new("Beta", 2.0)).await.unwrap();

        assert_eq!(a.id(), Some(1));
        assert_eq!(b.id(), Some(2));
        assert_eq!(repo.len().await, 2);
    }

    #[tokio::test]
    async fn test_save_with_id_replaces_and_keeps_created_at() {
        let repo = MemoryRepository::new();
        let original = repo
            .save(Invoice::new("C1", "Ann", 10.0, 1.0, 11.0))
            .await
            .unwrap();

        let mut changed = original.clone();
        changed.client_name = "Anne".into();
        let replaced = repo.save(changed).await.unwrap();

        assert_eq!(replaced.id(), original.id());
        assert_eq!(replaced.meta.created_at, original.meta.created_at);
        assert!(replaced.meta.updated_at >= original.meta.updated_at);
        assert_eq!(repo.len().await, 1);

        let stored = repo.find_by_id(1).await.unwrap().unwrap();
        assert_eq!(stored.client_name, "Anne");
    }

    #[tokio::test]
    async fn test_save_with_unknown_id_inserts_under_that_id() {
        let repo = MemoryRepository::new();
        let mut product = Product::new("Gamma", 3.0);
        product.meta.id = Some(10);

        repo.save(product).await.unwrap();
        let next = repo.save(Product::new("Delta", 4.0)).await.unwrap();

        assert!(repo.exists_by_id(10).await.unwrap());
        assert_eq!(next.id(), Some(11));
    }

    #[tokio::test]
    async fn test_delete_unknown_id_is_noop() {
        let repo: MemoryRepository<Product> = MemoryRepository::new();
        repo.delete_by_id(42).await.unwrap();
        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn test_find_all_in_id_order() {
        let repo = MemoryRepository::new();
        for name in ["One", "Two", "Three"] {
            repo.save(Product::new(name, 1.0)).await.unwrap();
        }

        let names: Vec<_> = repo
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, ["One", "Two", "Three"]);
    }
}
