//! # Entity Services
//!
//! Validation first, then exactly one persistence write.
//!
//! ## Operation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      EntityService<T, R>                                │
//! │                                                                         │
//! │  list()           ─────────────────────────────► find_all              │
//! │                                                                         │
//! │  get_by_id(id)    validate_for_read ──► find_by_id ──► None? NotFound  │
//! │                                                                         │
//! │  upsert(e)        validate_for_write ─► save                            │
//! │                                                                         │
//! │  replace(id, e)   get_by_id(id) ──────► upsert(e with id)              │
//! │                                                                         │
//! │  delete_by_id(id) validate_for_read ──► exists_by_id ──► delete_by_id  │
//! │                                          false? NotFound                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The existence probe and the write that follows are separate gateway
//! calls with no transaction around them. A concurrent delete between the
//! two is accepted.
//!
//! Services never call each other: an invoice line is checked only against
//! the references it carries, not against the product or invoice stores.

use std::marker::PhantomData;

use tracing::{debug, warn};

use crate::error::{CoreError, CoreResult};
use crate::repository::Repository;
use crate::types::{Entity, Invoice, InvoiceDetails, Product};
use crate::validation::{validate_for_read, Validate};

/// Product operations over any gateway.
pub type ProductService<R> = EntityService<Product, R>;

/// Invoice operations over any gateway.
pub type InvoiceService<R> = EntityService<Invoice, R>;

/// Invoice line operations over any gateway.
pub type InvoiceDetailService<R> = EntityService<InvoiceDetails, R>;

/// CRUD operations for one entity type, guarded by its validation rules.
#[derive(Debug, Clone)]
pub struct EntityService<T, R> {
    repo: R,
    _entity: PhantomData<fn() -> T>,
}

impl<T, R> EntityService<T, R>
where
    T: Entity + Validate,
    R: Repository<T>,
{
    /// Creates a service over the given gateway.
    pub fn new(repo: R) -> Self {
        EntityService {
            repo,
            _entity: PhantomData,
        }
    }

    /// Returns the underlying gateway.
    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Returns every record. No validation applies.
    pub async fn list(&self) -> CoreResult<Vec<T>> {
        let records = self.repo.find_all().await.map_err(CoreError::repository)?;
        debug!(entity = T::NAME, count = records.len(), "Listed records");
        Ok(records)
    }

    /// Looks up one record.
    ///
    /// ## Errors
    /// * `Validation(InvalidId)` - `id <= 0`, no lookup performed
    /// * `NotFound` - no record with that identity
    pub async fn get_by_id(&self, id: i64) -> CoreResult<T> {
        validate_for_read(T::NAME, id)?;

        self.repo
            .find_by_id(id)
            .await
            .map_err(CoreError::repository)?
            .ok_or_else(|| {
                debug!(entity = T::NAME, id, "Record not found");
                CoreError::not_found(T::NAME, id)
            })
    }

    /// Validates and saves a record, inserting when it has no identity and
    /// replacing it otherwise.
    pub async fn upsert(&self, entity: T) -> CoreResult<T> {
        if let Err(err) = entity.validate_for_write() {
            warn!(entity = T::NAME, error = %err, "Rejected write");
            return Err(err);
        }

        let saved = self.repo.save(entity).await.map_err(CoreError::repository)?;
        debug!(entity = T::NAME, id = ?saved.id(), "Saved record");
        Ok(saved)
    }

    /// Replaces the record stored under `id` with `entity`.
    ///
    /// The record must already exist. The identity in the path wins over
    /// whatever identity the body carried.
    pub async fn replace(&self, id: i64, mut entity: T) -> CoreResult<T> {
        self.get_by_id(id).await?;
        entity.meta_mut().id = Some(id);
        self.upsert(entity).await
    }

    /// Deletes one record.
    ///
    /// ## Errors
    /// * `Validation(InvalidId)` - `id <= 0`, no probe performed
    /// * `NotFound` - the existence probe found nothing; never a silent success
    pub async fn delete_by_id(&self, id: i64) -> CoreResult<()> {
        validate_for_read(T::NAME, id)?;

        let exists = self
            .repo
            .exists_by_id(id)
            .await
            .map_err(CoreError::repository)?;
        if !exists {
            debug!(entity = T::NAME, id, "Delete of unknown record");
            return Err(CoreError::not_found(T::NAME, id));
        }

        self.repo
            .delete_by_id(id)
            .await
            .map_err(CoreError::repository)?;
        debug!(entity = T::NAME, id, "Deleted record");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
