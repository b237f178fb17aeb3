//! # invoices-core: Pure Business Logic for the Invoicing Service
//!
//! This crate holds the entities, the business rules guarding them, and the
//! services that apply those rules before anything reaches storage.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Invoicing Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    invoices-api (axum)                          │   │
//! │  │    GET/POST/PUT/DELETE /invoices, /invoices/products, ...       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ invoices-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │validation │  │  service  │  │repository │  │   │
//! │  │   │  Product  │  │  read id  │  │  list     │  │  trait    │  │   │
//! │  │   │  Invoice  │  │  write    │  │  get/save │  │  memory   │  │   │
//! │  │   │  Details  │  │  totals   │  │  delete   │  │  store    │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO DATABASE • NO NETWORK • NO HTTP TYPES                      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  invoices-db (Database Layer)                   │   │
//! │  │           SQLite repositories implementing `Repository`         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Entities and the shared [`RecordMeta`]
//! - [`error`] - Error taxonomy (bad request, field validation, not found, internal)
//! - [`validation`] - Per-entity write rules and the read-id check
//! - [`repository`] - Persistence gateway trait and an in-memory implementation
//! - [`service`] - Entity services that validate, then delegate to the gateway
//!
//! ## Example Usage
//!
//! ```rust
//! use invoices_core::{Invoice, InvoiceService, MemoryRepository};
//!
//! # tokio_test_block(async {
//! let service = InvoiceService::new(MemoryRepository::new());
//!
//! let saved = service
//!     .upsert(Invoice::new("C1", "Ann", 100.0, 12.0, 112.0))
//!     .await
//!     .unwrap();
//! assert_eq!(saved.meta.id, Some(1));
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod repository;
pub mod service;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ErrorKind, FieldError, ValidationError};
pub use repository::{MemoryRepository, Repository};
pub use service::{EntityService, InvoiceDetailService, InvoiceService, ProductService};
pub use types::*;
pub use validation::Validate;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Absolute tolerance when comparing invoice totals.
///
/// Amounts are floating point, so `total_after_taxes` is accepted when it is
/// within one cent of `total_before_taxes + taxes`.
pub const TOTAL_TOLERANCE: f64 = 0.01;
