//! # invoices-db: Database Layer for the Invoicing Service
//!
//! SQLite storage behind the `Repository` trait from invoices-core.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Invoicing Data Flow                              │
//! │                                                                         │
//! │  HTTP handler → EntityService (validation)                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   invoices-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌─────────────────┐   ┌──────────────┐ │   │
//! │  │   │   Database    │    │  Repositories   │   │  Migrations  │ │   │
//! │  │   │   (pool.rs)   │    │                 │   │  (embedded)  │ │   │
//! │  │   │               │    │ ProductRepo     │   │              │ │   │
//! │  │   │ SqlitePool    │◄───│ InvoiceRepo     │   │ 001_init.sql │ │   │
//! │  │   │               │    │ InvoiceDetail.. │   │              │ │   │
//! │  │   └───────────────┘    └─────────────────┘   └──────────────┘ │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (product, invoice, detail)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use invoices_core::ProductService;
//! use invoices_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("invoices.db")).await?;
//! let products = ProductService::new(db.products());
//! let all = products.list().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::invoice::InvoiceRepository;
pub use repository::invoice_detail::InvoiceDetailRepository;
pub use repository::product::ProductRepository;
