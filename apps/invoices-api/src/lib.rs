//! # Invoices API
//!
//! HTTP surface of the invoicing service.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Invoices API                                    │
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────────┐│
//! │  │  routes        │  │  error         │  │  config                    ││
//! │  │                │  │                │  │                            ││
//! │  │ • invoice      │  │ • ApiError     │  │ • defaults                 ││
//! │  │ • product      │  │ • ErrorResponse│  │ • invoices.toml            ││
//! │  │ • invoice_det..│  │ • status codes │  │ • INVOICES_* env           ││
//! │  │ • health       │  │                │  │                            ││
//! │  └───────┬────────┘  └────────────────┘  └────────────────────────────┘│
//! │          │                                                              │
//! │          ▼                                                              │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  AppState: ProductService · InvoiceService · InvoiceDetailService │  │
//! │  │            over invoices-db repositories (SQLite)                 │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables:
//! - `INVOICES_HTTP_HOST` - bind interface (default: 0.0.0.0)
//! - `INVOICES_HTTP_PORT` - HTTP port (default: 8080)
//! - `INVOICES_DATABASE_PATH` - SQLite file (default: invoices.db)
//! - `INVOICES_MAX_CONNECTIONS` - pool size (default: 5)
//! - `INVOICES_LOG_FILTER` - tracing filter, `RUST_LOG` wins when set

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

// Re-exports
pub use config::{AppConfig, ConfigError};
pub use error::{ApiError, ApiResult, ErrorResponse};
pub use routes::router;
pub use state::AppState;
