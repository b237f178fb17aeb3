//! Shared application state.

use invoices_core::{InvoiceDetailService, InvoiceService, ProductService};
use invoices_db::{Database, InvoiceDetailRepository, InvoiceRepository, ProductRepository};

/// State handed to every handler.
///
/// Cheap to clone: every service holds a repository that holds a clone of
/// the same connection pool.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
    pub products: ProductService<ProductRepository>,
    pub invoices: InvoiceService<InvoiceRepository>,
    pub details: InvoiceDetailService<InvoiceDetailRepository>,
}

impl AppState {
    /// Wires the entity services over one database.
    pub fn new(db: Database) -> Self {
        AppState {
            products: ProductService::new(db.products()),
            invoices: InvoiceService::new(db.invoices()),
            details: InvoiceDetailService::new(db.details()),
            db,
        }
    }
}
