//! # Repository Module
//!
//! SQLite implementations of the `Repository` gateway trait.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  EntityService<Product, ProductRepository>                             │
//! │       │                                                                 │
//! │       │  repo.find_by_id(3)                                             │
//! │       ▼                                                                 │
//! │  ProductRepository                                                     │
//! │  ├── find_all / find_by_id   row + detail ids                          │
//! │  ├── exists_by_id            SELECT COUNT(*) by primary key            │
//! │  ├── save                    INSERT ... ON CONFLICT DO UPDATE          │
//! │  └── delete_by_id            DELETE (unknown id is a no-op)            │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Backward Collections
//! `Product::invoice_detail_ids` and `Invoice::invoice_detail_ids` are not
//! stored; they are read from `invoice_details` on every load. Owners
//! embedded inside an invoice line are shallow and leave them empty.
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`](product::ProductRepository)
//! - [`InvoiceRepository`](invoice::InvoiceRepository)
//! - [`InvoiceDetailRepository`](invoice_detail::InvoiceDetailRepository)

use std::collections::HashMap;

pub mod invoice;
pub mod invoice_detail;
pub mod product;

/// Groups `(owner_id, detail_id)` pairs by owner, keeping detail order.
pub(crate) fn group_detail_ids(pairs: Vec<(i64, i64)>) -> HashMap<i64, Vec<i64>> {
    let mut grouped: HashMap<i64, Vec<i64>> = HashMap::new();
    for (owner_id, detail_id) in pairs {
        grouped.entry(owner_id).or_default().push(detail_id);
    }
    grouped
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use invoices_core::{
        ErrorKind, Invoice, InvoiceDetailService, InvoiceDetails, InvoiceService, Product,
        ProductService,
    };

    #[test]
    fn test_group_detail_ids() {
        let grouped = group_detail_ids(vec![(1, 10), (2, 11), (1, 12)]);
        assert_eq!(grouped[&1], vec![10, 12]);
        assert_eq!(grouped[&2], vec![11]);
        assert!(!grouped.contains_key(&3));
    }

    #[tokio::test]
    async fn test_services_over_sqlite() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let products = ProductService::new(db.products());
        let invoices = InvoiceService::new(db.invoices());
        let details = InvoiceDetailService::new(db.details());

        let widget = products.upsert(Product::new("Widget", 10.0)).await.unwrap();
        let invoice = invoices
            .upsert(Invoice::new("C1", "Ann", 100.0, 12.0, 112.0))
            .await
            .unwrap();

        let line = details
            .upsert(InvoiceDetails::new(
                30.0,
                Product::reference(widget.meta.id.unwrap()),
                Invoice::reference(invoice.meta.id.unwrap()),
            ))
            .await
            .unwrap();
        assert_eq!(line.product.as_ref().map(|p| p.name.as_str()), Some("Widget"));

        let invoice = invoices.get_by_id(invoice.meta.id.unwrap()).await.unwrap();
        assert_eq!(invoice.invoice_detail_ids, vec![line.meta.id.unwrap()]);

        // Rejected writes never reach the table.
        let err = products.upsert(Product::new("Widget", -1.0)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadRequest);
        assert_eq!(products.list().await.unwrap().len(), 1);

        let err = invoices.delete_by_id(999).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_closed_pool_surfaces_as_internal() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let products = ProductService::new(db.products());
        db.close().await;

        let err = products.list().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);
    }
}
