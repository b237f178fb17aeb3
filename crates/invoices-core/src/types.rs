//! # Domain Types
//!
//! Entities of the invoicing service.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    Invoice      │   │ InvoiceDetails  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  meta           │   │  meta           │   │  meta           │       │
//! │  │  name           │   │  client_id      │   │  totalprice     │       │
//! │  │  price          │   │  client_name    │   │  product ───────┼──► Product
//! │  │  detail ids ◄───┼─┐ │  totals, taxes  │   │  invoice ───────┼──► Invoice
//! │  └─────────────────┘ │ │  detail ids ◄───┼─┐ └─────────────────┘       │
//! │                      └─┼─────────────────┼─┴── derived by the store    │
//! │                        └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Record Metadata
//! Every entity embeds a [`RecordMeta`] by value: an identity that is absent
//! until the first save, plus creation and update timestamps. In JSON the
//! metadata is flattened into the entity object.
//!
//! ## Ownership
//! `InvoiceDetails` is the dependent entity. `Product` and `Invoice` never
//! mutate their detail collections; those are read views filled in by the
//! store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// =============================================================================
// Record Metadata
// =============================================================================

/// Identity and timestamps shared by every entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct RecordMeta {
    /// Numeric identity. `None` until the persistence gateway assigns one.
    pub id: Option<i64>,

    /// When the record was first saved.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// When the record was last replaced.
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl RecordMeta {
    /// Metadata for a record that has not been persisted yet.
    pub fn new() -> Self {
        let now = Utc::now();
        RecordMeta {
            id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Metadata carrying an existing identity.
    pub fn with_id(id: i64) -> Self {
        RecordMeta {
            id: Some(id),
            ..RecordMeta::new()
        }
    }
}

impl Default for RecordMeta {
    fn default() -> Self {
        RecordMeta::new()
    }
}

// =============================================================================
// Entity Trait
// =============================================================================

/// Common surface of every persisted record.
///
/// The persistence gateway and the entity services are generic over this
/// trait; `NAME` is the human label used in error messages.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Label used in messages ("Invoice with id 4 not found").
    const NAME: &'static str;

    fn meta(&self) -> &RecordMeta;

    fn meta_mut(&mut self) -> &mut RecordMeta;

    /// Returns the identity, if the record has been persisted.
    #[inline]
    fn id(&self) -> Option<i64> {
        self.meta().id
    }
}

macro_rules! impl_entity {
    ($ty:ty, $name:literal) => {
        impl Entity for $ty {
            const NAME: &'static str = $name;

            #[inline]
            fn meta(&self) -> &RecordMeta {
                &self.meta
            }

            #[inline]
            fn meta_mut(&mut self) -> &mut RecordMeta {
                &mut self.meta
            }
        }
    };
}

// =============================================================================
// Product
// =============================================================================

/// A product that can be billed on an invoice line.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct Product {
    #[serde(flatten)]
    pub meta: RecordMeta,

    /// Display name, 2 to 100 characters.
    pub name: String,

    /// Unit price, strictly positive.
    pub price: f64,

    /// Identities of the invoice lines referencing this product.
    /// Read-only: ignored on input, filled in by the store.
    #[serde(skip_deserializing)]
    pub invoice_detail_ids: Vec<i64>,
}

impl Product {
    /// Creates an unsaved product.
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Product {
            meta: RecordMeta::new(),
            name: name.into(),
            price,
            invoice_detail_ids: Vec::new(),
        }
    }

    /// A bare reference to a stored product, as clients send it inside
    /// an invoice line (`{"product": {"id": 3}}`).
    pub fn reference(id: i64) -> Self {
        Product {
            meta: RecordMeta::with_id(id),
            ..Product::default()
        }
    }
}

impl_entity!(Product, "Product");

// =============================================================================
// Invoice
// =============================================================================

/// An invoice issued to a client.
///
/// ## Totals Invariant
/// `total_after_taxes == total_before_taxes + taxes`, within
/// [`TOTAL_TOLERANCE`](crate::TOTAL_TOLERANCE).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct Invoice {
    #[serde(flatten)]
    pub meta: RecordMeta,

    /// Client identifier, 1 to 50 characters.
    pub client_id: String,

    /// Client display name, 2 to 100 characters.
    pub client_name: String,

    pub total_before_taxes: f64,

    pub taxes: f64,

    pub total_after_taxes: f64,

    /// Identities of the lines belonging to this invoice.
    /// Read-only: ignored on input, filled in by the store.
    #[serde(skip_deserializing)]
    pub invoice_detail_ids: Vec<i64>,
}

impl Invoice {
    /// Creates an unsaved invoice.
    pub fn new(
        client_id: impl Into<String>,
        client_name: impl Into<String>,
        total_before_taxes: f64,
        taxes: f64,
        total_after_taxes: f64,
    ) -> Self {
        Invoice {
            meta: RecordMeta::new(),
            client_id: client_id.into(),
            client_name: client_name.into(),
            total_before_taxes,
            taxes,
            total_after_taxes,
            invoice_detail_ids: Vec::new(),
        }
    }

    /// A bare reference to a stored invoice.
    pub fn reference(id: i64) -> Self {
        Invoice {
            meta: RecordMeta::with_id(id),
            ..Invoice::default()
        }
    }

    /// The after-tax total implied by the other two amounts.
    #[inline]
    pub fn expected_total(&self) -> f64 {
        self.total_before_taxes + self.taxes
    }
}

impl_entity!(Invoice, "Invoice");

// =============================================================================
// Invoice Details
// =============================================================================

/// A line of an invoice: one product, one invoice, one amount.
///
/// Both references are optional at the type level so that incomplete
/// requests can be represented and rejected by validation rather than
/// by deserialization. A stored line whose owner has since been deleted
/// also reads back with the reference absent.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct InvoiceDetails {
    #[serde(flatten)]
    pub meta: RecordMeta,

    /// Line amount, never negative.
    pub totalprice: f64,

    pub product: Option<Product>,

    pub invoice: Option<Invoice>,
}

impl InvoiceDetails {
    /// Creates an unsaved line referencing the given product and invoice.
    pub fn new(totalprice: f64, product: Product, invoice: Invoice) -> Self {
        InvoiceDetails {
            meta: RecordMeta::new(),
            totalprice,
            product: Some(product),
            invoice: Some(invoice),
        }
    }

    /// Identity of the referenced product, if any.
    pub fn product_id(&self) -> Option<i64> {
        self.product.as_ref().and_then(|p| p.meta.id)
    }

    /// Identity of the referenced invoice, if any.
    pub fn invoice_id(&self) -> Option<i64> {
        self.invoice.as_ref().and_then(|i| i.meta.id)
    }
}

impl_entity!(InvoiceDetails, "Invoice detail");

// =============================================================================
// Unit Tests
// =============================================================================
