//! # Validation Module
//!
//! Business rules checked before any persistence call.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Passes                                  │
//! │                                                                         │
//! │  Read / delete:                                                        │
//! │  └── validate_for_read(id)      id <= 0 → BadRequest                   │
//! │                                                                         │
//! │  Write (Validate::validate_for_write):                                 │
//! │  Pass 1: business rules         first violation → BadRequest           │
//! │  ├── identity, when given, positive                                    │
//! │  ├── required text not blank                                           │
//! │  ├── amounts finite, not negative (price strictly positive)            │
//! │  ├── invoice totals consistent within TOTAL_TOLERANCE                  │
//! │  └── invoice lines reference a saved product and invoice               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Pass 2: field constraints      all violations → ValidationFailed      │
//! │  └── text length bounds                                                │
//! │                                                                         │
//! │  Nothing is written unless both passes succeed.                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use invoices_core::validation::{validate_for_read, Validate};
//! use invoices_core::{Invoice, Product};
//!
//! assert!(validate_for_read("Invoice", 0).is_err());
//!
//! let invoice = Invoice::new("C1", "Ann", 100.0, 12.0, 200.0);
//! assert!(invoice.validate_for_write().is_err());
//!
//! assert!(Product::new("Widget", 9.99).validate_for_write().is_ok());
//! ```

use crate::error::{CoreError, CoreResult, FieldError, ValidationError};
use crate::types::{Entity, Invoice, InvoiceDetails, Product};
use crate::TOTAL_TOLERANCE;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Identity
// =============================================================================

/// Rejects identities that can never exist (zero or negative).
///
/// Runs before any lookup, so a malformed id never costs a database read.
pub fn validate_for_read(entity: &'static str, id: i64) -> ValidationResult<()> {
    if id <= 0 {
        return Err(ValidationError::InvalidId { entity });
    }
    Ok(())
}

// =============================================================================
// Write Validation
// =============================================================================

/// Write-time checks for an entity.
pub trait Validate: Entity {
    /// Business rules. Stops at the first broken rule.
    fn check_rules(&self) -> ValidationResult<()>;

    /// Structural constraints. Reports every offending field.
    fn check_fields(&self) -> Vec<FieldError> {
        Vec::new()
    }

    /// Runs both passes; business rules win when both would fail.
    fn validate_for_write(&self) -> CoreResult<()> {
        if let Some(id) = self.id() {
            validate_for_read(Self::NAME, id)?;
        }
        self.check_rules()?;

        let rejected = self.check_fields();
        if !rejected.is_empty() {
            return Err(CoreError::FieldsRejected(rejected));
        }

        Ok(())
    }
}

impl Validate for Product {
    fn check_rules(&self) -> ValidationResult<()> {
        require_text("name", &self.name)?;
        require_positive("price", self.price)
    }

    fn check_fields(&self) -> Vec<FieldError> {
        let mut rejected = Vec::new();
        check_length(&mut rejected, "name", &self.name, 2, 100);
        rejected
    }
}

impl Validate for Invoice {
    fn check_rules(&self) -> ValidationResult<()> {
        require_text("clientId", &self.client_id)?;
        require_text("clientName", &self.client_name)?;
        require_non_negative("totalBeforeTaxes", self.total_before_taxes)?;
        require_non_negative("taxes", self.taxes)?;
        require_non_negative("totalAfterTaxes", self.total_after_taxes)?;
        validate_totals(self)
    }

    fn check_fields(&self) -> Vec<FieldError> {
        let mut rejected = Vec::new();
        check_length(&mut rejected, "clientId", &self.client_id, 1, 50);
        check_length(&mut rejected, "clientName", &self.client_name, 2, 100);
        rejected
    }
}

impl Validate for InvoiceDetails {
    fn check_rules(&self) -> ValidationResult<()> {
        let product = self
            .product
            .as_ref()
            .ok_or(ValidationError::MissingReference { field: "product" })?;
        let invoice = self
            .invoice
            .as_ref()
            .ok_or(ValidationError::MissingReference { field: "invoice" })?;

        require_non_negative("totalprice", self.totalprice)?;

        // The line is stored by reference, so the owners must already exist
        // under some identity.
        let product_id = product
            .id()
            .ok_or(ValidationError::MissingReferenceId { field: "product" })?;
        let invoice_id = invoice
            .id()
            .ok_or(ValidationError::MissingReferenceId { field: "invoice" })?;

        validate_for_read(Product::NAME, product_id)?;
        validate_for_read(Invoice::NAME, invoice_id)
    }
}

// =============================================================================
// Rule Helpers
// =============================================================================

/// Validates that an invoice's after-tax total equals subtotal plus taxes.
///
/// ## Example
/// ```rust
/// use invoices_core::validation::validate_totals;
/// use invoices_core::Invoice;
///
/// assert!(validate_totals(&Invoice::new("C1", "Ann", 100.0, 12.0, 112.0)).is_ok());
/// assert!(validate_totals(&Invoice::new("C1", "Ann", 100.0, 12.0, 112.005)).is_ok());
/// assert!(validate_totals(&Invoice::new("C1", "Ann", 100.0, 12.0, 200.0)).is_err());
/// ```
pub fn validate_totals(invoice: &Invoice) -> ValidationResult<()> {
    let expected = invoice.expected_total();
    if (expected - invoice.total_after_taxes).abs() > TOTAL_TOLERANCE {
        return Err(ValidationError::TotalMismatch {
            expected,
            actual: invoice.total_after_taxes,
        });
    }
    Ok(())
}

fn require_text(field: &'static str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required { field });
    }
    Ok(())
}

fn require_non_negative(field: &'static str, value: f64) -> ValidationResult<()> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite { field });
    }
    if value < 0.0 {
        return Err(ValidationError::Negative { field });
    }
    Ok(())
}

fn require_positive(field: &'static str, value: f64) -> ValidationResult<()> {
    require_non_negative(field, value)?;
    if value == 0.0 {
        return Err(ValidationError::MustBePositive { field });
    }
    Ok(())
}

/// Length bounds count characters, not bytes.
fn check_length(
    rejected: &mut Vec<FieldError>,
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
) {
    let len = value.chars().count();
    let rule = if len < min {
        ValidationError::TooShort { field, min }
    } else if len > max {
        ValidationError::TooLong { field, max }
    } else {
        return;
    };
    rejected.push(FieldError::new(field, value, &rule));
}

// =============================================================================
// Unit Tests
// =============================================================================
