//! # Error Types
//!
//! Domain-specific error types for invoices-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  invoices-core errors (this file)                                      │
//! │  ├── ValidationError  - One broken business rule                       │
//! │  ├── FieldError       - One rejected field (structural constraints)    │
//! │  └── CoreError        - What a service operation returns               │
//! │                                                                         │
//! │  invoices-db errors (separate crate)                                   │
//! │  └── DbError          - Boxed into CoreError::Repository, unchanged    │
//! │                                                                         │
//! │  invoices-api errors (in app)                                          │
//! │  └── ApiError         - Status code + JSON payload                     │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ErrorKind → ApiError → Client     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Taxonomy
//! | Kind               | Raised for                                        |
//! |--------------------|---------------------------------------------------|
//! | `BadRequest`       | malformed id, missing/invalid field, bad totals   |
//! | `ValidationFailed` | length constraints, one entry per offending field |
//! | `NotFound`         | no record with that identity                      |
//! | `Internal`         | anything the persistence gateway fails with       |

use serde::Serialize;
use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Errors returned by the entity services.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A business rule was broken (bad request).
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// One or more fields failed structural validation.
    #[error("Field validation failed for {}", field_names(.0))]
    FieldsRejected(Vec<FieldError>),

    /// No record carries the requested identity.
    ///
    /// ## When This Occurs
    /// - `get_by_id` lookup returned nothing
    /// - `delete_by_id` existence probe returned false
    /// - `PUT` on an identity that was never created
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// The persistence gateway failed. The original error is kept as the
    /// source so the boundary can log it.
    #[error("Repository error: {0}")]
    Repository(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl CoreError {
    /// Creates a NotFound error for a given entity label and id.
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        CoreError::NotFound { entity, id }
    }

    /// Wraps a persistence gateway failure.
    pub fn repository<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        CoreError::Repository(Box::new(err))
    }

    /// Classifies the error for the response layer.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::Validation(_) => ErrorKind::BadRequest,
            CoreError::FieldsRejected(_) => ErrorKind::ValidationFailed,
            CoreError::NotFound { .. } => ErrorKind::NotFound,
            CoreError::Repository(_) => ErrorKind::Internal,
        }
    }
}

fn field_names(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.field.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Coarse classification of a [`CoreError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    BadRequest,
    ValidationFailed,
    NotFound,
    Internal,
}

// =============================================================================
// Validation Error
// =============================================================================

/// A broken business rule.
///
/// Raised before any write reaches the persistence gateway, and before any
/// read when the identity itself is malformed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Identity is zero or negative.
    #[error("{entity} id must be a positive number")]
    InvalidId { entity: &'static str },

    /// A required text field is empty or whitespace.
    #[error("{field} is required")]
    Required { field: &'static str },

    /// An amount is below zero.
    #[error("{field} cannot be negative")]
    Negative { field: &'static str },

    /// An amount must be strictly greater than zero.
    #[error("{field} must be greater than 0")]
    MustBePositive { field: &'static str },

    /// An amount is NaN or infinite.
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },

    /// `total_after_taxes` does not match `total_before_taxes + taxes`.
    ///
    /// ## Example
    /// ```text
    /// before = 100.00, taxes = 12.00  → expected 112.00
    /// after  = 200.00                 → TotalMismatch
    /// ```
    #[error(
        "totalAfterTaxes ({actual}) does not match totalBeforeTaxes plus taxes ({expected})"
    )]
    TotalMismatch { expected: f64, actual: f64 },

    /// A dependent record is missing one of its owners.
    #[error("{field} is required on an invoice detail")]
    MissingReference { field: &'static str },

    /// A reference was supplied without an identity.
    #[error("{field} reference must carry an id")]
    MissingReferenceId { field: &'static str },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: &'static str, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },
}

// =============================================================================
// Field Error
// =============================================================================

/// One rejected field, as reported in a validation-failure payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    pub field: String,
    pub rejected_value: serde_json::Value,
    pub message: String,
}

impl FieldError {
    /// Builds a field error from the rule it broke.
    pub fn new(
        field: impl Into<String>,
        rejected_value: impl Into<serde_json::Value>,
        rule: &ValidationError,
    ) -> Self {
        FieldError {
            field: field.into(),
            rejected_value: rejected_value.into(),
            message: rule.to_string(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::not_found("Invoice", 4);
        assert_eq!(err.to_string(), "Invoice with id 4 not found");

        let err = ValidationError::TotalMismatch {
            expected: 112.0,
            actual: 200.0,
        };
        assert_eq!(
            err.to_string(),
            "totalAfterTaxes (200) does not match totalBeforeTaxes plus taxes (112)"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required { field: "name" };
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::TooShort {
            field: "clientName",
            min: 2,
        };
        assert_eq!(err.to_string(), "clientName must be at least 2 characters");
    }

    #[test]
    fn test_kinds() {
        let bad: CoreError = ValidationError::InvalidId { entity: "Product" }.into();
        assert_eq!(bad.kind(), ErrorKind::BadRequest);

        let fields = CoreError::FieldsRejected(vec![]);
        assert_eq!(fields.kind(), ErrorKind::ValidationFailed);

        assert_eq!(CoreError::not_found("Product", 1).kind(), ErrorKind::NotFound);

        let io = std::io::Error::other("disk on fire");
        assert_eq!(CoreError::repository(io).kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_repository_error_keeps_source() {
        use std::error::Error as _;

        let err = CoreError::repository(std::io::Error::other("disk on fire"));
        let source = err.source().map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("disk on fire"));
    }

    #[test]
    fn test_fields_rejected_lists_fields() {
        let rule = ValidationError::TooShort { field: "name", min: 2 };
        let err = CoreError::FieldsRejected(vec![FieldError::new("name", "A", &rule)]);
        assert_eq!(err.to_string(), "Field validation failed for name");
    }

    #[test]
    fn test_field_error_serializes_camel_case() {
        let rule = ValidationError::TooLong {
            field: "clientId",
            max: 50,
        };
        let err = FieldError::new("clientId", "x".repeat(51), &rule);
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["field"], "clientId");
        assert_eq!(json["message"], "clientId must be at most 50 characters");
        assert!(json["rejectedValue"].is_string());
    }
}
