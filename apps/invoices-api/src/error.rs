//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Invoices API                       │
//! │                                                                         │
//! │  Handler                                                               │
//! │  Result<T, ApiError>                                                   │
//! │       │                                                                 │
//! │       ├── bad path id / malformed JSON ─────────────► 400 Bad Request  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  EntityService ── CoreError ── kind() ──┬─ BadRequest ──► 400          │
//! │                                          ├─ ValidationFailed ► 400     │
//! │                                          │    (+ errors[])              │
//! │                                          ├─ NotFound ────► 404          │
//! │                                          └─ Internal ────► 500          │
//! │                                               logged, generic message   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Response Body
//! ```json
//! {
//!   "timestamp": "2024-05-01T10:00:00Z",
//!   "status": 404,
//!   "error": "Not Found",
//!   "message": "Invoice with id 9 not found",
//!   "path": "/invoices/9"
//! }
//! ```

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

use invoices_core::{CoreError, CoreResult, ErrorKind, FieldError};

/// Message returned for every internal failure. The cause is only logged.
pub const INTERNAL_ERROR_MESSAGE: &str = "An internal server error occurred";

/// Error returned from HTTP handlers.
#[derive(Debug)]
pub struct ApiError {
    kind: ErrorKind,
    message: String,
    errors: Vec<FieldError>,
    path: String,
}

/// JSON body of every error response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub timestamp: DateTime<Utc>,
    pub status: u16,
    pub error: &'static str,
    pub message: String,
    pub path: String,

    /// Only present for field validation failures.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

impl ApiError {
    /// Creates a bad request error for the given request path.
    pub fn bad_request(message: impl Into<String>, path: impl Into<String>) -> Self {
        ApiError {
            kind: ErrorKind::BadRequest,
            message: message.into(),
            errors: Vec::new(),
            path: path.into(),
        }
    }

    /// Converts a service error raised while handling `path`.
    pub fn from_core(err: CoreError, path: impl Into<String>) -> Self {
        let path = path.into();
        let kind = err.kind();

        match err {
            CoreError::FieldsRejected(errors) => ApiError {
                kind,
                message: format!("Field validation failed for {}", field_list(&errors)),
                errors,
                path,
            },
            CoreError::Repository(source) => {
                // Log the actual error but return a generic message
                tracing::error!(path = %path, error = %source, "Repository operation failed");
                ApiError {
                    kind,
                    message: INTERNAL_ERROR_MESSAGE.to_string(),
                    errors: Vec::new(),
                    path,
                }
            }
            other => ApiError {
                kind,
                message: other.to_string(),
                errors: Vec::new(),
                path,
            },
        }
    }

    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self.kind {
            ErrorKind::BadRequest | ErrorKind::ValidationFailed => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The `error` label of the response body.
    pub fn label(&self) -> &'static str {
        match self.kind {
            ErrorKind::BadRequest => "Bad Request",
            ErrorKind::ValidationFailed => "Validation Failed",
            ErrorKind::NotFound => "Not Found",
            ErrorKind::Internal => "Internal Server Error",
        }
    }
}

fn field_list(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.field.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            timestamp: Utc::now(),
            status: status.as_u16(),
            error: self.label(),
            message: self.message,
            path: self.path,
            errors: self.errors,
        };

        (status, Json(body)).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.label(), self.message)
    }
}

impl std::error::Error for ApiError {}

/// Result type for HTTP handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// Attaches the request path to a service result.
///
/// ```rust,ignore
/// let invoice = state.invoices.get_by_id(id).await.at(uri.path())?;
/// ```
pub trait AtPath<T> {
    fn at(self, path: &str) -> ApiResult<T>;
}

impl<T> AtPath<T> for CoreResult<T> {
    fn at(self, path: &str) -> ApiResult<T> {
        self.map_err(|err| ApiError::from_core(err, path))
    }
}
