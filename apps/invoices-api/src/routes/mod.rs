//! # HTTP Routes
//!
//! One plain handler function per route. Handlers do three things: pull the
//! id and body out of the request, call one entity service operation, and
//! pick the status code.
//!
//! ## Route Table
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │  GET    /health                         health::check                │
//! │                                                                      │
//! │  GET    /invoices                       invoice::list                │
//! │  POST   /invoices                       invoice::create       201    │
//! │  GET    /invoices/{id}                  invoice::get                 │
//! │  PUT    /invoices/{id}                  invoice::update              │
//! │  DELETE /invoices/{id}                  invoice::delete       204    │
//! │                                                                      │
//! │  GET    /invoices/products              product::list                │
//! │  POST   /invoices/products              product::create       201    │
//! │  GET    /invoices/products/{id}         product::get                 │
//! │  PUT    /invoices/products/{id}         product::update              │
//! │  DELETE /invoices/products/{id}         product::delete       204    │
//! │                                                                      │
//! │  GET    /invoices/details               invoice_detail::list         │
//! │  POST   /invoices/details               invoice_detail::create 201   │
//! │  GET    /invoices/details/{id}          invoice_detail::get          │
//! │  PUT    /invoices/details/{id}          invoice_detail::update       │
//! │  DELETE /invoices/details/{id}          invoice_detail::delete 204   │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `/invoices/products` and `/invoices/details` are static segments and win
//! over `/invoices/{id}`.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::Path;
use axum::routing::get;
use axum::{Json, Router};
use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub mod health;
pub mod invoice;
pub mod invoice_detail;
pub mod product;

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::check))
        .route("/invoices", get(invoice::list).post(invoice::create))
        .route(
            "/invoices/{id}",
            get(invoice::get).put(invoice::update).delete(invoice::delete),
        )
        .route("/invoices/products", get(product::list).post(product::create))
        .route(
            "/invoices/products/{id}",
            get(product::get).put(product::update).delete(product::delete),
        )
        .route(
            "/invoices/details",
            get(invoice_detail::list).post(invoice_detail::create),
        )
        .route(
            "/invoices/details/{id}",
            get(invoice_detail::get)
                .put(invoice_detail::update)
                .delete(invoice_detail::delete),
        )
        .with_state(state)
}

// =============================================================================
// Extraction Helpers
// =============================================================================

/// Unwraps the `{id}` segment, turning a non-numeric id into a bad request.
pub(crate) fn path_id(id: Result<Path<i64>, PathRejection>, path: &str) -> ApiResult<i64> {
    match id {
        Ok(Path(id)) => Ok(id),
        Err(rejection) => {
            debug!(path, %rejection, "Rejected path id");
            Err(ApiError::bad_request(
                "parameter 'id' must be of type i64",
                path,
            ))
        }
    }
}

/// Unwraps a JSON body, turning a malformed one into a bad request.
pub(crate) fn json_body<T>(body: Result<Json<T>, JsonRejection>, path: &str) -> ApiResult<T> {
    match body {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => {
            debug!(path, %rejection, "Rejected request body");
            Err(ApiError::bad_request(rejection.body_text(), path))
        }
    }
}
