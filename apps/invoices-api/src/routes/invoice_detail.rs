//! # Invoice Detail Routes
//!
//! `/invoices/details` and `/invoices/details/{id}`.
//!
//! ## Request Body
//! Owners are referenced by identity only:
//! ```json
//! { "totalprice": 30.0, "product": { "id": 3 }, "invoice": { "id": 9 } }
//! ```
//! The response embeds the stored product and invoice.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{OriginalUri, Path, State};
use axum::http::StatusCode;
use axum::Json;

use invoices_core::InvoiceDetails;

use super::{json_body, path_id};
use crate::error::{ApiResult, AtPath};
use crate::state::AppState;

pub async fn list(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
) -> ApiResult<Json<Vec<InvoiceDetails>>> {
    let details = state.details.list().await.at(uri.path())?;
    Ok(Json(details))
}

pub async fn get(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<InvoiceDetails>> {
    let id = path_id(id, uri.path())?;
    let details = state.details.get_by_id(id).await.at(uri.path())?;
    Ok(Json(details))
}

pub async fn create(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    body: Result<Json<InvoiceDetails>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<InvoiceDetails>)> {
    let details = json_body(body, uri.path())?;
    let saved = state.details.upsert(details).await.at(uri.path())?;
    Ok((StatusCode::CREATED, Json(saved)))
}

pub async fn update(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<InvoiceDetails>, JsonRejection>,
) -> ApiResult<Json<InvoiceDetails>> {
    let id = path_id(id, uri.path())?;
    let details = json_body(body, uri.path())?;
    let saved = state.details.replace(id, details).await.at(uri.path())?;
    Ok(Json(saved))
}

pub async fn delete(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<StatusCode> {
    let id = path_id(id, uri.path())?;
    state.details.delete_by_id(id).await.at(uri.path())?;
    Ok(StatusCode::NO_CONTENT)
}
