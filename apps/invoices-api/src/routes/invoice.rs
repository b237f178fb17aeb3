//! # Invoice Routes
//!
//! `/invoices` and `/invoices/{id}`.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{OriginalUri, Path, State};
use axum::http::StatusCode;
use axum::Json;

use invoices_core::Invoice;

use super::{json_body, path_id};
use crate::error::{ApiResult, AtPath};
use crate::state::AppState;

/// `GET /invoices`
pub async fn list(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
) -> ApiResult<Json<Vec<Invoice>>> {
    let invoices = state.invoices.list().await.at(uri.path())?;
    Ok(Json(invoices))
}

/// `GET /invoices/{id}`
pub async fn get(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Invoice>> {
    let id = path_id(id, uri.path())?;
    let invoice = state.invoices.get_by_id(id).await.at(uri.path())?;
    Ok(Json(invoice))
}

/// `POST /invoices`
///
/// An identity in the body is honored: the record is replaced, or created
/// under that identity.
pub async fn create(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    body: Result<Json<Invoice>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Invoice>)> {
    let invoice = json_body(body, uri.path())?;
    let saved = state.invoices.upsert(invoice).await.at(uri.path())?;
    Ok((StatusCode::CREATED, Json(saved)))
}

/// `PUT /invoices/{id}`
pub async fn update(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<Invoice>, JsonRejection>,
) -> ApiResult<Json<Invoice>> {
    let id = path_id(id, uri.path())?;
    let invoice = json_body(body, uri.path())?;
    let saved = state.invoices.replace(id, invoice).await.at(uri.path())?;
    Ok(Json(saved))
}

/// `DELETE /invoices/{id}`
pub async fn delete(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<StatusCode> {
    let id = path_id(id, uri.path())?;
    state.invoices.delete_by_id(id).await.at(uri.path())?;
    Ok(StatusCode::NO_CONTENT)
}
