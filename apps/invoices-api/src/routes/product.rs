//! # Product Routes
//!
//! `/invoices/products` and `/invoices/products/{id}`.
//!
//! Products can be replaced and removed while invoice lines still point at
//! them; those lines then read back without a product.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{OriginalUri, Path, State};
use axum::http::StatusCode;
use axum::Json;

use invoices_core::Product;

use super::{json_body, path_id};
use crate::error::{ApiResult, AtPath};
use crate::state::AppState;

/// `GET /invoices/products`
pub async fn list(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
) -> ApiResult<Json<Vec<Product>>> {
    let products = state.products.list().await.at(uri.path())?;
    Ok(Json(products))
}

/// `GET /invoices/products/{id}`
pub async fn get(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Product>> {
    let id = path_id(id, uri.path())?;
    let product = state.products.get_by_id(id).await.at(uri.path())?;
    Ok(Json(product))
}

/// `POST /invoices/products`
pub async fn create(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    body: Result<Json<Product>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Product>)> {
    let product = json_body(body, uri.path())?;
    let saved = state.products.upsert(product).await.at(uri.path())?;
    Ok((StatusCode::CREATED, Json(saved)))
}

/// `PUT /invoices/products/{id}`
pub async fn update(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<Product>, JsonRejection>,
) -> ApiResult<Json<Product>> {
    let id = path_id(id, uri.path())?;
    let product = json_body(body, uri.path())?;
    let saved = state.products.replace(id, product).await.at(uri.path())?;
    Ok(Json(saved))
}

/// `DELETE /invoices/products/{id}`
pub async fn delete(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<StatusCode> {
    let id = path_id(id, uri.path())?;
    state.products.delete_by_id(id).await.at(uri.path())?;
    Ok(StatusCode::NO_CONTENT)
}
