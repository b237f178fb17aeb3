//! Health check endpoint.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use tracing::warn;

use crate::state::AppState;

/// Body of `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
    pub version: &'static str,
    pub migrations_applied: usize,
    pub migrations_total: usize,
}

/// `GET /health`
///
/// 200 when the database answers, 503 otherwise.
pub async fn check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let database_up = state.db.health_check().await;
    let migrations = state.db.migration_status().await.ok();

    let (status, label) = if database_up {
        (StatusCode::OK, "healthy")
    } else {
        warn!("Health check failed: database unavailable");
        (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
    };

    let body = HealthResponse {
        status: label,
        database: if database_up { "up" } else { "down" },
        version: env!("CARGO_PKG_VERSION"),
        migrations_applied: migrations.map_or(0, |m| m.applied),
        migrations_total: migrations.map_or(0, |m| m.total),
    };

    (status, Json(body))
}
