//! Health check endpoint.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use tracing::warn;

use crate::AppState;

/// `200 OK` when the database answers and every migration is applied,
/// `503` otherwise.
#[utoipa::path(
        get,
        path = "/health",
        tag = "health",
        operation_id = "health",
        responses(
            (status = 200, body = String),
            (status = 503, body = String),
        )
    )]
pub async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    if !state.db.health_check().await {
        warn!("Health check failed: database unreachable");
        return (StatusCode::SERVICE_UNAVAILABLE, "Database unavailable");
    }

    match state.db.migration_status().await {
        Ok((total, applied)) if applied >= total => (StatusCode::OK, "OK"),
        Ok((total, applied)) => {
            warn!(total, applied, "Health check failed: pending migrations");
            (StatusCode::SERVICE_UNAVAILABLE, "Migrations pending")
        }
        Err(e) => {
            warn!(error = %e, "Health check failed: migration status unavailable");
            (StatusCode::SERVICE_UNAVAILABLE, "Database unavailable")
        }
    }
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health_handler))
}
