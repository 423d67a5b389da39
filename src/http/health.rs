//! Liveness of the service's external dependencies.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::state::AppState;

/// `GET /health`: 200 when the database answers a ping, 500 with details otherwise.
///
/// The ping is bounded by the store's ping deadline.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    match state.store.ping().await {
        Ok(()) => (StatusCode::OK, Json(json!({ "database": "healthy" }))),
        Err(e) => {
            tracing::warn!(error = %e, "database health check failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "database": "unhealthy", "details": e.to_string() })),
            )
        }
    }
}

/// `GET /metrics`: Prometheus text exposition.
pub async fn metrics(State(state): State<AppState>) -> String {
    state.observability.metrics().render()
}
