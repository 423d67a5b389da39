//! Per-request metrics.

use std::time::Instant;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::state::AppState;

/// Count the request and record its latency once the response is ready.
pub async fn track_metrics(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let started = Instant::now();
    let method = request.method().clone();

    let response = next.run(request).await;

    if state.observability.metrics_enabled() {
        state
            .observability
            .metrics()
            .record_request(method.as_str(), response.status().as_u16(), started);
    }
    response
}
