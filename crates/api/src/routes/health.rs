//! Health check endpoints.

use axum::{extract::State, http::StatusCode, Json};
use telemetry::{health, metrics};

use crate::response::HealthResponse;
use crate::state::AppState;

/// GET /health - Full health check.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let report = health().report();

    Json(HealthResponse {
        status: report.status.as_str().to_string(),
        store_backend: state.store_backend.to_string(),
        components: report.components,
        runs_completed: metrics().runs_completed.get(),
        runs_failed: metrics().runs_failed.get(),
    })
}

/// GET /health/ready - Readiness probe (store reachable).
pub async fn ready_handler() -> StatusCode {
    if health().is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// GET /health/live - Liveness probe (service is running).
pub async fn live_handler() -> StatusCode {
    if health().is_alive() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}
