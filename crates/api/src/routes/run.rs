//! On-demand pipeline trigger.

use axum::{extract::State, Json};
use tracing::{error, info};

use crate::response::{ApiError, RunResponse};
use crate::state::AppState;

/// GET|POST /run - Execute one pipeline run and return its report.
///
/// Takes no parameters. Waits for an in-progress scheduled run to finish
/// before starting. The run is detached from the request, so a client that
/// disconnects early does not cut it short.
pub async fn run_handler(State(state): State<AppState>) -> Result<Json<RunResponse>, ApiError> {
    info!("On-demand run requested");
    let pipeline = state.pipeline.clone();
    let report = tokio::spawn(async move { pipeline.run().await })
        .await
        .map_err(|e| {
            error!(error = %e, "On-demand run task failed");
            ApiError::internal(format!("run task failed: {e}"))
        })?;

    if report.outcome.is_failed() {
        return Err(ApiError::run_failed(report));
    }
    Ok(Json(RunResponse::new(report)))
}
