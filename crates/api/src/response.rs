//! Standardized API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use geofeed_core::Stage;
use serde::Serialize;
use telemetry::ComponentHealthReport;
use worker::{RunOutcome, RunReport};

/// Body of a successful on-demand run.
#[derive(Debug, Serialize)]
pub struct RunResponse {
    pub success: bool,
    pub timestamp: i64,
    pub report: RunReport,
}

impl RunResponse {
    pub fn new(report: RunReport) -> Self {
        Self {
            success: !report.outcome.is_failed(),
            timestamp: chrono::Utc::now().timestamp_millis(),
            report,
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub store_backend: String,
    pub components: Vec<ComponentHealthReport>,
    pub runs_completed: u64,
    pub runs_failed: u64,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<Stage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<RunReport>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
            stage: None,
            report: None,
        }
    }
}

/// API error carrying a pipeline error code.
pub struct ApiError {
    pub status: StatusCode,
    pub response: ErrorResponse,
}

impl ApiError {
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            response: ErrorResponse::new(message, "INTERNAL_001"),
        }
    }

    /// Map a failed run to a response. Upstream collaborator failures are
    /// gateway errors; anything else is internal.
    pub fn run_failed(report: RunReport) -> Self {
        let (status, response) = match &report.outcome {
            RunOutcome::Failed {
                stage,
                code,
                message,
            } => {
                let status = match stage {
                    Stage::Fetch => StatusCode::BAD_GATEWAY,
                    Stage::Dedup | Stage::Persist => StatusCode::SERVICE_UNAVAILABLE,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                let mut response = ErrorResponse::new(message.clone(), code.clone());
                response.stage = Some(*stage);
                (status, response)
            }
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::new("run did not fail", "INTERNAL_001"),
            ),
        };

        Self {
            status,
            response: ErrorResponse {
                report: Some(report),
                ..response
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.response)).into_response()
    }
}
