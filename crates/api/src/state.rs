//! Application state shared across handlers.

use std::sync::Arc;
use worker::Pipeline;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
    /// Name of the configured record store, reported by `/health`
    pub store_backend: &'static str,
}

impl AppState {
    pub fn new(pipeline: Arc<Pipeline>, store_backend: &'static str) -> Self {
        Self {
            pipeline,
            store_backend,
        }
    }
}
