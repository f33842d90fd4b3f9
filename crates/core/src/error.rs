//! Unified error types for the geofeed pipeline.
//!
//! Error codes:
//! - FETCH_001-002: Feed source errors
//! - DEDUP_001: Store existence query errors
//! - ENRICH_001-002: Per-item inference errors
//! - PERSIST_001: Batch insert errors
//! - CONFIG_001: Startup configuration errors
//! - INTERNAL_001: Everything else

use serde::Serialize;
use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Pipeline phase an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Fetch,
    Dedup,
    Enrich,
    Persist,
    Startup,
    Internal,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fetch => "fetch",
            Self::Dedup => "dedup",
            Self::Enrich => "enrich",
            Self::Persist => "persist",
            Self::Startup => "startup",
            Self::Internal => "internal",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unified error type for the geofeed pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// Feed endpoint unreachable or returned a non-success status.
    #[error("feed fetch failed: {0}")]
    Fetch(String),

    /// Feed responded but the body did not match the expected envelope.
    #[error("malformed feed response: {0}")]
    MalformedFeed(String),

    /// Store existence query failed.
    #[error("dedup query failed: {0}")]
    Dedup(String),

    /// Inference transport or provider error for a single item.
    #[error("inference failed: {0}")]
    Inference(String),

    /// Inference engine answered, but not with the agreed JSON object.
    #[error("malformed inference response: {0}")]
    MalformedResponse(String),

    /// Batch insert failed; nothing from the batch was committed.
    #[error("persist failed: {0}")]
    Persist(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch(msg.into())
    }

    pub fn malformed_feed(msg: impl Into<String>) -> Self {
        Self::MalformedFeed(msg.into())
    }

    pub fn dedup(msg: impl Into<String>) -> Self {
        Self::Dedup(msg.into())
    }

    pub fn inference(msg: impl Into<String>) -> Self {
        Self::Inference(msg.into())
    }

    pub fn malformed_response(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }

    pub fn persist(msg: impl Into<String>) -> Self {
        Self::Persist(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Get the stable error code string.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Fetch(_) => "FETCH_001",
            Self::MalformedFeed(_) => "FETCH_002",
            Self::Dedup(_) => "DEDUP_001",
            Self::Inference(_) => "ENRICH_001",
            Self::MalformedResponse(_) => "ENRICH_002",
            Self::Persist(_) => "PERSIST_001",
            Self::Config(_) => "CONFIG_001",
            Self::Serialization(_) | Self::Internal(_) => "INTERNAL_001",
        }
    }

    /// Get the pipeline phase this error belongs to.
    pub fn stage(&self) -> Stage {
        match self {
            Self::Fetch(_) | Self::MalformedFeed(_) => Stage::Fetch,
            Self::Dedup(_) => Stage::Dedup,
            Self::Inference(_) | Self::MalformedResponse(_) => Stage::Enrich,
            Self::Persist(_) => Stage::Persist,
            Self::Config(_) => Stage::Startup,
            Self::Serialization(_) | Self::Internal(_) => Stage::Internal,
        }
    }
}
