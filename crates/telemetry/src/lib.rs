//! Internal telemetry for the geofeed pipeline.
//!
//! Logs go through `tracing`; counters and component health live in process
//! and are exposed by the API crate.

pub mod health;
pub mod metrics;
pub mod tracing_setup;

pub use health::*;
pub use metrics::*;
pub use tracing_setup::*;
