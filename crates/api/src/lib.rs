//! HTTP surface: on-demand run trigger, health probes, metrics.

pub mod response;
pub mod routes;
pub mod state;

pub use routes::router;
pub use state::AppState;
