//! Pipeline workers for geofeed.
//!
//! One run is fetch → dedup → enrichment fan-out → batch persist:
//! - Dedup (one existence query, fail closed)
//! - Enrichment (bounded concurrent inference, per-item isolation)
//! - Persist (single all-or-nothing insert)
//! - Pipeline (sequencing, run reports, serialised runs)
//! - Scheduler (interval trigger)

pub mod dedup;
pub mod enrichment;
pub mod persist;
pub mod pipeline;
pub mod scheduler;


pub use dedup::DedupFilter;
pub use enrichment::{EnrichmentWorker, FanOutReport, SkippedItem};
pub use persist::BatchPersister;
pub use pipeline::*;
pub use scheduler::*;
