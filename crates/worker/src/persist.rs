//! Batch persistence of enriched records.

use geofeed_core::{EnrichedRecord, Error, RecordStore, Result};
use std::sync::Arc;
use std::time::Instant;
use telemetry::metrics;
use tracing::{error, info};

/// Writes a run's records in one store call.
pub struct BatchPersister {
    store: Arc<dyn RecordStore>,
}

impl BatchPersister {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Insert all records at once. An empty batch never reaches the store.
    ///
    /// A failure means none of the batch was committed; there is no
    /// per-record retry.
    pub async fn persist(&self, records: &[EnrichedRecord]) -> Result<usize> {
        if records.is_empty() {
            return Ok(0);
        }

        let start = Instant::now();
        let result = self.store.insert_batch(records).await;
        let latency_ms = metrics().persist_latency_ms.observe_since(start);

        match result {
            Ok(count) => {
                metrics().records_persisted.inc_by(count as u64);
                info!(backend = self.store.name(), count, latency_ms, "Persisted batch");
                Ok(count)
            }
            Err(e) => {
                metrics().persist_errors.inc();
                error!(
                    backend = self.store.name(),
                    count = records.len(),
                    error = %e,
                    "Batch insert failed"
                );
                Err(match e {
                    Error::Persist(_) => e,
                    other => Error::persist(other.to_string()),
                })
            }
        }
    }
}
