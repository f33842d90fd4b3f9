//! Concurrent geo enrichment of new feed items.
//!
//! Each item is enriched on its own spawned task. At most `max_concurrency`
//! tasks are in flight; a failing or panicking task drops only its own item.

use futures::stream::{self, StreamExt};
use geofeed_core::{EnrichedRecord, FeedItem, GeoInference, ItemId, Result};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use telemetry::metrics;
use tracing::{debug, warn};

/// An item dropped from the current run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedItem {
    pub id: ItemId,
    pub code: String,
    pub reason: String,
}

/// Settled outcome of one fan-out.
#[derive(Debug, Default)]
pub struct FanOutReport {
    /// Successful records, in completion order.
    pub records: Vec<EnrichedRecord>,
    pub skipped: Vec<SkippedItem>,
}

/// Keeps the in-flight gauge honest even if the task unwinds.
struct InFlight;

impl InFlight {
    fn enter() -> Self {
        metrics().inference_in_flight.inc();
        Self
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        metrics().inference_in_flight.dec();
    }
}

/// Runs geo inference over a batch of items.
pub struct EnrichmentWorker {
    inference: Arc<dyn GeoInference>,
    max_concurrency: usize,
}

impl EnrichmentWorker {
    /// `max_concurrency == 0` lifts the bound.
    pub fn new(inference: Arc<dyn GeoInference>, max_concurrency: usize) -> Self {
        Self {
            inference,
            max_concurrency,
        }
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// Enrich every item; returns once all tasks have settled.
    pub async fn enrich_all(&self, items: Vec<FeedItem>) -> FanOutReport {
        if items.is_empty() {
            return FanOutReport::default();
        }

        let limit = match self.max_concurrency {
            0 => items.len(),
            n => n,
        };

        // Tasks are spawned lazily as the stream is polled, so the limit
        // bounds spawned work, not just awaited handles.
        let tasks = items.into_iter().map(|item| {
            let inference = Arc::clone(&self.inference);
            let id = item.id;
            async move {
                let handle = tokio::spawn(enrich_one(inference, item));
                (id, handle.await)
            }
        });

        let settled: Vec<_> = stream::iter(tasks).buffer_unordered(limit).collect().await;

        let mut report = FanOutReport::default();
        for (id, outcome) in settled {
            match outcome {
                Ok(Ok(record)) => report.records.push(record),
                Ok(Err(e)) => {
                    warn!(item_id = id, code = e.code(), error = %e, "Skipping item");
                    report.skipped.push(SkippedItem {
                        id,
                        code: e.code().to_string(),
                        reason: e.to_string(),
                    });
                }
                Err(join_err) => {
                    warn!(item_id = id, error = %join_err, "Enrichment task aborted, skipping item");
                    report.skipped.push(SkippedItem {
                        id,
                        code: "INTERNAL_001".to_string(),
                        reason: format!("enrichment task aborted: {join_err}"),
                    });
                }
            }
        }

        metrics().items_enriched.inc_by(report.records.len() as u64);
        metrics().items_skipped.inc_by(report.skipped.len() as u64);
        debug!(
            enriched = report.records.len(),
            skipped = report.skipped.len(),
            "Enrichment fan-out settled"
        );
        report
    }
}

async fn enrich_one(inference: Arc<dyn GeoInference>, item: FeedItem) -> Result<EnrichedRecord> {
    let m = metrics();
    m.inference_calls.inc();
    let _in_flight = InFlight::enter();
    let start = Instant::now();

    let result = inference.infer(&item.plain_text()).await;
    m.inference_latency_ms.observe_since(start);

    match result {
        Ok(geo) => Ok(EnrichedRecord::from_parts(item, geo)),
        Err(e) => {
            m.inference_errors.inc();
            Err(e)
        }
    }
}
