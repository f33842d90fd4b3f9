//! Pipeline orchestrator: fetch → dedup → enrich → persist.

use chrono::{DateTime, Utc};
use geofeed_core::{Error, FeedSource, GeoInference, RecordStore, Result, Stage};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use telemetry::{health, metrics};
use tokio::sync::Mutex;
use tracing::{error, info};
use uuid::Uuid;

use crate::dedup::DedupFilter;
use crate::enrichment::{EnrichmentWorker, SkippedItem};
use crate::persist::BatchPersister;

/// Pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Upper bound on concurrent inference calls; 0 lifts the bound
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
}

fn default_max_concurrency() -> usize {
    8
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_concurrency: default_max_concurrency(),
        }
    }
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunOutcome {
    Completed,
    NoNewItems,
    Failed {
        stage: Stage,
        code: String,
        message: String,
    },
}

impl RunOutcome {
    fn failed(e: &Error) -> Self {
        Self::Failed {
            stage: e.stage(),
            code: e.code().to_string(),
            message: e.to_string(),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Summary of one pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub fetched: usize,
    pub new: usize,
    pub enriched: usize,
    pub skipped: usize,
    pub persisted: usize,
    pub skipped_items: Vec<SkippedItem>,
    pub outcome: RunOutcome,
}

impl RunReport {
    fn begin() -> Self {
        let now = Utc::now();
        Self {
            run_id: Uuid::new_v4(),
            started_at: now,
            finished_at: now,
            fetched: 0,
            new: 0,
            enriched: 0,
            skipped: 0,
            persisted: 0,
            skipped_items: Vec::new(),
            outcome: RunOutcome::NoNewItems,
        }
    }
}

/// The enrichment pipeline over its three collaborators.
///
/// Holds no state between runs. Runs are serialised: a trigger arriving
/// while a run is in progress waits for it to finish.
pub struct Pipeline {
    feed: Arc<dyn FeedSource>,
    dedup: DedupFilter,
    enrichment: EnrichmentWorker,
    persister: BatchPersister,
    run_lock: Mutex<()>,
}

impl Pipeline {
    pub fn new(
        feed: Arc<dyn FeedSource>,
        store: Arc<dyn RecordStore>,
        inference: Arc<dyn GeoInference>,
        config: &PipelineConfig,
    ) -> Self {
        Self {
            feed,
            dedup: DedupFilter::new(Arc::clone(&store)),
            enrichment: EnrichmentWorker::new(inference, config.max_concurrency),
            persister: BatchPersister::new(store),
            run_lock: Mutex::new(()),
        }
    }

    /// Execute one run. Never fails: phase errors end the run and are
    /// reported in the returned outcome.
    pub async fn run(&self) -> RunReport {
        let _guard = self.run_lock.lock().await;

        let m = metrics();
        m.runs_started.inc();
        let start = Instant::now();

        let mut report = RunReport::begin();
        info!(run_id = %report.run_id, "Pipeline run started");

        match self.execute(&mut report).await {
            Ok(outcome) => {
                m.runs_completed.inc();
                report.outcome = outcome;
            }
            Err(e) => {
                m.runs_failed.inc();
                error!(
                    run_id = %report.run_id,
                    stage = e.stage().as_str(),
                    code = e.code(),
                    error = %e,
                    "Pipeline run failed"
                );
                report.outcome = RunOutcome::failed(&e);
            }
        }

        report.finished_at = Utc::now();
        let latency_ms = m.run_latency_ms.observe_since(start);
        info!(
            run_id = %report.run_id,
            fetched = report.fetched,
            new = report.new,
            enriched = report.enriched,
            skipped = report.skipped,
            persisted = report.persisted,
            latency_ms,
            "Pipeline run finished"
        );
        report
    }

    /// Wait until no run is in progress.
    pub async fn wait_idle(&self) {
        let _guard = self.run_lock.lock().await;
    }

    async fn execute(&self, report: &mut RunReport) -> Result<RunOutcome> {
        let m = metrics();
        let h = health();

        // fetch
        let start = Instant::now();
        let fetched = self.feed.fetch().await;
        m.fetch_latency_ms.observe_since(start);
        let items = match fetched {
            Ok(items) => {
                h.feed.set_healthy();
                items
            }
            Err(e) => {
                m.fetch_errors.inc();
                h.feed.set_unhealthy(e.to_string());
                return Err(e);
            }
        };
        report.fetched = items.len();
        m.items_fetched.inc_by(items.len() as u64);

        // dedup
        let fresh = match self.dedup.filter_items(items).await {
            Ok(fresh) => {
                h.store.set_healthy();
                fresh
            }
            Err(e) => {
                m.dedup_errors.inc();
                h.store.set_unhealthy(e.to_string());
                return Err(e);
            }
        };
        report.new = fresh.len();
        m.items_new.inc_by(fresh.len() as u64);

        if fresh.is_empty() {
            info!(run_id = %report.run_id, fetched = report.fetched, "No new items");
            return Ok(RunOutcome::NoNewItems);
        }
        info!(run_id = %report.run_id, new = fresh.len(), "Enriching new items");

        // enrich
        let fan_out = self.enrichment.enrich_all(fresh).await;
        report.enriched = fan_out.records.len();
        report.skipped = fan_out.skipped.len();
        report.skipped_items = fan_out.skipped;
        if report.enriched > 0 {
            h.inference.set_healthy();
        } else {
            h.inference
                .set_unhealthy(format!("all {} inference calls failed", report.skipped));
        }

        // persist
        match self.persister.persist(&fan_out.records).await {
            Ok(count) => {
                report.persisted = count;
                if count > 0 {
                    h.store.set_healthy();
                }
            }
            Err(e) => {
                h.store.set_unhealthy(e.to_string());
                return Err(e);
            }
        }

        Ok(RunOutcome::Completed)
    }
}
