//! Interval trigger for pipeline runs.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::pipeline::Pipeline;

/// Schedule configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Seconds between runs; 0 disables the scheduler (on-demand only)
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// Run once immediately instead of waiting a full interval
    #[serde(default = "default_run_on_start")]
    pub run_on_start: bool,
}

fn default_interval_secs() -> u64 {
    300
}

fn default_run_on_start() -> bool {
    true
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            run_on_start: default_run_on_start(),
        }
    }
}

/// Handle to a running scheduler.
pub struct SchedulerHandle {
    stop: CancellationToken,
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Stop ticking. A run already in progress completes first.
    pub async fn shutdown(self) {
        self.stop.cancel();
        if let Err(e) = self.task.await {
            warn!(error = %e, "Scheduler task ended abnormally");
        }
        info!("Scheduler stopped");
    }
}

/// Runs the pipeline on a fixed interval.
pub struct PipelineScheduler {
    pipeline: Arc<Pipeline>,
    config: ScheduleConfig,
}

impl PipelineScheduler {
    pub fn new(pipeline: Arc<Pipeline>, config: ScheduleConfig) -> Self {
        Self { pipeline, config }
    }

    /// Spawn the ticker. Returns `None` when scheduling is disabled.
    pub fn start(self) -> Option<SchedulerHandle> {
        if self.config.interval_secs == 0 {
            info!("Scheduler disabled, runs are on-demand only");
            return None;
        }

        info!(
            interval_secs = self.config.interval_secs,
            run_on_start = self.config.run_on_start,
            "Scheduler started"
        );
        let stop = CancellationToken::new();
        let task = tokio::spawn(self.run_loop(stop.clone()));
        Some(SchedulerHandle { stop, task })
    }

    async fn run_loop(self, stop: CancellationToken) {
        let mut ticker = interval(Duration::from_secs(self.config.interval_secs));
        // A run longer than the interval delays the next tick instead of
        // queueing a burst.
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        // The first tick completes immediately.
        if !self.config.run_on_start {
            ticker.tick().await;
        }

        loop {
            // Only the wait between runs is interruptible.
            tokio::select! {
                biased;
                _ = stop.cancelled() => break,
                _ = ticker.tick() => {}
            }

            let report = self.pipeline.run().await;
            if report.outcome.is_failed() {
                warn!(run_id = %report.run_id, "Scheduled run failed, retrying next interval");
            }
        }
    }
}
