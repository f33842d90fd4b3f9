//! In-process pipeline metrics.
//!
//! Counters accumulate for the lifetime of the process; the API exposes a
//! point-in-time snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Monotonic counter.
#[derive(Debug, Default)]
pub struct Counter(AtomicU64);

impl Counter {
    pub fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    pub fn inc(&self) {
        self.inc_by(1);
    }

    pub fn inc_by(&self, n: u64) {
        self.0.fetch_add(n, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// Value that moves both ways. Never drops below zero.
#[derive(Debug, Default)]
pub struct Gauge(AtomicU64);

impl Gauge {
    pub fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    pub fn set(&self, val: u64) {
        self.0.store(val, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }

    pub fn inc(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    pub fn dec(&self) {
        let _ = self
            .0
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |v| Some(v.saturating_sub(1)));
    }
}

/// Latency histogram in milliseconds.
#[derive(Debug)]
pub struct Histogram {
    /// Upper bounds: 10ms, 50ms, 100ms, 250ms, 500ms, 1s, 2.5s, 5s, 10s, 30s, 60s
    buckets: [AtomicU64; 11],
    sum: AtomicU64,
    count: AtomicU64,
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new()
    }
}

impl Histogram {
    const BUCKET_BOUNDS: [u64; 11] = [10, 50, 100, 250, 500, 1000, 2500, 5000, 10000, 30000, 60000];

    pub fn new() -> Self {
        Self {
            buckets: Default::default(),
            sum: AtomicU64::new(0),
            count: AtomicU64::new(0),
        }
    }

    /// Records a value in milliseconds.
    pub fn observe(&self, ms: u64) {
        self.sum.fetch_add(ms, Ordering::Relaxed);
        self.count.fetch_add(1, Ordering::Relaxed);

        let idx = Self::BUCKET_BOUNDS
            .iter()
            .position(|&bound| ms <= bound)
            .unwrap_or(Self::BUCKET_BOUNDS.len() - 1);
        self.buckets[idx].fetch_add(1, Ordering::Relaxed);
    }

    /// Records the time elapsed since `start`.
    pub fn observe_since(&self, start: Instant) -> u64 {
        let ms = start.elapsed().as_millis() as u64;
        self.observe(ms);
        ms
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    pub fn sum(&self) -> u64 {
        self.sum.load(Ordering::Relaxed)
    }

    pub fn mean(&self) -> f64 {
        let count = self.count();
        if count == 0 {
            0.0
        } else {
            self.sum() as f64 / count as f64
        }
    }

    /// Returns `(upper_bound_ms, count)` pairs.
    pub fn buckets(&self) -> Vec<(u64, u64)> {
        Self::BUCKET_BOUNDS
            .iter()
            .zip(self.buckets.iter())
            .map(|(&bound, count)| (bound, count.load(Ordering::Relaxed)))
            .collect()
    }
}

/// Collected metrics for the pipeline.
#[derive(Debug, Default)]
pub struct Metrics {
    // Runs
    pub runs_started: Counter,
    pub runs_completed: Counter,
    pub runs_failed: Counter,

    // Items
    pub items_fetched: Counter,
    pub items_new: Counter,
    pub items_enriched: Counter,
    pub items_skipped: Counter,

    // Inference
    pub inference_calls: Counter,
    pub inference_errors: Counter,
    pub inference_in_flight: Gauge,

    // Store
    pub records_persisted: Counter,
    pub persist_errors: Counter,
    pub dedup_errors: Counter,
    pub fetch_errors: Counter,

    // Latency histograms
    pub fetch_latency_ms: Histogram,
    pub inference_latency_ms: Histogram,
    pub persist_latency_ms: Histogram,
    pub run_latency_ms: Histogram,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes a snapshot of current metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            timestamp: Utc::now(),
            runs_started: self.runs_started.get(),
            runs_completed: self.runs_completed.get(),
            runs_failed: self.runs_failed.get(),
            items_fetched: self.items_fetched.get(),
            items_new: self.items_new.get(),
            items_enriched: self.items_enriched.get(),
            items_skipped: self.items_skipped.get(),
            inference_calls: self.inference_calls.get(),
            inference_errors: self.inference_errors.get(),
            inference_in_flight: self.inference_in_flight.get(),
            records_persisted: self.records_persisted.get(),
            persist_errors: self.persist_errors.get(),
            dedup_errors: self.dedup_errors.get(),
            fetch_errors: self.fetch_errors.get(),
            fetch_latency_mean_ms: self.fetch_latency_ms.mean(),
            inference_latency_mean_ms: self.inference_latency_ms.mean(),
            persist_latency_mean_ms: self.persist_latency_ms.mean(),
            run_latency_mean_ms: self.run_latency_ms.mean(),
        }
    }
}

/// A snapshot of metrics at a point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub timestamp: DateTime<Utc>,
    pub runs_started: u64,
    pub runs_completed: u64,
    pub runs_failed: u64,
    pub items_fetched: u64,
    pub items_new: u64,
    pub items_enriched: u64,
    pub items_skipped: u64,
    pub inference_calls: u64,
    pub inference_errors: u64,
    pub inference_in_flight: u64,
    pub records_persisted: u64,
    pub persist_errors: u64,
    pub dedup_errors: u64,
    pub fetch_errors: u64,
    pub fetch_latency_mean_ms: f64,
    pub inference_latency_mean_ms: f64,
    pub persist_latency_mean_ms: f64,
    pub run_latency_mean_ms: f64,
}

/// Global metrics registry.
pub static METRICS: std::sync::LazyLock<Metrics> = std::sync::LazyLock::new(Metrics::new);

/// Get the global metrics instance.
pub fn metrics() -> &'static Metrics {
    &METRICS
}
