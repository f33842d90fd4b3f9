//! Collaborator seams of the pipeline.
//!
//! The pipeline only talks to the outside world through these traits, so the
//! worker crate never depends on a concrete backend and tests can swap in
//! in-memory doubles.

use async_trait::async_trait;
use std::collections::HashSet;

use crate::error::Result;
use crate::feed::{FeedItem, ItemId};
use crate::geo::GeoResult;
use crate::record::EnrichedRecord;

/// Source of the current feed page.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Fetch the latest page of items.
    async fn fetch(&self) -> Result<Vec<FeedItem>>;
}

/// Key-addressable table of enriched records.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Return the subset of `ids` already present, in a single query.
    async fn existing_ids(&self, ids: &[ItemId]) -> Result<HashSet<ItemId>>;

    /// Insert all records in one call; either all are committed or none.
    async fn insert_batch(&self, records: &[EnrichedRecord]) -> Result<usize>;

    /// Short backend name for logs.
    fn name(&self) -> &'static str;
}

/// Text → location capability.
#[async_trait]
pub trait GeoInference: Send + Sync {
    async fn infer(&self, text: &str) -> Result<GeoResult>;
}
