//! Deduplication against the record store.

use geofeed_core::{Error, FeedItem, ItemId, RecordStore, Result};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// Filters candidates down to the ones the store has not seen.
///
/// Fails closed: a failed existence query fails the filter, it is never
/// read as "nothing exists yet".
pub struct DedupFilter {
    store: Arc<dyn RecordStore>,
}

impl DedupFilter {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// IDs from `ids` not present in the store, in input order.
    ///
    /// Issues exactly one existence query, or none for an empty input.
    pub async fn new_ids(&self, ids: &[ItemId]) -> Result<Vec<ItemId>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let existing = self.store.existing_ids(ids).await.map_err(|e| match e {
            Error::Dedup(_) => e,
            other => Error::dedup(other.to_string()),
        })?;

        let fresh: Vec<ItemId> = ids
            .iter()
            .copied()
            .filter(|id| !existing.contains(id))
            .collect();

        debug!(
            backend = self.store.name(),
            candidates = ids.len(),
            existing = existing.len(),
            new = fresh.len(),
            "Dedup query"
        );
        Ok(fresh)
    }

    /// Items whose IDs are new, in page order.
    ///
    /// Repeated IDs within the page collapse to their first occurrence.
    pub async fn filter_items(&self, items: Vec<FeedItem>) -> Result<Vec<FeedItem>> {
        let mut seen = HashSet::with_capacity(items.len());
        let unique: Vec<FeedItem> = items.into_iter().filter(|item| seen.insert(item.id)).collect();

        let ids: Vec<ItemId> = unique.iter().map(|item| item.id).collect();
        let fresh: HashSet<ItemId> = self.new_ids(&ids).await?.into_iter().collect();

        Ok(unique
            .into_iter()
            .filter(|item| fresh.contains(&item.id))
            .collect())
    }
}
