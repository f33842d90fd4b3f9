//! Persisted, geo-tagged records.

use serde::{Deserialize, Serialize};

use crate::feed::{FeedItem, ItemId};
use crate::geo::GeoResult;

/// A feed item joined with its resolved location.
///
/// Field names match the store table columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRecord {
    pub id: ItemId,
    pub rich_text: String,
    pub create_time: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl EnrichedRecord {
    /// Combine an item's own fields with its geo result.
    pub fn from_parts(item: FeedItem, geo: GeoResult) -> Self {
        Self {
            id: item.id,
            rich_text: item.rich_text,
            create_time: item.create_time,
            address: geo.address,
            latitude: geo.lat,
            longitude: geo.lng,
        }
    }
}
