//! Raw feed items as delivered by the news source.

use serde::{Deserialize, Serialize};

use crate::markup::strip_tags;

/// Identifier of a feed item; stable across pages and runs.
pub type ItemId = i64;

/// One raw news entry from the feed.
///
/// Field names match the source wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedItem {
    pub id: ItemId,
    /// Body text, may contain markup.
    pub rich_text: String,
    /// Origin timestamp, carried verbatim (`YYYY-MM-DD HH:MM:SS`).
    pub create_time: String,
}

impl FeedItem {
    pub fn new(id: ItemId, rich_text: impl Into<String>, create_time: impl Into<String>) -> Self {
        Self {
            id,
            rich_text: rich_text.into(),
            create_time: create_time.into(),
        }
    }

    /// Body with markup tags removed.
    pub fn plain_text(&self) -> String {
        strip_tags(&self.rich_text)
    }
}
