//! Feed source health checks.

use geofeed_core::FeedSource;
use tracing::{debug, error};

use crate::client::FeedClient;

/// Check that the feed answers with a decodable page.
pub async fn check_connection(client: &FeedClient) -> bool {
    match client.fetch().await {
        Ok(items) => {
            debug!(items = items.len(), "Feed connection healthy");
            true
        }
        Err(e) => {
            error!(url = %client.url(), "Feed health check failed: {}", e);
            false
        }
    }
}
