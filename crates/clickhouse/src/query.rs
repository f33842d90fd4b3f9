//! Read queries against the records table.

use crate::client::ClickHouseClient;
use crate::insert::RecordRow;
use geofeed_core::{EnrichedRecord, Error, ItemId, Result};

/// Return which of `ids` are already stored, in one query.
pub async fn existing_ids(client: &ClickHouseClient, ids: &[ItemId]) -> Result<Vec<ItemId>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let sql = format!(
        "SELECT DISTINCT id FROM {} WHERE has(?, id)",
        client.qualified_table()
    );

    client
        .inner()
        .query(&sql)
        .bind(ids)
        .fetch_all::<i64>()
        .await
        .map_err(|e| Error::dedup(format!("Query error: {}", e)))
}

/// Count stored records.
pub async fn count_records(client: &ClickHouseClient) -> Result<u64> {
    let sql = format!("SELECT count() FROM {}", client.qualified_table());
    client
        .inner()
        .query(&sql)
        .fetch_one::<u64>()
        .await
        .map_err(|e| Error::internal(format!("Query error: {}", e)))
}

/// Fetch stored records ordered by id (for verification and admin).
pub async fn query_records(client: &ClickHouseClient, limit: u32) -> Result<Vec<EnrichedRecord>> {
    let sql = format!(
        "SELECT ?fields FROM {} ORDER BY id LIMIT ?",
        client.qualified_table()
    );
    client
        .inner()
        .query(&sql)
        .bind(limit)
        .fetch_all::<RecordRow>()
        .await
        .map(|rows| rows.into_iter().map(EnrichedRecord::from).collect())
        .map_err(|e| Error::internal(format!("Query error: {}", e)))
}

/// Truncate the records table (test cleanup).
pub async fn truncate_records(client: &ClickHouseClient) -> Result<()> {
    let sql = format!("TRUNCATE TABLE IF EXISTS {}", client.qualified_table());
    client
        .inner()
        .query(&sql)
        .execute()
        .await
        .map_err(|e| Error::internal(format!("Truncate error: {}", e)))
}
