//! `RecordStore` backed by ClickHouse.

use async_trait::async_trait;
use geofeed_core::{EnrichedRecord, ItemId, RecordStore, Result};
use std::collections::HashSet;

use crate::client::ClickHouseClient;
use crate::{insert, query};

/// Record store over a single ClickHouse table.
#[derive(Clone)]
pub struct ClickHouseStore {
    client: ClickHouseClient,
}

impl ClickHouseStore {
    pub fn new(client: ClickHouseClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ClickHouseClient {
        &self.client
    }
}

#[async_trait]
impl RecordStore for ClickHouseStore {
    async fn existing_ids(&self, ids: &[ItemId]) -> Result<HashSet<ItemId>> {
        let found = query::existing_ids(&self.client, ids).await?;
        Ok(found.into_iter().collect())
    }

    async fn insert_batch(&self, records: &[EnrichedRecord]) -> Result<usize> {
        insert::insert_records(&self.client, records).await
    }

    fn name(&self) -> &'static str {
        "clickhouse"
    }
}
