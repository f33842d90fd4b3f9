//! Batch insert of enriched records.

use crate::client::ClickHouseClient;
use clickhouse::Row;
use geofeed_core::{EnrichedRecord, Error, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One row of the records table.
#[derive(Debug, Clone, PartialEq, Row, Serialize, Deserialize)]
pub struct RecordRow {
    pub id: i64,
    pub rich_text: String,
    pub create_time: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl From<&EnrichedRecord> for RecordRow {
    fn from(record: &EnrichedRecord) -> Self {
        Self {
            id: record.id,
            rich_text: record.rich_text.clone(),
            create_time: record.create_time.clone(),
            address: record.address.clone(),
            latitude: record.latitude,
            longitude: record.longitude,
        }
    }
}

impl From<RecordRow> for EnrichedRecord {
    fn from(row: RecordRow) -> Self {
        Self {
            id: row.id,
            rich_text: row.rich_text,
            create_time: row.create_time,
            address: row.address,
            latitude: row.latitude,
            longitude: row.longitude,
        }
    }
}

/// Insert all records as a single INSERT.
///
/// Rows are streamed into one request that is only committed by `end()`;
/// a failure before that drops the whole batch.
pub async fn insert_records(client: &ClickHouseClient, records: &[EnrichedRecord]) -> Result<usize> {
    if records.is_empty() {
        return Ok(0);
    }

    let table = client.qualified_table();
    let mut insert = client
        .inner()
        .insert(&table)
        .map_err(|e| Error::persist(format!("Insert error: {}", e)))?;

    for record in records {
        insert
            .write(&RecordRow::from(record))
            .await
            .map_err(|e| Error::persist(format!("Write error: {}", e)))?;
    }

    insert
        .end()
        .await
        .map_err(|e| Error::persist(format!("End error: {}", e)))?;

    debug!(table = %table, count = records.len(), "Inserted records to ClickHouse");
    Ok(records.len())
}
