//! `RecordStore` over Supabase's PostgREST interface.
//!
//! - existence: `GET /rest/v1/{table}?select=id&id=in.(1,2,3)`
//! - insert: `POST /rest/v1/{table}` with a JSON array body. PostgREST runs a
//!   bulk insert in one transaction, so the batch is all-or-nothing.

use async_trait::async_trait;
use geofeed_core::{EnrichedRecord, Error, ItemId, RecordStore, Result};
use reqwest::header::{HeaderMap, HeaderValue, InvalidHeaderValue, AUTHORIZATION};
use serde::Deserialize;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::SupabaseConfig;

#[derive(Debug, Deserialize)]
struct IdRow {
    id: ItemId,
}

/// PostgREST client for the records table.
#[derive(Clone)]
pub struct SupabaseStore {
    http: reqwest::Client,
    table_url: url::Url,
}

impl SupabaseStore {
    pub fn new(config: &SupabaseConfig) -> Result<Self> {
        let table_url = config.table_url()?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(auth_headers(&config.key)?)
            .build()
            .map_err(|e| Error::config(format!("failed to build supabase HTTP client: {e}")))?;

        Ok(Self { http, table_url })
    }

    pub fn table_url(&self) -> &url::Url {
        &self.table_url
    }

    /// Read at most one row to confirm the table is reachable.
    pub async fn probe(&self) -> Result<()> {
        let response = self
            .http
            .get(self.table_url.clone())
            .query(&[("select", "id"), ("limit", "1")])
            .send()
            .await
            .map_err(|e| Error::dedup(format!("supabase unreachable: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::dedup(format!("supabase returned {status}")));
        }
        Ok(())
    }
}

fn auth_headers(key: &str) -> Result<HeaderMap> {
    let invalid = |e: InvalidHeaderValue| Error::config(format!("supabase key is not a valid header value: {e}"));

    let mut headers = HeaderMap::new();
    headers.insert("apikey", HeaderValue::from_str(key).map_err(invalid)?);
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {key}")).map_err(invalid)?,
    );
    Ok(headers)
}

/// PostgREST `in` filter value for a list of ids.
fn in_filter(ids: &[ItemId]) -> String {
    let joined = ids
        .iter()
        .map(ItemId::to_string)
        .collect::<Vec<_>>()
        .join(",");
    format!("in.({joined})")
}

#[async_trait]
impl RecordStore for SupabaseStore {
    async fn existing_ids(&self, ids: &[ItemId]) -> Result<HashSet<ItemId>> {
        if ids.is_empty() {
            return Ok(HashSet::new());
        }

        let response = self
            .http
            .get(self.table_url.clone())
            .query(&[("select", "id".to_string()), ("id", in_filter(ids))])
            .send()
            .await
            .map_err(|e| Error::dedup(format!("supabase unreachable: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, "Supabase existence query failed");
            return Err(Error::dedup(format!("supabase returned {status}: {body}")));
        }

        let rows: Vec<IdRow> = response
            .json()
            .await
            .map_err(|e| Error::dedup(format!("invalid supabase response: {e}")))?;

        debug!(candidates = ids.len(), existing = rows.len(), "Supabase existence query");
        Ok(rows.into_iter().map(|row| row.id).collect())
    }

    async fn insert_batch(&self, records: &[EnrichedRecord]) -> Result<usize> {
        if records.is_empty() {
            return Ok(0);
        }

        let response = self
            .http
            .post(self.table_url.clone())
            .header("Prefer", "return=minimal")
            .json(records)
            .send()
            .await
            .map_err(|e| Error::persist(format!("supabase unreachable: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, count = records.len(), "Supabase insert failed");
            return Err(Error::persist(format!("supabase returned {status}: {body}")));
        }

        debug!(count = records.len(), "Inserted records to Supabase");
        Ok(records.len())
    }

    fn name(&self) -> &'static str {
        "supabase"
    }
}
