//! Feed page client.
//!
//! The source wraps its item list in an envelope:
//! `{"result": {"status": {"code": 0, "msg": ""}, "data": {"feed": {"list": [...]}}}}`.
//! Only the list is used; everything else in the envelope is ignored.

use async_trait::async_trait;
use geofeed_core::{Error, FeedItem, FeedSource, Result};
use serde::Deserialize;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::config::FeedConfig;

#[derive(Debug, Deserialize)]
struct FeedEnvelope {
    result: FeedResult,
}

#[derive(Debug, Deserialize)]
struct FeedResult {
    #[serde(default)]
    status: Option<FeedStatus>,
    data: FeedData,
}

#[derive(Debug, Deserialize)]
struct FeedStatus {
    code: i64,
    #[serde(default)]
    msg: String,
}

#[derive(Debug, Deserialize)]
struct FeedData {
    feed: FeedList,
}

#[derive(Debug, Deserialize)]
struct FeedList {
    list: Vec<FeedItem>,
}

/// Decode a feed page body into its items.
pub fn parse_feed_page(body: &str) -> Result<Vec<FeedItem>> {
    let envelope: FeedEnvelope =
        serde_json::from_str(body).map_err(|e| Error::malformed_feed(e.to_string()))?;

    if let Some(status) = envelope.result.status {
        if status.code != 0 {
            return Err(Error::fetch(format!(
                "feed reported status {}: {}",
                status.code, status.msg
            )));
        }
    }

    Ok(envelope.result.data.feed.list)
}

/// HTTP client for the news feed.
#[derive(Clone)]
pub struct FeedClient {
    http: reqwest::Client,
    url: url::Url,
}

impl FeedClient {
    /// Creates a new feed client.
    pub fn new(config: &FeedConfig) -> Result<Self> {
        let url = config.parsed_url()?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| Error::config(format!("failed to build feed HTTP client: {e}")))?;

        Ok(Self { http, url })
    }

    pub fn url(&self) -> &url::Url {
        &self.url
    }

    async fn fetch_body(&self) -> Result<String> {
        let response = self
            .http
            .get(self.url.clone())
            .send()
            .await
            .map_err(|e| Error::fetch(format!("feed unreachable: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, "Feed returned error status");
            return Err(Error::fetch(format!("feed returned {status}: {body}")));
        }

        response
            .text()
            .await
            .map_err(|e| Error::fetch(format!("failed to read feed body: {e}")))
    }
}

#[async_trait]
impl FeedSource for FeedClient {
    async fn fetch(&self) -> Result<Vec<FeedItem>> {
        let start = Instant::now();
        let result = self.fetch_body().await.and_then(|body| parse_feed_page(&body));
        let latency_ms = start.elapsed().as_millis() as u64;

        if let Ok(items) = &result {
            debug!(url = %self.url, items = items.len(), latency_ms, "Fetched feed page");
        }
        result
    }
}
