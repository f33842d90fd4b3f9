//! Feed source configuration.

use geofeed_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Feed client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Full URL of the feed page, including query parameters
    #[serde(default = "default_url")]
    pub url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// User agent sent with each request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_url() -> String {
    "https://zhibo.sina.com.cn/api/zhibo/feed?zhibo_id=152&page_size=60".to_string()
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_user_agent() -> String {
    concat!("geofeed/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl FeedConfig {
    /// Parse and check the configured URL.
    pub fn parsed_url(&self) -> Result<url::Url> {
        let url = url::Url::parse(&self.url)
            .map_err(|e| Error::config(format!("invalid feed url {}: {}", self.url, e)))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(Error::config(format!("unsupported feed url scheme: {other}"))),
        }
    }
}
