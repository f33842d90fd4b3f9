//! Supabase configuration.

use geofeed_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Supabase project configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupabaseConfig {
    /// Project URL, e.g. `https://abcd.supabase.co`
    #[serde(default)]
    pub url: String,
    /// Service key sent as `apikey` and bearer token
    #[serde(default)]
    pub key: String,
    /// Table holding enriched records
    #[serde(default = "default_table")]
    pub table: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_table() -> String {
    "earth724".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for SupabaseConfig {
    fn default() -> Self {
        Self::new("", "")
    }
}

impl SupabaseConfig {
    pub fn new(url: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            key: key.into(),
            table: default_table(),
            timeout_secs: default_timeout_secs(),
        }
    }

    /// REST endpoint of the records table.
    pub fn table_url(&self) -> Result<url::Url> {
        if self.key.trim().is_empty() {
            return Err(Error::config("supabase key is not set"));
        }
        let base = url::Url::parse(&self.url)
            .map_err(|e| Error::config(format!("invalid supabase url {:?}: {}", self.url, e)))?;
        base.join(&format!("rest/v1/{}", self.table))
            .map_err(|e| Error::config(format!("invalid supabase table {:?}: {}", self.table, e)))
    }
}
