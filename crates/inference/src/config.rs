//! Inference engine configuration.

use geofeed_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Chat-completions endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceConfig {
    /// Base URL of the OpenAI-compatible API; `chat/completions` is joined onto it
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta/openai/".to_string()
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_temperature() -> f32 {
    1.0
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            model: default_model(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl InferenceConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Resolve the chat-completions endpoint.
    ///
    /// The base is treated as a directory, so a missing trailing slash does
    /// not drop its last path segment.
    pub fn completions_url(&self) -> Result<url::Url> {
        if self.api_key.trim().is_empty() {
            return Err(Error::config("inference api key is not set"));
        }

        let mut base = self.base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }

        let base = url::Url::parse(&base)
            .map_err(|e| Error::config(format!("invalid inference base url {}: {}", self.base_url, e)))?;
        match base.scheme() {
            "http" | "https" => {}
            other => {
                return Err(Error::config(format!(
                    "unsupported inference url scheme: {other}"
                )))
            }
        }

        base.join("chat/completions")
            .map_err(|e| Error::config(format!("invalid inference endpoint: {e}")))
    }
}
