//! Minimal chat-completions client.

use geofeed_core::{Error, Result};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::InferenceConfig;
use crate::types::{ChatRequest, ChatResponse};

/// Client for `POST {base}/chat/completions`.
#[derive(Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    endpoint: url::Url,
}

impl ChatClient {
    pub fn new(config: &InferenceConfig) -> Result<Self> {
        let endpoint = config.completions_url()?;

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", config.api_key))
                .map_err(|e| Error::config(format!("inference api key is not a valid header value: {e}")))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| Error::config(format!("failed to build inference HTTP client: {e}")))?;

        Ok(Self { http, endpoint })
    }

    pub fn endpoint(&self) -> &url::Url {
        &self.endpoint
    }

    /// Send one request and return the first choice's message content.
    pub async fn complete(&self, request: &ChatRequest) -> Result<String> {
        debug!(model = %request.model, "Chat completion request");

        let response = self
            .http
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await
            .map_err(|e| Error::inference(format!("inference engine unreachable: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, "Inference engine returned error status");
            return Err(Error::inference(format!(
                "inference engine returned {status}: {body}"
            )));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::malformed_response(format!("undecodable completion: {e}")))?;

        chat.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| Error::malformed_response("completion has no content"))
    }
}
