//! `GeoInference` over the chat client.

use async_trait::async_trait;
use geofeed_core::markup::strip_tags;
use geofeed_core::{GeoInference, GeoResult, Result};
use tracing::debug;

use crate::client::ChatClient;
use crate::config::InferenceConfig;
use crate::prompt::{user_message, ResolutionPolicy};
use crate::types::{ChatMessage, ChatRequest, ResponseFormat};

/// One structured-output request per item, no retry.
#[derive(Clone)]
pub struct GeoInferenceAdapter {
    client: ChatClient,
    model: String,
    temperature: f32,
    system_instruction: String,
}

impl GeoInferenceAdapter {
    pub fn new(config: &InferenceConfig) -> Result<Self> {
        Self::with_policy(config, &ResolutionPolicy::default())
    }

    pub fn with_policy(config: &InferenceConfig, policy: &ResolutionPolicy) -> Result<Self> {
        Ok(Self {
            client: ChatClient::new(config)?,
            model: config.model.clone(),
            temperature: config.temperature,
            system_instruction: policy.system_instruction(),
        })
    }

    pub fn client(&self) -> &ChatClient {
        &self.client
    }

    fn request(&self, text: &str) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(self.system_instruction.clone()),
                ChatMessage::user(user_message(text)),
            ],
            response_format: ResponseFormat::json_object(),
            temperature: self.temperature,
        }
    }
}

#[async_trait]
impl GeoInference for GeoInferenceAdapter {
    async fn infer(&self, text: &str) -> Result<GeoResult> {
        let cleaned = strip_tags(text);
        let content = self.client.complete(&self.request(&cleaned)).await?;
        let geo = GeoResult::from_json_object(&content)?;

        debug!(address = %geo.address, lat = geo.lat, lng = geo.lng, "Resolved location");
        Ok(geo)
    }
}
