//! Geographic inference over an OpenAI-compatible chat-completions endpoint.

pub mod adapter;
pub mod client;
pub mod config;
pub mod prompt;
pub mod types;

pub use adapter::GeoInferenceAdapter;
pub use client::ChatClient;
pub use config::InferenceConfig;
pub use prompt::{FallbackTier, LocationPriority, ResolutionPolicy};
