//! Service configuration.

use anyhow::{Context, Result};
use clickhouse_client::ClickHouseConfig;
use feed_source::FeedConfig;
use geo_inference::InferenceConfig;
use serde::{Deserialize, Serialize};
use supabase_client::SupabaseConfig;
use worker::{PipelineConfig, ScheduleConfig};

/// Which record store backs the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Clickhouse,
    Supabase,
}

impl std::str::FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clickhouse" => Ok(Self::Clickhouse),
            "supabase" => Ok(Self::Supabase),
            other => anyhow::bail!("unknown store backend: {other}"),
        }
    }
}

/// Store selection plus per-backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_backend")]
    pub backend: StoreBackend,
    #[serde(default)]
    pub clickhouse: ClickHouseConfig,
    #[serde(default)]
    pub supabase: SupabaseConfig,
}

fn default_backend() -> StoreBackend {
    StoreBackend::Clickhouse
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            clickhouse: ClickHouseConfig::default(),
            supabase: SupabaseConfig::default(),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub feed: FeedConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub inference: InferenceConfig,

    #[serde(default)]
    pub pipeline: PipelineConfig,

    #[serde(default)]
    pub schedule: ScheduleConfig,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            feed: FeedConfig::default(),
            store: StoreConfig::default(),
            inference: InferenceConfig::default(),
            pipeline: PipelineConfig::default(),
            schedule: ScheduleConfig::default(),
        }
    }
}

/// Load configuration from defaults, `config/default.toml`, and environment.
pub fn load_config() -> Result<Config> {
    let config = config::Config::builder()
        .add_source(config::Config::try_from(&Config::default())?)
        .add_source(
            config::File::with_name("config/default")
                .required(false)
                .format(config::FileFormat::Toml),
        )
        .add_source(
            config::Environment::default()
                .separator("__")
                .prefix("GEOFEED")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build configuration")?;

    let config: Config = config
        .try_deserialize()
        .context("Failed to deserialize configuration")?;

    apply_overrides(config, |key| std::env::var(key).ok())
}

/// Flat variables for the common settings.
///
/// The config crate's nested parsing doesn't work reliably with underscored
/// field names, and the credentials have conventional names of their own.
pub fn apply_overrides(
    mut config: Config,
    var: impl Fn(&str) -> Option<String>,
) -> Result<Config> {
    if let Some(url) = var("GEOFEED_FEED_URL") {
        config.feed.url = url;
    }
    if let Some(backend) = var("GEOFEED_STORE_BACKEND") {
        config.store.backend = backend.parse()?;
    }

    if let Some(url) = var("GEOFEED_CLICKHOUSE_URL") {
        config.store.clickhouse.url = url;
    }
    if let Some(database) = var("GEOFEED_CLICKHOUSE_DATABASE") {
        config.store.clickhouse.database = database;
    }
    if let Some(username) = var("GEOFEED_CLICKHOUSE_USERNAME") {
        config.store.clickhouse.username = Some(username);
    }
    if let Some(password) = var("GEOFEED_CLICKHOUSE_PASSWORD") {
        config.store.clickhouse.password = Some(password);
    }

    if let Some(url) = var("SUPABASE_URL") {
        config.store.supabase.url = url;
    }
    if let Some(key) = var("SUPABASE_KEY").or_else(|| var("SUPABASE_Secret_key")) {
        config.store.supabase.key = key;
    }

    if let Some(key) = var("GEMINI_API_KEY") {
        config.inference.api_key = key;
    }
    if let Some(url) = var("GEOFEED_INFERENCE_BASE_URL") {
        config.inference.base_url = url;
    }
    if let Some(model) = var("GEOFEED_INFERENCE_MODEL") {
        config.inference.model = model;
    }

    if let Some(n) = var("GEOFEED_MAX_CONCURRENCY") {
        config.pipeline.max_concurrency = n
            .parse()
            .with_context(|| format!("GEOFEED_MAX_CONCURRENCY is not a number: {n}"))?;
    }
    if let Some(secs) = var("GEOFEED_SCHEDULE_INTERVAL_SECS") {
        config.schedule.interval_secs = secs
            .parse()
            .with_context(|| format!("GEOFEED_SCHEDULE_INTERVAL_SECS is not a number: {secs}"))?;
    }

    Ok(config)
}
