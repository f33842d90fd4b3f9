//! Tracing setup for structured logging.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default directive when neither `RUST_LOG` nor a filter is given.
const DEFAULT_FILTER: &str = "info";

/// Tracing configuration.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Log level filter (e.g. "info", "worker=debug,geo_inference=debug")
    pub filter: String,
    /// Emit one JSON object per line instead of human-readable text
    pub json: bool,
    /// Colourise plain output
    pub ansi: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_FILTER.to_string(),
            json: false,
            ansi: true,
        }
    }
}

impl TracingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    pub fn with_ansi(mut self, ansi: bool) -> Self {
        self.ansi = ansi;
        self
    }

    /// Build from `RUST_LOG`, `LOG_JSON` and `NO_COLOR`.
    pub fn from_env() -> Self {
        let json = std::env::var("LOG_JSON")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_FILTER.to_string());
        let ansi = std::env::var_os("NO_COLOR").is_none();

        Self::new().with_filter(filter).with_json(json).with_ansi(ansi)
    }
}

/// Install the global subscriber.
///
/// Returns `false` when a subscriber was already installed (tests call this
/// more than once per process).
pub fn init_tracing(config: TracingConfig) -> bool {
    let env_filter = EnvFilter::try_new(&config.filter)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let installed = if config.json {
        let fmt_layer = fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
            .is_ok()
    } else {
        let fmt_layer = fmt::layer().with_target(true).with_ansi(config.ansi);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
            .is_ok()
    };

    if installed {
        tracing::info!(filter = %config.filter, json = config.json, "Tracing initialized");
    }
    installed
}

/// Initialize tracing from environment variables.
pub fn init_tracing_from_env() -> bool {
    init_tracing(TracingConfig::from_env())
}
