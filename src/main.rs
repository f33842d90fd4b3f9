//! geofeed: geo-tagging news feed ingestion service.
//!
//! Periodically pulls the latest page of a news feed, keeps the items not yet
//! stored, resolves each one to a location with a chat-completions model, and
//! writes the enriched records in one batch.

mod settings;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info, warn};

use api::{router, AppState};
use clickhouse_client::{ClickHouseClient, ClickHouseStore};
use feed_source::FeedClient;
use geo_inference::GeoInferenceAdapter;
use geofeed_core::RecordStore;
use supabase_client::SupabaseStore;
use telemetry::{health, init_tracing_from_env};
use worker::{Pipeline, PipelineScheduler};

use crate::settings::{load_config, Config, StoreBackend};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_tracing_from_env();

    info!("Starting geofeed v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config()?;
    info!(
        feed = %config.feed.url,
        backend = ?config.store.backend,
        model = %config.inference.model,
        max_concurrency = config.pipeline.max_concurrency,
        interval_secs = config.schedule.interval_secs,
        "Loaded config"
    );

    let feed = Arc::new(FeedClient::new(&config.feed).context("Invalid feed configuration")?);
    let inference = Arc::new(
        GeoInferenceAdapter::new(&config.inference).context("Invalid inference configuration")?,
    );
    let (store, backend) = build_store(&config).await?;

    if feed_source::health::check_connection(&feed).await {
        health().feed.set_healthy();
        info!("Feed connection: healthy");
    } else {
        health().feed.set_unhealthy("Connection failed");
        error!("Feed connection: unhealthy");
    }

    let pipeline = Arc::new(Pipeline::new(feed, store, inference, &config.pipeline));

    let scheduler = PipelineScheduler::new(pipeline.clone(), config.schedule.clone()).start();

    let app = router(AppState::new(pipeline.clone(), backend));

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("Invalid server address")?;

    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shutting down...");
    if let Some(handle) = scheduler {
        handle.shutdown().await;
    }
    // On-demand runs outlive their requests.
    pipeline.wait_idle().await;

    info!("Shutdown complete");
    Ok(())
}

/// Build the configured record store and probe it.
async fn build_store(config: &Config) -> Result<(Arc<dyn RecordStore>, &'static str)> {
    match config.store.backend {
        StoreBackend::Clickhouse => {
            let client = ClickHouseClient::new(config.store.clickhouse.clone())
                .context("Failed to create ClickHouse client")?;

            if config.store.clickhouse.init_schema {
                if let Err(e) = clickhouse_client::health::init_schema(&client).await {
                    error!("Failed to initialize ClickHouse schema: {}", e);
                    // Continue anyway - schema might already exist
                }
            }

            if clickhouse_client::health::check_connection(&client).await {
                health().store.set_healthy();
                info!("ClickHouse connection: healthy");
            } else {
                health().store.set_unhealthy("Connection failed");
                error!("ClickHouse connection: unhealthy");
            }

            let store = ClickHouseStore::new(client);
            let name = store.name();
            Ok((Arc::new(store), name))
        }
        StoreBackend::Supabase => {
            let store = SupabaseStore::new(&config.store.supabase)
                .context("Invalid Supabase configuration")?;

            if supabase_client::health::check_connection(&store).await {
                health().store.set_healthy();
                info!("Supabase connection: healthy");
            } else {
                health().store.set_unhealthy("Connection failed");
                warn!("Supabase connection: unhealthy");
            }

            let name = store.name();
            Ok((Arc::new(store), name))
        }
    }
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install terminate handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        }
        _ = terminate => {
            info!("Received terminate signal");
        }
    }
}
