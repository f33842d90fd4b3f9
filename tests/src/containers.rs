//! Testcontainer setup for ClickHouse.

use clickhouse_client::{health::init_schema, ClickHouseClient, ClickHouseConfig};
use std::time::Duration;
use testcontainers::{
    core::{IntoContainerPort, WaitFor},
    runners::AsyncRunner,
    ContainerAsync, GenericImage, ImageExt,
};

/// A ClickHouse server with the records schema in place.
pub struct ClickHouseContainer {
    #[allow(dead_code)]
    container: Option<ContainerAsync<GenericImage>>,
    pub client: ClickHouseClient,
}

impl ClickHouseContainer {
    /// Start ClickHouse, or reuse `GEOFEED_TEST_CLICKHOUSE_URL` when set.
    pub async fn start() -> Self {
        let (container, url) = match std::env::var("GEOFEED_TEST_CLICKHOUSE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
        {
            Some(url) => (None, url),
            None => {
                let (container, url) = start_clickhouse().await;
                (Some(container), url)
            }
        };

        let config = ClickHouseConfig {
            url,
            database: "geofeed_test".to_string(),
            username: Some("default".to_string()),
            ..ClickHouseConfig::default()
        };
        let client = ClickHouseClient::new(config).expect("Failed to create ClickHouse client");
        init_schema(&client)
            .await
            .expect("Failed to initialize schema");

        Self { container, client }
    }
}

/// Start ClickHouse container, return container and HTTP URL.
pub async fn start_clickhouse() -> (ContainerAsync<GenericImage>, String) {
    let image = GenericImage::new("clickhouse/clickhouse-server", "24.3")
        .with_wait_for(WaitFor::seconds(5))
        .with_exposed_port(8123.tcp())
        .with_env_var("CLICKHOUSE_DEFAULT_ACCESS_MANAGEMENT", "1")
        .with_env_var("CLICKHOUSE_USER", "default")
        .with_env_var("CLICKHOUSE_PASSWORD", "");

    let container = image.start().await.expect("Failed to start ClickHouse");

    let port = container.get_host_port_ipv4(8123).await.unwrap();
    let url = format!("http://127.0.0.1:{}", port);

    wait_for_http(&url, Duration::from_secs(30)).await;

    (container, url)
}

/// Wait for HTTP endpoint to respond.
async fn wait_for_http(url: &str, timeout: Duration) {
    let client = reqwest::Client::new();
    let start = std::time::Instant::now();

    while start.elapsed() < timeout {
        if let Ok(resp) = client.get(url).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        tokio::time::sleep(Duration::from_millis(500)).await;
    }
    panic!("HTTP endpoint {} not ready after {:?}", url, timeout);
}
