//! ClickHouse client wrapper.

use crate::config::ClickHouseConfig;
use clickhouse::Client;
use geofeed_core::Result;
use tracing::info;

/// ClickHouse client bound to the configured database and table.
#[derive(Clone)]
pub struct ClickHouseClient {
    inner: Client,
    /// Same connection without a default database, for DDL that creates it.
    server: Client,
    config: ClickHouseConfig,
}

impl ClickHouseClient {
    /// Creates a new ClickHouse client.
    pub fn new(config: ClickHouseConfig) -> Result<Self> {
        config.validate()?;

        let mut server = Client::default().with_url(&config.url);

        if let Some(ref user) = config.username {
            server = server.with_user(user);
        }

        if let Some(ref pass) = config.password {
            server = server.with_password(pass);
        }

        let client = server.clone().with_database(&config.database);

        info!(
            url = %config.url,
            table = %config.qualified_table(),
            "Created ClickHouse client"
        );

        Ok(Self {
            inner: client,
            server,
            config,
        })
    }

    /// Returns the inner clickhouse client.
    pub fn inner(&self) -> &Client {
        &self.inner
    }

    /// Returns a client with no default database selected.
    pub fn server(&self) -> &Client {
        &self.server
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ClickHouseConfig {
        &self.config
    }

    pub fn qualified_table(&self) -> String {
        self.config.qualified_table()
    }
}
