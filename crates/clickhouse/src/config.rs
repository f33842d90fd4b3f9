//! ClickHouse configuration.

use geofeed_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// ClickHouse client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClickHouseConfig {
    /// ClickHouse HTTP URL
    #[serde(default = "default_url")]
    pub url: String,
    /// Database name
    #[serde(default = "default_database")]
    pub database: String,
    /// Table holding enriched records
    #[serde(default = "default_table")]
    pub table: String,
    /// Username (optional)
    pub username: Option<String>,
    /// Password (optional)
    pub password: Option<String>,
    /// Create the database and table on startup
    #[serde(default = "default_init_schema")]
    pub init_schema: bool,
}

fn default_url() -> String {
    "http://localhost:8123".to_string()
}

fn default_database() -> String {
    "geofeed".to_string()
}

fn default_table() -> String {
    "earth724".to_string()
}

fn default_init_schema() -> bool {
    true
}

impl Default for ClickHouseConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            database: default_database(),
            table: default_table(),
            username: None,
            password: None,
            init_schema: default_init_schema(),
        }
    }
}

impl ClickHouseConfig {
    /// Fully qualified `database.table` name.
    pub fn qualified_table(&self) -> String {
        format!("{}.{}", self.database, self.table)
    }

    /// Database and table names are spliced into SQL, so only plain
    /// identifiers are accepted.
    pub fn validate(&self) -> Result<()> {
        for (what, name) in [("database", &self.database), ("table", &self.table)] {
            if !is_identifier(name) {
                return Err(Error::config(format!("invalid ClickHouse {what} name: {name:?}")));
            }
        }
        Ok(())
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
