//! ClickHouse table schema for enriched records.
//!
//! Uniqueness of `id` is not a table constraint; the pipeline's dedup query
//! is what keeps one row per feed item.

/// SQL for creating the database.
pub fn create_database(database: &str) -> String {
    format!("CREATE DATABASE IF NOT EXISTS {database}")
}

/// SQL for creating the records table.
pub fn create_records_table(database: &str, table: &str) -> String {
    format!(
        r#"
CREATE TABLE IF NOT EXISTS {database}.{table} (
    id Int64,
    rich_text String,
    create_time String,
    address String,
    latitude Float64,
    longitude Float64,
    ingested_at DateTime DEFAULT now()
)
ENGINE = MergeTree()
ORDER BY id
"#
    )
}

/// All DDL statements in execution order.
pub fn all_statements(database: &str, table: &str) -> Vec<String> {
    vec![create_database(database), create_records_table(database, table)]
}
