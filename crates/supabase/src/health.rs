//! Supabase health checks.

use tracing::{debug, error};

use crate::store::SupabaseStore;

/// Check that the records table answers a one-row read.
pub async fn check_connection(store: &SupabaseStore) -> bool {
    match store.probe().await {
        Ok(()) => {
            debug!("Supabase connection healthy");
            true
        }
        Err(e) => {
            error!(table = %store.table_url(), "Supabase health check failed: {}", e);
            false
        }
    }
}
