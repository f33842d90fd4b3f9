//! Supabase (PostgREST) record store for geofeed.

pub mod config;
pub mod health;
pub mod store;

pub use config::*;
pub use store::*;
