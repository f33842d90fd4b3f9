//! HTTP news feed client for geofeed.

pub mod client;
pub mod config;
pub mod health;

pub use client::*;
pub use config::*;
