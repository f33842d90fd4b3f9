//! Shared harness for geofeed integration tests.

pub mod containers;
pub mod fixtures;
pub mod setup;
