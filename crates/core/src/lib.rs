//! Core types, error taxonomy, and collaborator traits for the geofeed pipeline.

pub mod error;
pub mod feed;
pub mod geo;
pub mod markup;
pub mod record;
pub mod traits;

pub use error::{Error, Result, Stage};
pub use feed::*;
pub use geo::*;
pub use record::*;
pub use traits::*;
