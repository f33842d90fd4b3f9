//! Geographic inference results.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{Error, Result};

/// Address returned when no location can be resolved.
pub const UNKNOWN_ADDRESS: &str = "未知";

/// Location derived from an item's text.
///
/// Coordinates are WGS84 degrees. The agreed wire shape is exactly
/// `{"address": ..., "lat": ..., "lng": ...}`, so unknown fields are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct GeoResult {
    #[validate(length(min = 1, max = 512))]
    pub address: String,
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub lng: f64,
}

impl GeoResult {
    pub fn new(address: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            address: address.into(),
            lat,
            lng,
        }
    }

    /// The "resolved to nowhere" sentinel.
    pub fn unknown() -> Self {
        Self::new(UNKNOWN_ADDRESS, 0.0, 0.0)
    }

    pub fn is_unknown(&self) -> bool {
        is_unknown_address(&self.address)
    }

    /// Parse the raw JSON object produced by an inference engine.
    ///
    /// Fails with `MalformedResponse` on empty content, surrounding prose or
    /// fencing, missing or extra fields, and out-of-range coordinates. Any
    /// unknown-sentinel address is canonicalised to [`GeoResult::unknown`].
    pub fn from_json_object(content: &str) -> Result<Self> {
        let content = content.trim();
        if content.is_empty() {
            return Err(Error::malformed_response("empty content"));
        }

        let parsed: GeoResult = serde_json::from_str(content)
            .map_err(|e| Error::malformed_response(e.to_string()))?;

        if parsed.is_unknown() {
            return Ok(Self::unknown());
        }

        parsed
            .validate()
            .map_err(|e| Error::malformed_response(e.to_string()))?;

        Ok(parsed)
    }
}

/// Whether an address is one of the "unknown" sentinel spellings.
pub fn is_unknown_address(address: &str) -> bool {
    let address = address.trim();
    address == UNKNOWN_ADDRESS || address.eq_ignore_ascii_case("unknown")
}
