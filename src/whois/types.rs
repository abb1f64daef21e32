//! Whois record and error definitions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Ownership and geolocation metadata for an IP address.
///
/// Mirrors the provider's JSON field names. Missing fields decode to their
/// empty/zero value and unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OwnershipInfo {
    pub status: String,
    pub message: String,
    pub country: String,
    pub country_code: String,
    pub region: String,
    pub region_name: String,
    pub city: String,
    pub zip: String,
    pub lat: f64,
    pub lon: f64,
    pub timezone: String,
    pub isp: String,
    pub org: String,
    /// Autonomous system, e.g. "AS15169 Google LLC".
    #[serde(rename = "as")]
    pub asn: String,
}

impl OwnershipInfo {
    /// Synthetic record returned for private addresses.
    pub fn private_address() -> Self {
        Self {
            status: "success".to_string(),
            message: "Private IP address".to_string(),
            region_name: "Local".to_string(),
            ..Self::default()
        }
    }
}

/// Errors that can occur while resolving an address upstream.
#[derive(Debug, Error)]
pub enum LookupError {
    /// The provider did not answer within the fixed timeout.
    #[error("whois lookup timed out after {0} seconds")]
    Timeout(u64),

    /// Connection or protocol failure.
    #[error("whois transport error: {0}")]
    Transport(String),

    /// The provider answered with a non-success status.
    #[error("whois provider returned HTTP {0}")]
    Status(u16),

    /// The response body was not a whois record.
    #[error("malformed whois response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The address could not be placed into the provider URL.
    #[error("cannot build whois URL: {0}")]
    InvalidUrl(String),
}

/// Result type for whois lookups.
pub type LookupResult<T> = Result<T, LookupError>;
