//! Geocoding client errors.
//!
//! Every variant collapses to the same fixed popup label upstream; the
//! distinctions exist for logs and tests only.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Geocoding service returned status {0}")]
    Status(u16),

    #[error("Malformed geocoding response: {0}")]
    Malformed(String),

    #[error("Invalid geocoder base URL: {0}")]
    InvalidBaseUrl(String),
}
