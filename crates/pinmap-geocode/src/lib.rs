//! Reverse geocoding for pinmap
//!
//! Resolves clicked coordinates to human-readable addresses via a
//! Nominatim-style HTTP endpoint. Free, no API key required.

pub mod client;
pub mod error;

pub use client::GeocodeClient;
pub use error::GeocodeError;
