//! Reverse geocoding: convert coordinates to a human-readable address.
//! Uses a Nominatim-style endpoint - free, no API key required.

use std::time::Duration;

use pinmap_core::{Coordinate, GeocoderConfig};
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::error::GeocodeError;

const USER_AGENT: &str = concat!("pinmap/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    display_name: Option<String>,
}

/// Client for the reverse-geocoding HTTP endpoint.
///
/// One outbound GET per call, exactly one attempt; no retry, no backoff and
/// no caching of repeated coordinates.
#[derive(Debug, Clone)]
pub struct GeocodeClient {
    http: Client,
    base_url: Url,
}

impl GeocodeClient {
    /// Build a client against the Nominatim-style endpoint at `base_url`.
    ///
    /// A zero timeout leaves the transport without a deadline; a request
    /// that never settles then stays pending forever.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, GeocodeError> {
        let base_url =
            Url::parse(base_url).map_err(|e| GeocodeError::InvalidBaseUrl(e.to_string()))?;

        let mut builder = Client::builder().user_agent(USER_AGENT);
        if !timeout.is_zero() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base_url,
        })
    }

    /// Build a client from the geocoder configuration section.
    pub fn from_config(config: &GeocoderConfig) -> Result<Self, GeocodeError> {
        Self::new(&config.base_url, Duration::from_secs(config.timeout_secs))
    }

    /// Resolve a coordinate to the service's display name for it.
    ///
    /// Fails on transport errors, non-success status, or a response body
    /// without a usable `display_name` string.
    pub async fn reverse(&self, position: Coordinate) -> Result<String, GeocodeError> {
        let url = self
            .base_url
            .join("reverse")
            .map_err(|e| GeocodeError::InvalidBaseUrl(e.to_string()))?;

        let response = self
            .http
            .get(url)
            .query(&[
                ("format", "json".to_string()),
                ("lat", position.lat.to_string()),
                ("lon", position.lon.to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!("Reverse geocode returned status {}", status);
            return Err(GeocodeError::Status(status.as_u16()));
        }

        let body: ReverseResponse = response
            .json()
            .await
            .map_err(|e| GeocodeError::Malformed(e.to_string()))?;

        match body.display_name {
            Some(name) if !name.is_empty() => {
                tracing::debug!("Reverse geocoded {} to {}", position, name);
                Ok(name)
            }
            _ => Err(GeocodeError::Malformed("missing display_name".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unparseable_base_url() {
        let result = GeocodeClient::new("not a url", Duration::from_secs(1));
        assert!(matches!(result, Err(GeocodeError::InvalidBaseUrl(_))));
    }

    #[test]
    fn accepts_base_url_with_path() {
        assert!(
            GeocodeClient::new("https://geo.example.com/nominatim/", Duration::from_secs(1))
                .is_ok()
        );
    }

    #[test]
    fn zero_timeout_builds_a_client() {
        assert!(GeocodeClient::new("https://nominatim.openstreetmap.org", Duration::ZERO).is_ok());
    }
}
