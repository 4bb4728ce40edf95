pub mod config;
pub mod controller;
pub mod error;
pub mod marker;
pub mod store;

pub use config::{Config, GeocoderConfig, MapConfig, ValidationResult};
pub use controller::{MarkerController, MarkerEvent, ResolveFailure};
pub use error::{AppError, ConfigError};
pub use marker::{AddressState, Coordinate, Marker, MarkerId, FAILED_LABEL, RESOLVING_LABEL};
pub use store::MarkerStore;

use anyhow::Result;

/// Initialize the core application
pub fn init() -> Result<()> {
    // Initialize tracing/logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Pinmap core initialized");
    Ok(())
}
