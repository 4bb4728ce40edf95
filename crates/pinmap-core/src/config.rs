use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::ConfigError;
use crate::marker::Coordinate;

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Add an error
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Add a warning
    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Map widget settings
    #[serde(default)]
    pub map: MapConfig,

    /// Reverse-geocoding settings
    #[serde(default)]
    pub geocoder: GeocoderConfig,
}

/// Configuration handed to the embedding map widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapConfig {
    /// Initial map center, latitude in decimal degrees
    #[serde(default = "default_center_lat")]
    pub center_lat: f64,

    /// Initial map center, longitude in decimal degrees
    #[serde(default = "default_center_lon")]
    pub center_lon: f64,

    /// Initial zoom level
    #[serde(default = "default_zoom")]
    pub zoom: u8,

    /// Zoom with the scroll wheel
    #[serde(default = "default_scroll_wheel_zoom")]
    pub scroll_wheel_zoom: bool,

    /// Raster tile source URL template ({s} subdomain is optional)
    #[serde(default = "default_tile_url_template")]
    pub tile_url_template: String,

    /// Attribution text shown on the map
    #[serde(default = "default_attribution")]
    pub attribution: String,
}

impl MapConfig {
    pub fn center(&self) -> Coordinate {
        Coordinate::new(self.center_lat, self.center_lon)
    }
}

fn default_center_lat() -> f64 {
    35.6586
}

fn default_center_lon() -> f64 {
    139.7454
}

fn default_zoom() -> u8 {
    13
}

fn default_scroll_wheel_zoom() -> bool {
    true
}

fn default_tile_url_template() -> String {
    "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string()
}

fn default_attribution() -> String {
    "© OpenStreetMap contributors".to_string()
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center_lat: default_center_lat(),
            center_lon: default_center_lon(),
            zoom: default_zoom(),
            scroll_wheel_zoom: default_scroll_wheel_zoom(),
            tile_url_template: default_tile_url_template(),
            attribution: default_attribution(),
        }
    }
}

/// Reverse-geocoding service settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocoderConfig {
    /// Base URL of the Nominatim-style endpoint
    #[serde(default = "default_geocoder_base_url")]
    pub base_url: String,

    /// Request timeout in seconds; 0 disables the timeout and leaves a
    /// never-settling request pending forever
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_geocoder_base_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: default_geocoder_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Config {
    /// Load configuration from the default location, creating the default
    /// file if it doesn't exist
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from an explicit path, creating a default file
    /// there if none exists
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            let config = Self::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load configuration and validate it
    ///
    /// Returns an error if validation fails; warnings are logged.
    pub fn load_validated() -> Result<(Self, ValidationResult), ConfigError> {
        let config = Self::load()?;
        let validation = config.validate();

        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()));
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    /// Validate the configuration
    ///
    /// Returns a ValidationResult containing any errors or warnings.
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        if !(-90.0..=90.0).contains(&self.map.center_lat) {
            result.add_error("map.center_lat", "Latitude must be between -90 and 90");
        }
        if !(-180.0..=180.0).contains(&self.map.center_lon) {
            result.add_error("map.center_lon", "Longitude must be between -180 and 180");
        }

        if self.map.zoom > 19 {
            result.add_warning("map.zoom", "Zoom level is unusually deep for raster tiles (>19)");
        }

        for placeholder in ["{z}", "{x}", "{y}"] {
            if !self.map.tile_url_template.contains(placeholder) {
                result.add_error(
                    "map.tile_url_template",
                    format!("Template is missing the {} placeholder", placeholder),
                );
            }
        }

        if self.map.attribution.trim().is_empty() {
            result.add_warning("map.attribution", "Tile attribution is empty");
        }

        self.validate_url(&self.geocoder.base_url, "geocoder.base_url", &mut result);

        if self.geocoder.timeout_secs == 0 {
            result.add_warning(
                "geocoder.timeout_secs",
                "Request timeout disabled (0 seconds); a hung request never settles",
            );
        }

        result
    }

    /// Validate a URL field
    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Save configuration to an explicit path
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))?;
        std::fs::write(path, contents)?;

        Ok(())
    }

    /// Get the path to the configuration file
    fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir()
            .ok_or(ConfigError::NoConfigDir)?
            .join("pinmap");

        Ok(config_dir.join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_default_config() {
        let config = Config::default();
        let result = config.validate();
        assert!(result.is_valid(), "Default config should be valid: {:?}", result.errors);
    }

    #[test]
    fn test_default_center_matches_start_position() {
        let config = Config::default();
        assert_eq!(config.map.center(), Coordinate::new(35.6586, 139.7454));
        assert_eq!(config.map.zoom, 13);
        assert!(config.map.scroll_wheel_zoom);
    }

    #[test]
    fn test_out_of_range_center_is_an_error() {
        let mut config = Config::default();
        config.map.center_lat = 120.0;
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "map.center_lat"));
    }

    #[test]
    fn test_tile_template_must_carry_placeholders() {
        let mut config = Config::default();
        config.map.tile_url_template = "https://tiles.example.com/static.png".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "map.tile_url_template"));
    }

    #[test]
    fn test_invalid_geocoder_url() {
        let mut config = Config::default();
        config.geocoder.base_url = "not-a-url".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "geocoder.base_url"));
    }

    #[test]
    fn test_invalid_geocoder_url_scheme() {
        let mut config = Config::default();
        config.geocoder.base_url = "ftp://nominatim.openstreetmap.org".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.message.contains("http or https")));
    }

    #[test]
    fn test_zero_timeout_is_a_warning() {
        let mut config = Config::default();
        config.geocoder.timeout_secs = 0;
        let result = config.validate();
        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|w| w.field == "geocoder.timeout_secs"));
    }

    #[test]
    fn test_load_from_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pinmap").join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config, Config::default());
        assert!(path.exists());
    }

    #[test]
    fn test_save_and_reload_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.map.zoom = 7;
        config.geocoder.timeout_secs = 3;
        config.save_to(&path).unwrap();

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded, config);
    }

    #[test]
    fn test_partial_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[map]\nzoom = 5\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.map.zoom, 5);
        assert_eq!(config.map.center_lat, 35.6586);
        assert_eq!(config.geocoder, GeocoderConfig::default());
    }

    #[test]
    fn test_malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "map = zoom =").unwrap();

        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_validation_result_error_summary() {
        let mut result = ValidationResult::default();
        result.add_error("field1", "error1");
        result.add_error("field2", "error2");
        let summary = result.error_summary();
        assert!(summary.contains("field1"));
        assert!(summary.contains("field2"));
    }
}
