//! Application configuration.
//!
//! Typed TOML configuration with per-subsystem sections. Every field has a
//! default matching the shipped product tuning, so a missing or partial file
//! still yields a working setup.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::proximity::ProximityConfig;

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Location tracking settings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationSettings {
    /// Prefer high-accuracy fixes (more battery, better precision).
    pub high_accuracy: bool,
    /// Per-fix timeout in milliseconds.
    pub timeout_ms: u64,
    /// Maximum acceptable age of a cached fix in milliseconds.
    pub maximum_age_ms: u64,
    /// Poll-fallback cadence in milliseconds.
    pub poll_interval_ms: u64,
}

impl Default for LocationSettings {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout_ms: 10_000,
            maximum_age_ms: 60_000,
            poll_interval_ms: 10_000,
        }
    }
}

/// Attraction data source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// Search API base URL.
    pub base_url: String,
    /// Optional API key for the data source.
    pub api_key: Option<String>,
    /// Default search radius in meters.
    pub search_radius_meters: f64,
    /// Default record limit per search.
    pub search_limit: usize,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.stb.gov.sg".to_string(),
            api_key: None,
            search_radius_meters: 1000.0,
            search_limit: 20,
        }
    }
}

/// Conversation settings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantSettings {
    /// Bounded history window in turns.
    pub max_history_turns: usize,
    /// How many recommendations context injection mentions.
    pub top_recommendations: usize,
}

impl Default for AssistantSettings {
    fn default() -> Self {
        Self {
            max_history_turns: 20,
            top_recommendations: 5,
        }
    }
}

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub proximity: ProximityConfig,
    pub location: LocationSettings,
    pub catalog: CatalogSettings,
    pub assistant: AssistantSettings,
}

impl AppConfig {
    /// Parse configuration from a TOML string. Missing sections and fields
    /// fall back to defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// Load configuration from a file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    /// Load from the platform config directory, falling back to defaults
    /// when no file exists.
    pub fn load_or_default() -> Self {
        let Some(path) = Self::default_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Failed to load config from {}: {}; using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    /// Platform config file location.
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("io", "wayfarer", "wayfarer")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_product_tuning() {
        let config = AppConfig::default();
        assert_eq!(config.proximity.threshold_meters, 1000.0);
        assert_eq!(config.proximity.cooldown_ms, 300_000);
        assert_eq!(config.proximity.tracking_interval_ms, 10_000);
        assert_eq!(config.location.timeout_ms, 10_000);
        assert_eq!(config.location.maximum_age_ms, 60_000);
        assert_eq!(config.assistant.max_history_turns, 20);
        assert_eq!(config.catalog.base_url, "https://api.stb.gov.sg");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            [proximity]
            threshold_meters = 500.0

            [assistant]
            max_history_turns = 10
            "#,
        )
        .unwrap();

        assert_eq!(config.proximity.threshold_meters, 500.0);
        assert_eq!(config.proximity.cooldown_ms, 300_000);
        assert_eq!(config.assistant.max_history_turns, 10);
        assert_eq!(config.location.poll_interval_ms, 10_000);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        assert!(AppConfig::from_toml_str("proximity = 12").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[catalog]\nsearch_limit = 50").unwrap();

        let config = AppConfig::load_from(file.path()).unwrap();
        assert_eq!(config.catalog.search_limit, 50);
        assert_eq!(config.catalog.search_radius_meters, 1000.0);
    }
}
