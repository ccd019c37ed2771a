//! Configuration management for the Daily Papers client
//!
//! Supports loading configuration from:
//! - Environment variables (prefixed with PAPERS__)
//! - Configuration files (config/default, config/{APP_ENV}, config/local)
//! - Default values

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::{API_PREFIX, DEFAULT_PAGE_SIZE};

/// Main client configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ClientConfig {
    /// Platform API endpoint
    #[serde(default)]
    pub api: ApiConfig,

    /// Listing view configuration
    #[serde(default)]
    pub listing: ListingConfig,

    /// Task polling policy
    #[serde(default)]
    pub polling: PollingConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Scheme and authority of the backend, e.g. http://localhost:8000
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path prefix of the versioned API
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// Per-request timeout in seconds. Unset means requests never time out.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ListingConfig {
    /// Papers requested per listing page
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Papers shown in the overview preview
    #[serde(default = "default_preview_size")]
    pub preview_size: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PollingConfig {
    /// First delay between status checks, in milliseconds
    #[serde(default = "default_initial_interval")]
    pub initial_interval_ms: u64,

    /// Upper bound on the delay, in milliseconds
    #[serde(default = "default_max_interval")]
    pub max_interval_ms: u64,

    /// Growth factor applied after every check
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,

    /// Jitter in [0, 1)
    #[serde(default = "default_randomization")]
    pub randomization_factor: f64,

    /// Stop after this many status checks
    #[serde(default = "default_max_attempts")]
    pub max_attempts: Option<u32>,

    /// Stop once this much time has passed, in seconds
    #[serde(default)]
    pub max_elapsed_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Log level (debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub json_logging: bool,
}

// Default value functions
fn default_base_url() -> String { "http://localhost:8000".to_string() }
fn default_prefix() -> String { API_PREFIX.to_string() }
fn default_page_size() -> u32 { DEFAULT_PAGE_SIZE }
fn default_preview_size() -> u32 { 6 }
fn default_initial_interval() -> u64 { 1_000 }
fn default_max_interval() -> u64 { 30_000 }
fn default_multiplier() -> f64 { 1.5 }
fn default_randomization() -> f64 { 0.2 }
fn default_max_attempts() -> Option<u32> { Some(40) }
fn default_log_level() -> String { "info".to_string() }

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            prefix: default_prefix(),
            request_timeout_secs: None,
        }
    }
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            preview_size: default_preview_size(),
        }
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            initial_interval_ms: default_initial_interval(),
            max_interval_ms: default_max_interval(),
            multiplier: default_multiplier(),
            randomization_factor: default_randomization(),
            max_attempts: default_max_attempts(),
            max_elapsed_secs: None,
        }
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logging: false,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment and files
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let config = Config::builder()
            // Load base config file
            .add_source(File::with_name("config/default").required(false))
            // Load environment-specific config
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            // Load local overrides
            .add_source(File::with_name("config/local").required(false))
            // e.g., PAPERS__API__BASE_URL=http://papers.internal:8000
            .add_source(
                Environment::with_prefix("PAPERS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let loaded: Self = config.try_deserialize()?;
        loaded.validate()?;
        Ok(loaded)
    }

    /// Load from a specific file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name(path))
            .add_source(
                Environment::with_prefix("PAPERS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let loaded: Self = config.try_deserialize()?;
        loaded.validate()?;
        Ok(loaded)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.listing.page_size == 0 {
            return Err(ConfigError::Message("listing.page_size must be at least 1".into()));
        }
        if self.polling.multiplier < 1.0 {
            return Err(ConfigError::Message("polling.multiplier must be >= 1.0".into()));
        }
        if !(0.0..1.0).contains(&self.polling.randomization_factor) {
            return Err(ConfigError::Message(
                "polling.randomization_factor must be in [0, 1)".into(),
            ));
        }
        Ok(())
    }

    /// Full URL of the versioned API root, without a trailing slash
    pub fn api_root(&self) -> String {
        format!(
            "{}/{}",
            self.api.base_url.trim_end_matches('/'),
            self.api.prefix.trim_matches('/')
        )
    }

    /// Get request timeout as Duration, if one is configured
    pub fn request_timeout(&self) -> Option<Duration> {
        self.api.request_timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.listing.page_size, 20);
        assert_eq!(config.listing.preview_size, 6);
        assert_eq!(config.request_timeout(), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_api_root_joins_cleanly() {
        let mut config = ClientConfig::default();
        assert_eq!(config.api_root(), "http://localhost:8000/api/v1");

        config.api.base_url = "https://papers.example.org/".into();
        config.api.prefix = "/api/v1/".into();
        assert_eq!(config.api_root(), "https://papers.example.org/api/v1");
    }

    #[test]
    fn test_invalid_polling_rejected() {
        let mut config = ClientConfig::default();
        config.polling.randomization_factor = 1.5;
        assert!(config.validate().is_err());
    }
}
