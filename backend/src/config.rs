//! Configuration management for the farm advisory service
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with ADVISORY_ prefix

use std::time::Duration;

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Weather provider configuration
    pub weather: WeatherConfig,

    /// Translation service configuration
    pub translation: TranslationConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherConfig {
    /// Weather API endpoint
    pub api_endpoint: String,

    /// Weather API key
    pub api_key: String,

    /// ISO country code appended to district lookups
    pub country_code: String,

    /// Upstream request timeout in milliseconds
    pub timeout_ms: u64,

    /// Observation cache time-to-live in seconds (0 disables the cache)
    pub cache_ttl_secs: u64,

    /// Maximum number of districts held in the cache
    pub cache_max_entries: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Translation API endpoint
    pub api_endpoint: String,

    /// Translation API key
    pub api_key: String,

    /// Per-item translation timeout in milliseconds
    pub timeout_ms: u64,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("ADVISORY_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("weather.api_endpoint", "https://api.openweathermap.org/data/2.5")?
            .set_default("weather.api_key", "")?
            .set_default("weather.country_code", "IN")?
            .set_default("weather.timeout_ms", 5000)?
            .set_default("weather.cache_ttl_secs", 600)?
            .set_default("weather.cache_max_entries", 1000)?
            .set_default(
                "translation.api_endpoint",
                "https://translation.googleapis.com/language/translate/v2",
            )?
            .set_default("translation.api_key", "")?
            .set_default("translation.timeout_ms", 5000)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (ADVISORY_ prefix)
            .add_source(
                Environment::with_prefix("ADVISORY")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl WeatherConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Cache lifetime, or `None` when caching is disabled
    pub fn cache_ttl(&self) -> Option<Duration> {
        (self.cache_ttl_secs > 0).then(|| Duration::from_secs(self.cache_ttl_secs))
    }
}

impl TranslationConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}
