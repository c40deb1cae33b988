//! Configuration management for the Salon Supply CRM backend
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with SCRM_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// External inventory platform configuration
    pub platform: PlatformConfig,

    /// Replenishment policy configuration
    pub replenishment: ReplenishmentConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

/// Credentials and tuning for the external inventory/ordering platform.
/// Credentials are supplied out-of-band as process configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct PlatformConfig {
    /// Application id issued by the platform
    pub api_id: String,

    /// Application secret issued by the platform
    pub api_key: String,

    /// Per-installation token issued when the integration was enabled
    pub install_token: String,

    /// Authentication endpoint; the serving host for all other calls is
    /// returned by the authentication exchange
    pub auth_url: String,

    /// Timeout applied to every platform request, in seconds
    pub request_timeout_secs: u64,

    /// Freshness window for cached sessions, in minutes. Kept shorter than
    /// the platform's actual token lifetime as a safety margin.
    pub session_ttl_minutes: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReplenishmentConfig {
    /// Safety-stock fraction of mean demand used when a product has no
    /// usable demand-variability estimate
    pub fallback_safety_ratio: f64,
}

impl ReplenishmentConfig {
    pub fn forecast_policy(&self) -> shared::models::ForecastPolicy {
        shared::models::ForecastPolicy {
            fallback_safety_ratio: self.fallback_safety_ratio,
        }
    }
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("SCRM_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("platform.request_timeout_secs", 30)?
            .set_default("platform.session_ttl_minutes", 25)?
            .set_default("replenishment.fallback_safety_ratio", 0.3)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (SCRM_ prefix)
            .add_source(
                Environment::with_prefix("SCRM")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
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
