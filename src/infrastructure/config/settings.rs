//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all settings.
//! Configuration is loaded from a TOML file; secrets come only from the
//! environment (`FLEETWARD_API_TOKEN`, `FLEETWARD_FLEET_TOKEN`).
//!
//! # Example
//!
//! ```no_run
//! use fleetward::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.logging.init();
//!     Ok(())
//! }
//! ```

use std::path::Path;

use serde::Deserialize;

use super::fleet::FleetConfig;
use super::logging::LoggingConfig;
use super::setup::{catalog_from_entries, LifecycleConfig, ModelEntry, SetupConfig};
use super::worker::WorkerConfig;
use crate::domain::ModelSpec;
use crate::error::{ConfigError, Result};

/// Environment variable holding the token callers must present.
pub const API_TOKEN_ENV: &str = "FLEETWARD_API_TOKEN";

/// Environment variable holding the Compute Fleet API bearer token.
pub const FLEET_TOKEN_ENV: &str = "FLEETWARD_FLEET_TOKEN";

/// Main application configuration.
///
/// Load from a TOML file using [`Config::load`] or parse directly with
/// [`Config::parse_toml`].
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Compute Fleet API connection.
    #[serde(default)]
    pub fleet: FleetConfig,

    /// How to reach worker generation servers.
    #[serde(default)]
    pub worker: WorkerConfig,

    /// One-time bootstrap settings.
    #[serde(default)]
    pub setup: SetupConfig,

    /// Lifecycle operation settings.
    #[serde(default)]
    pub lifecycle: LifecycleConfig,

    /// Model catalog. The built-in catalog is used when empty.
    #[serde(default)]
    pub models: Vec<ModelEntry>,

    /// Token callers must present, from `FLEETWARD_API_TOKEN`.
    #[serde(skip)]
    pub api_token: Option<String>,

    #[serde(skip)]
    catalog: Vec<ModelSpec>,
}

fn env_secret(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// Secrets are read from the environment, never from the file.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;

        config.api_token = env_secret(API_TOKEN_ENV);
        config.fleet.token = env_secret(FLEET_TOKEN_ENV);

        config.validate()?;
        config.catalog = catalog_from_entries(&config.models).map_err(|(field, reason)| {
            ConfigError::InvalidValue { field, reason }
        })?;

        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the TOML is malformed or
    /// validation fails.
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// The resolved model catalog.
    #[must_use]
    pub fn catalog(&self) -> &[ModelSpec] {
        &self.catalog
    }

    /// Validate configuration values.
    #[allow(clippy::result_large_err)]
    fn validate(&self) -> Result<()> {
        if self.fleet.api_url.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "fleet.api_url",
            }
            .into());
        }
        if let Err(e) = url::Url::parse(&self.fleet.api_url) {
            return Err(ConfigError::InvalidValue {
                field: "fleet.api_url",
                reason: e.to_string(),
            }
            .into());
        }
        if self.fleet.timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "fleet.timeout_ms",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.fleet.connect_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "fleet.connect_timeout_ms",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.fleet.retry_max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "fleet.retry_max_attempts",
                reason: "must be at least 1".to_string(),
            }
            .into());
        }

        if self.worker.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "worker.port",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.worker.shutdown_timeout_ms == 0 || self.worker.connect_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "worker timeouts",
                reason: "shutdown_timeout_ms and connect_timeout_ms must be greater than 0"
                    .to_string(),
            }
            .into());
        }
        if self.worker.idle_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "worker.idle_timeout_secs",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.worker.stream_buffer == 0 {
            return Err(ConfigError::InvalidValue {
                field: "worker.stream_buffer",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }

        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(ConfigError::InvalidValue {
                field: "logging.format",
                reason: "must be 'pretty' or 'json'".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Quantization;

    #[test]
    fn minimal_config_uses_defaults() {
        let config = Config::parse_toml("[fleet]\napi_url = \"http://fleet.local/v1\"\n").unwrap();
        assert_eq!(config.fleet.timeout_ms, 10_000);
        assert_eq!(config.fleet.retry_max_attempts, 3);
        assert_eq!(config.worker.port, 8080);
        assert!(!config.worker.tls);
        assert!(config.lifecycle.serialize_per_worker);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.catalog().len(), 4);
    }

    #[test]
    fn missing_api_url_is_rejected() {
        let err = Config::parse_toml("[worker]\nport = 9000\n").unwrap_err();
        assert!(err.to_string().contains("fleet.api_url"));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = Config::parse_toml(
            "[fleet]\napi_url = \"http://fleet.local\"\nretry_max_attempts = 0\n",
        )
        .unwrap_err();
        assert!(err.to_string().contains("retry_max_attempts"));

        let err = Config::parse_toml(
            "[fleet]\napi_url = \"http://fleet.local\"\n[logging]\nformat = \"xml\"\n",
        )
        .unwrap_err();
        assert!(err.to_string().contains("logging.format"));
    }

    #[test]
    fn custom_catalog_is_resolved() {
        let config = Config::parse_toml(
            r#"
[fleet]
api_url = "http://fleet.local"

[[models]]
name = "falcon-7b"
quantizations = ["float16", "int4"]

[[models]]
name = "llama-7b"
"#,
        )
        .unwrap();
        let catalog = config.catalog();
        assert_eq!(catalog.len(), 2);
        assert!(!catalog[0].supports(Quantization::Int8));
        assert!(catalog[1].supports(Quantization::Int8));
    }

    #[test]
    fn unknown_quantization_in_catalog_is_rejected() {
        let err = Config::parse_toml(
            "[fleet]\napi_url = \"http://fleet.local\"\n[[models]]\nname = \"x\"\nquantizations = [\"int3\"]\n",
        )
        .unwrap_err();
        assert!(err.to_string().contains("models.quantizations"));
    }
}
