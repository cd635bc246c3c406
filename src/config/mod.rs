//! Configuration management for svn-ripper
//!
//! Settings are layered, lowest to highest priority:
//! 1. Default values (embedded in structs)
//! 2. TOML configuration file
//! 3. Environment variables
//! 4. Command-line flags (applied by the binary)
//!
//! # Environment Variables
//!
//! Any key can be overridden with `SVN_RIPPER__<section>__<key>`:
//! - `SVN_RIPPER__TRANSPORT__PROXY=socks5://127.0.0.1:9050`
//! - `SVN_RIPPER__RECOVERY__WORKERS=16`
//! - `SVN_RIPPER__TRANSPORT__MAX_BODY_BYTES=10MB`
//!
//! # Configuration File
//!
//! By default `svn-ripper.toml` in the working directory is read if present.
//! Override with `--config` or the `SVN_RIPPER_CONFIG` environment variable.

mod models;
mod sources;
mod validation;

pub use crate::humanize::ByteSize;
pub use models::{Config, LoggingConfig, RecoveryConfig, TransportConfig};
pub use validation::ValidationError;

use crate::transport::HttpConfig;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] ValidationError),
}

impl Config {
    /// Load configuration from all sources (file + environment)
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file is malformed or validation fails.
    pub fn load(explicit_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let config = sources::load(explicit_path)?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: PathBuf) -> Result<Self, ConfigError> {
        let config = sources::load_from_sources(path)?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Re-run validation, e.g. after command-line overrides were applied
    pub fn validate(&self) -> Result<(), ConfigError> {
        validation::validate(self)?;
        Ok(())
    }
}

impl TransportConfig {
    pub fn http_config(&self) -> HttpConfig {
        HttpConfig {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            user_agent: self.user_agent.clone(),
            accept_invalid_certs: self.accept_invalid_certs,
            max_body_bytes: self.max_body_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_minimal_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        fs::write(&config_path, "[recovery]\narchive = true\n").unwrap();

        let config = Config::load_from_path(config_path).unwrap();
        assert!(config.recovery.archive);
        assert_eq!(config.recovery.workers, 8);
    }

    #[test]
    fn test_validation_catches_bad_proxy() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        fs::write(&config_path, "[transport]\nproxy = \"gopher://old:70\"\n").unwrap();

        let result = Config::load_from_path(config_path);
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::ValidationError(ValidationError::InvalidProxy { .. })
        ));
    }

    #[test]
    fn test_malformed_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        fs::write(&config_path, "[recovery\nworkers = ").unwrap();

        let result = Config::load_from_path(config_path);
        assert!(matches!(result, Err(ConfigError::LoadError(_))));
    }

    #[test]
    fn test_http_config_mapping() {
        let mut config = Config::default();
        config.transport.request_timeout_secs = 3;
        config.transport.accept_invalid_certs = true;

        let http = config.transport.http_config();
        assert_eq!(http.request_timeout, Duration::from_secs(3));
        assert!(http.accept_invalid_certs);
        assert_eq!(http.max_body_bytes, config.transport.max_body_bytes);
    }
}
