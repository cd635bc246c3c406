use crate::humanize::ByteSize;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub transport: TransportConfig,
    #[serde(default)]
    pub recovery: RecoveryConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Outbound HTTP settings, applied to every request of a run
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TransportConfig {
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    pub proxy: Option<String>,
    /// Skip TLS certificate checks (opt-in, scoped to this run's client)
    #[serde(default)]
    pub accept_invalid_certs: bool,
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: ByteSize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            user_agent: default_user_agent(),
            proxy: None,
            accept_invalid_certs: false,
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    format!("svn-ripper/{}", env!("CARGO_PKG_VERSION"))
}

fn default_max_body_bytes() -> ByteSize {
    ByteSize(50 * 1024 * 1024) // 50 MB
}

/// Where and how recovered files and reports are written
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RecoveryConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// HTML template path; the built-in template is used when unset
    pub template: Option<PathBuf>,
    #[serde(default = "default_control_dir")]
    pub control_dir: String,
    /// Concurrent file recoveries per target
    #[serde(default = "default_workers")]
    pub workers: usize,
    #[serde(default)]
    pub archive: bool,
    /// Give every target its own subdirectory under `output_dir`
    #[serde(default = "default_per_target_dirs")]
    pub per_target_dirs: bool,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            template: None,
            control_dir: default_control_dir(),
            workers: default_workers(),
            archive: false,
            per_target_dirs: default_per_target_dirs(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("recovered")
}

fn default_control_dir() -> String {
    ".svn".to_string()
}

fn default_workers() -> usize {
    8
}

fn default_per_target_dirs() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.transport.request_timeout_secs, 10);
        assert_eq!(config.transport.max_body_bytes.as_u64(), 50 * 1024 * 1024);
        assert!(!config.transport.accept_invalid_certs);
        assert_eq!(config.recovery.output_dir, PathBuf::from("recovered"));
        assert_eq!(config.recovery.control_dir, ".svn");
        assert_eq!(config.recovery.workers, 8);
        assert!(config.recovery.per_target_dirs);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
[transport]
proxy = "socks5://127.0.0.1:9050"

[recovery]
workers = 2
            "#,
        )
        .unwrap();

        assert_eq!(config.transport.proxy.as_deref(), Some("socks5://127.0.0.1:9050"));
        assert_eq!(config.transport.request_timeout_secs, 10);
        assert_eq!(config.recovery.workers, 2);
        assert!(!config.recovery.archive);
    }
}
