use super::models::Config;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("recovery.workers must be at least 1")]
    NoWorkers,

    #[error("Timeout must be positive: {field} = 0")]
    InvalidTimeout { field: String },

    #[error("Invalid control directory '{0}', expected a single path segment")]
    InvalidControlDir(String),

    #[error("Invalid proxy URL '{url}': {reason}")]
    InvalidProxy { url: String, reason: String },

    #[error("transport.max_body_bytes must be positive")]
    InvalidMaxBodyBytes,
}

/// Validate the entire configuration
pub fn validate(config: &Config) -> Result<(), ValidationError> {
    validate_transport(config)?;
    validate_recovery(config)?;
    Ok(())
}

fn validate_transport(config: &Config) -> Result<(), ValidationError> {
    let transport = &config.transport;

    if transport.request_timeout_secs == 0 {
        return Err(ValidationError::InvalidTimeout {
            field: "request_timeout_secs".to_string(),
        });
    }

    if transport.connect_timeout_secs == 0 {
        return Err(ValidationError::InvalidTimeout {
            field: "connect_timeout_secs".to_string(),
        });
    }

    if transport.max_body_bytes.as_u64() == 0 {
        return Err(ValidationError::InvalidMaxBodyBytes);
    }

    if let Some(ref proxy) = transport.proxy {
        validate_proxy(proxy)?;
    }

    Ok(())
}

fn validate_proxy(proxy: &str) -> Result<(), ValidationError> {
    let invalid = |reason: String| ValidationError::InvalidProxy {
        url: proxy.to_string(),
        reason,
    };

    let url = Url::parse(proxy).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" | "socks5" | "socks5h" => Ok(()),
        other => Err(invalid(format!("unsupported scheme '{}'", other))),
    }
}

fn validate_recovery(config: &Config) -> Result<(), ValidationError> {
    let recovery = &config.recovery;

    if recovery.workers == 0 {
        return Err(ValidationError::NoWorkers);
    }

    let dir = recovery.control_dir.as_str();
    if dir.is_empty() || dir.contains('/') || dir.contains('\\') || dir == "." || dir == ".." {
        return Err(ValidationError::InvalidControlDir(dir.to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::humanize::ByteSize;

    #[test]
    fn test_valid_config() {
        let config = Config::default();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_no_workers() {
        let mut config = Config::default();
        config.recovery.workers = 0;

        let result = validate(&config);
        assert!(matches!(result, Err(ValidationError::NoWorkers)));
    }

    #[test]
    fn test_zero_timeout() {
        let mut config = Config::default();
        config.transport.request_timeout_secs = 0;

        let result = validate(&config);
        assert!(matches!(result, Err(ValidationError::InvalidTimeout { .. })));
    }

    #[test]
    fn test_control_dir_with_separator() {
        let mut config = Config::default();
        config.recovery.control_dir = "a/.svn".to_string();

        let result = validate(&config);
        assert!(matches!(result, Err(ValidationError::InvalidControlDir(_))));
    }

    #[test]
    fn test_proxy_schemes() {
        let mut config = Config::default();
        config.transport.proxy = Some("socks5://127.0.0.1:9050".to_string());
        assert!(validate(&config).is_ok());

        config.transport.proxy = Some("ftp://proxy:21".to_string());
        assert!(matches!(
            validate(&config),
            Err(ValidationError::InvalidProxy { .. })
        ));

        config.transport.proxy = Some("no scheme".to_string());
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_body_limit() {
        let mut config = Config::default();
        config.transport.max_body_bytes = ByteSize(0);

        let result = validate(&config);
        assert!(matches!(result, Err(ValidationError::InvalidMaxBodyBytes)));
    }
}
