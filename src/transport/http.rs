//! reqwest-backed transport

use super::{FetchResult, Transport};
use crate::humanize::ByteSize;
use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use reqwest::{Client, Proxy};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    #[error("HTTP {0}")]
    Status(u16),

    #[error("Connection timeout")]
    Timeout,

    #[error("Invalid proxy: {0}")]
    InvalidProxy(String),

    #[error("Too many redirects")]
    TooManyRedirects,

    #[error("Response body exceeds {0}")]
    BodyTooLarge(ByteSize),
}

pub type Result<T> = std::result::Result<T, TransportError>;

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub user_agent: String,
    /// Skip TLS certificate verification for this client only
    pub accept_invalid_certs: bool,
    pub max_body_bytes: ByteSize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(10),
            user_agent: format!("svn-ripper/{}", env!("CARGO_PKG_VERSION")),
            accept_invalid_certs: false,
            max_body_bytes: ByteSize(50 * 1024 * 1024),
        }
    }
}

/// Single-attempt HTTP GET client
pub struct HttpClient {
    client: Client,
    config: HttpConfig,
}

impl HttpClient {
    /// Create a new HTTP client, optionally routed through `proxy_url`
    pub fn new(config: HttpConfig, proxy_url: Option<&str>) -> Result<Self> {
        let mut builder = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .user_agent(&config.user_agent)
            .redirect(reqwest::redirect::Policy::limited(10))
            .danger_accept_invalid_certs(config.accept_invalid_certs);

        if let Some(url) = proxy_url {
            let proxy = Proxy::all(url).map_err(|e| TransportError::InvalidProxy(e.to_string()))?;
            builder = builder.proxy(proxy);
        }

        if config.accept_invalid_certs {
            warn!("TLS certificate verification disabled for this client");
        }

        let client = builder
            .build()
            .map_err(|e| TransportError::RequestFailed(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Fetch once; non-2xx statuses come back as `TransportError::Status`
    async fn fetch_once(&self, url: &str) -> Result<(u16, Bytes)> {
        debug!(url, "GET");

        let mut response = self.client.get(url).send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        let limit = self.config.max_body_bytes;
        if response.content_length().is_some_and(|len| len > limit.as_u64()) {
            return Err(TransportError::BodyTooLarge(limit));
        }

        let mut body = BytesMut::new();
        while let Some(chunk) = response.chunk().await.map_err(map_reqwest_error)? {
            if (body.len() + chunk.len()) as u64 > limit.as_u64() {
                return Err(TransportError::BodyTooLarge(limit));
            }
            body.extend_from_slice(&chunk);
        }

        debug!(url, status = status.as_u16(), size = body.len(), "Response received");

        Ok((status.as_u16(), body.freeze()))
    }
}

fn map_reqwest_error(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout
    } else if e.is_redirect() {
        TransportError::TooManyRedirects
    } else {
        TransportError::RequestFailed(e.to_string())
    }
}

#[async_trait]
impl Transport for HttpClient {
    async fn get(&self, url: &str) -> FetchResult {
        match self.fetch_once(url).await {
            Ok((code, body)) => FetchResult::success(code, body),
            Err(TransportError::Status(code)) => {
                debug!(url, status = code, "Non-success status");
                FetchResult::http_error(code)
            }
            Err(e) => {
                warn!(url, error = %e, "Request failed");
                FetchResult::transport_error()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_config_defaults() {
        let config = HttpConfig::default();
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert!(!config.accept_invalid_certs);
        assert!(config.user_agent.starts_with("svn-ripper/"));
    }

    #[test]
    fn test_invalid_proxy_rejected() {
        let result = HttpClient::new(HttpConfig::default(), Some("http://[::1"));
        assert!(matches!(result, Err(TransportError::InvalidProxy(_))));
    }

    #[test]
    fn test_insecure_client_builds() {
        let config = HttpConfig {
            accept_invalid_certs: true,
            ..Default::default()
        };
        assert!(HttpClient::new(config, None).is_ok());
    }
}
