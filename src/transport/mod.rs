//! Transport layer: the only component that touches the network
//!
//! Every request is a single GET with a timeout. Failures never surface as
//! errors to callers; they are folded into a [`FetchResult`] so the pipeline
//! can record them as data.

mod http;

pub use http::{HttpClient, HttpConfig, TransportError};

use async_trait::async_trait;
use bytes::Bytes;

/// Coarse classification of a finished request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    Success,
    HttpError,
    TransportError,
}

/// Outcome of one GET request
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub status: FetchStatus,
    pub status_code: Option<u16>,
    pub body: Bytes,
}

impl FetchResult {
    pub fn success(status_code: u16, body: Bytes) -> Self {
        Self {
            status: FetchStatus::Success,
            status_code: Some(status_code),
            body,
        }
    }

    pub fn http_error(status_code: u16) -> Self {
        Self {
            status: FetchStatus::HttpError,
            status_code: Some(status_code),
            body: Bytes::new(),
        }
    }

    pub fn transport_error() -> Self {
        Self {
            status: FetchStatus::TransportError,
            status_code: None,
            body: Bytes::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == FetchStatus::Success
    }
}

/// Issues GET requests on behalf of the recovery pipeline
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str) -> FetchResult;
}
