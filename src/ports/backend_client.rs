//! Backend-of-record port.
//!
//! A single raw HTTP exchange with the backend. Everything the gateway does
//! with the backend (forwarding, refresh, confirmation, demo creation) is
//! expressed as an [`UpstreamRequest`], so one implementation and one mock
//! cover all of it.

use async_trait::async_trait;
use bytes::Bytes;
use http::{header, HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
use serde_json::Value;

/// Port for sending requests to the backend origin.
///
/// Implementations must not follow redirects; 3xx responses are returned as-is.
#[async_trait]
pub trait BackendClient: Send + Sync {
    async fn send(&self, request: UpstreamRequest) -> Result<UpstreamResponse, UpstreamError>;
}

/// Request relative to the backend origin.
#[derive(Debug, Clone)]
pub struct UpstreamRequest {
    pub method: Method,
    /// Path plus optional query string, starting with `/`.
    pub path_and_query: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl UpstreamRequest {
    pub fn new(method: Method, path_and_query: impl Into<String>) -> Self {
        Self {
            method,
            path_and_query: path_and_query.into(),
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    /// JSON request with `content-type: application/json`.
    pub fn json(method: Method, path_and_query: impl Into<String>, body: &Value) -> Self {
        let mut request = Self::new(method, path_and_query);
        request.headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        request.body = Bytes::from(body.to_string());
        request
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// Buffered backend response.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl UpstreamResponse {
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Body parsed as JSON, if it is JSON.
    pub fn json(&self) -> Option<Value> {
        serde_json::from_slice(&self.body).ok()
    }

    /// Body as text, replacing invalid UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Errors raised when the backend cannot be reached at all.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UpstreamError {
    /// Connection, DNS or protocol failure.
    #[error("backend unreachable: {0}")]
    Unreachable(String),

    /// The request could not be built (bad path, header or method).
    #[error("invalid backend request: {0}")]
    InvalidRequest(String),
}
