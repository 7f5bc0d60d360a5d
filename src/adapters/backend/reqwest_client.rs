//! `reqwest` implementation of the backend client.
//!
//! Requests are sent to `{origin}{path_and_query}` with automatic redirect
//! handling disabled, so 3xx answers reach the browser untouched.

use async_trait::async_trait;
use http::{HeaderMap, HeaderName, HeaderValue, StatusCode};

use crate::ports::{BackendClient, UpstreamError, UpstreamRequest, UpstreamResponse};

/// Hop-by-hop response headers dropped before relaying to the client.
const STRIPPED_RESPONSE_HEADERS: [&str; 6] = [
    "connection",
    "keep-alive",
    "transfer-encoding",
    "content-length",
    "proxy-connection",
    "upgrade",
];

/// Backend client over a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestBackendClient {
    origin: String,
    http_client: reqwest::Client,
}

impl ReqwestBackendClient {
    /// Creates a client for `origin` (scheme and host, no trailing slash).
    pub fn new(origin: impl Into<String>) -> Result<Self, UpstreamError> {
        let http_client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| UpstreamError::InvalidRequest(e.to_string()))?;
        Ok(Self {
            origin: origin.into().trim_end_matches('/').to_string(),
            http_client,
        })
    }

    fn url_for(&self, path_and_query: &str) -> String {
        if path_and_query.starts_with('/') {
            format!("{}{}", self.origin, path_and_query)
        } else {
            format!("{}/{}", self.origin, path_and_query)
        }
    }
}

#[async_trait]
impl BackendClient for ReqwestBackendClient {
    async fn send(&self, request: UpstreamRequest) -> Result<UpstreamResponse, UpstreamError> {
        let url = self.url_for(&request.path_and_query);
        let method = reqwest::Method::from_bytes(request.method.as_str().as_bytes())
            .map_err(|e| UpstreamError::InvalidRequest(e.to_string()))?;

        let mut builder = self.http_client.request(method, &url);
        for (name, value) in request.headers.iter() {
            builder = builder.header(name.as_str(), value.as_bytes());
        }
        if !request.body.is_empty() {
            builder = builder.body(request.body.to_vec());
        }

        let response = builder.send().await.map_err(|e| {
            tracing::warn!(error = %e, path = %request.path_and_query, "Backend request failed");
            UpstreamError::Unreachable(e.to_string())
        })?;

        let status = StatusCode::from_u16(response.status().as_u16())
            .map_err(|e| UpstreamError::Unreachable(e.to_string()))?;

        let mut headers = HeaderMap::new();
        for (name, value) in response.headers().iter() {
            if STRIPPED_RESPONSE_HEADERS.contains(&name.as_str()) {
                continue;
            }
            if let (Ok(name), Ok(value)) = (
                HeaderName::from_bytes(name.as_str().as_bytes()),
                HeaderValue::from_bytes(value.as_bytes()),
            ) {
                headers.append(name, value);
            }
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| UpstreamError::Unreachable(e.to_string()))?;

        tracing::debug!(
            method = %request.method,
            path = %request.path_and_query,
            status = status.as_u16(),
            "Backend responded"
        );

        Ok(UpstreamResponse {
            status,
            headers,
            body,
        })
    }
}
