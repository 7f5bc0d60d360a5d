//! Conversion between axum requests/responses and the backend port types.

use axum::{
    body::{to_bytes, Body},
    extract::Request,
    response::Response,
};

use crate::domain::foundation::{ErrorCode, GatewayError};
use crate::ports::{UpstreamRequest, UpstreamResponse};

use super::error::GatewayApiError;

/// Largest request body the gateway will buffer for forwarding.
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Buffers an incoming request into an [`UpstreamRequest`] for the same path.
pub async fn upstream_request(request: Request) -> Result<UpstreamRequest, GatewayApiError> {
    let (parts, body) = request.into_parts();
    let body = to_bytes(body, MAX_BODY_BYTES).await.map_err(|e| {
        GatewayError::validation(
            ErrorCode::ValidationFailed,
            format!("request body could not be read: {}", e),
        )
    })?;

    let path_and_query = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| parts.uri.path().to_string());

    let mut upstream = UpstreamRequest::new(parts.method, path_and_query);
    upstream.headers = parts.headers;
    upstream.body = body;
    Ok(upstream)
}

/// Passes a backend response through with its status, headers and body.
pub fn relay(upstream: UpstreamResponse) -> Response {
    let mut response = Response::new(Body::from(upstream.body));
    *response.status_mut() = upstream.status;
    *response.headers_mut() = upstream.headers;
    response
}
