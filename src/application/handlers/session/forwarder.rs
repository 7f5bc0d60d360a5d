//! Forwarder - relays arbitrary requests to the backend.

use std::sync::Arc;

use http::{header, HeaderName, HeaderValue, Method};

use crate::domain::foundation::{ErrorCode, GatewayError};
use crate::domain::session::BearerToken;
use crate::ports::{BackendClient, UpstreamRequest, UpstreamResponse};

/// Request headers dropped before relaying.
pub const STRIPPED_HEADERS: [HeaderName; 3] =
    [header::HOST, header::CONNECTION, header::CONTENT_LENGTH];

/// Longest backend body echoed in a 502 detail.
const DETAIL_MAX_CHARS: usize = 400;

/// How the `Authorization` header of a forwarded request is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialOverride {
    /// Keep whatever the client sent.
    Inherit,
    /// Replace it with this bearer token.
    Bearer(BearerToken),
    /// Remove it.
    Remove,
}

/// Relays requests to the backend with one credential policy per call.
#[derive(Clone)]
pub struct Forwarder {
    backend: Arc<dyn BackendClient>,
}

impl Forwarder {
    pub fn new(backend: Arc<dyn BackendClient>) -> Self {
        Self { backend }
    }

    /// Builds the request actually sent upstream.
    pub fn prepare(request: &UpstreamRequest, credential: &CredentialOverride) -> UpstreamRequest {
        let mut prepared = request.clone();
        for name in STRIPPED_HEADERS.iter() {
            prepared.headers.remove(name);
        }

        match credential {
            CredentialOverride::Inherit => {}
            CredentialOverride::Remove => {
                prepared.headers.remove(header::AUTHORIZATION);
            }
            CredentialOverride::Bearer(token) => {
                match HeaderValue::from_str(&token.authorization_value()) {
                    Ok(value) => {
                        prepared.headers.insert(header::AUTHORIZATION, value);
                    }
                    // A token that cannot be a header value is no credential at all.
                    Err(_) => {
                        prepared.headers.remove(header::AUTHORIZATION);
                    }
                }
            }
        }

        if prepared.method == Method::GET || prepared.method == Method::HEAD {
            prepared.body = bytes::Bytes::new();
        }
        prepared
    }

    /// Forwards `request`, passing any upstream status through verbatim.
    ///
    /// Only a transport failure is an error.
    pub async fn forward(
        &self,
        request: &UpstreamRequest,
        credential: CredentialOverride,
    ) -> Result<UpstreamResponse, GatewayError> {
        let prepared = Self::prepare(request, &credential);
        self.backend.send(prepared).await.map_err(|e| {
            tracing::warn!(
                error = %e,
                method = %request.method,
                path = %request.path_and_query,
                "Forward to backend failed"
            );
            GatewayError::upstream(
                ErrorCode::BackendUnavailable,
                None,
                &e.to_string(),
                DETAIL_MAX_CHARS,
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::backend::MockBackendClient;
    use crate::ports::UpstreamError;
    use bytes::Bytes;

    fn inbound(method: Method) -> UpstreamRequest {
        let mut request = UpstreamRequest::new(method, "/api/v1/projects?page=1");
        request.body = Bytes::from_static(b"{\"a\":1}");
        request.headers.insert(header::HOST, HeaderValue::from_static("shop.example"));
        request.headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
        request.headers.insert(header::CONTENT_LENGTH, HeaderValue::from_static("7"));
        request
            .headers
            .insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer client"));
        request
            .headers
            .insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        request
    }

    #[test]
    fn strips_hop_headers_and_keeps_others() {
        let prepared = Forwarder::prepare(&inbound(Method::POST), &CredentialOverride::Inherit);
        assert!(prepared.headers.get(header::HOST).is_none());
        assert!(prepared.headers.get(header::CONNECTION).is_none());
        assert!(prepared.headers.get(header::CONTENT_LENGTH).is_none());
        assert_eq!(prepared.headers.get(header::ACCEPT).unwrap(), "application/json");
        assert_eq!(prepared.headers.get(header::AUTHORIZATION).unwrap(), "Bearer client");
        assert_eq!(&prepared.body[..], b"{\"a\":1}");
    }

    #[test]
    fn bearer_override_replaces_authorization() {
        let token = BearerToken::new("cookie-token").unwrap();
        let prepared =
            Forwarder::prepare(&inbound(Method::POST), &CredentialOverride::Bearer(token));
        assert_eq!(
            prepared.headers.get(header::AUTHORIZATION).unwrap(),
            "Bearer cookie-token"
        );
    }

    #[test]
    fn remove_override_drops_authorization() {
        let prepared = Forwarder::prepare(&inbound(Method::POST), &CredentialOverride::Remove);
        assert!(prepared.headers.get(header::AUTHORIZATION).is_none());
    }

    #[test]
    fn get_and_head_carry_no_body() {
        for method in [Method::GET, Method::HEAD] {
            let prepared = Forwarder::prepare(&inbound(method), &CredentialOverride::Inherit);
            assert!(prepared.body.is_empty());
        }
        let delete = Forwarder::prepare(&inbound(Method::DELETE), &CredentialOverride::Inherit);
        assert!(!delete.body.is_empty());
    }

    #[tokio::test]
    async fn transport_failure_is_backend_unavailable() {
        let backend = MockBackendClient::new();
        backend.set_error(UpstreamError::Unreachable("connection refused".into()));
        let forwarder = Forwarder::new(Arc::new(backend));

        let err = forwarder
            .forward(&inbound(Method::GET), CredentialOverride::Inherit)
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::BackendUnavailable);
    }
}
