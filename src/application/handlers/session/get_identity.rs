//! GetIdentityHandler - asks the backend who the caller is.

use std::sync::Arc;

use http::{header, HeaderValue, Method, StatusCode};
use serde_json::{json, Value};

use crate::domain::foundation::{ErrorCode, GatewayError};
use crate::domain::session::BearerToken;
use crate::ports::{BackendClient, UpstreamRequest};

#[derive(Debug, Clone, Default)]
pub struct GetIdentityQuery {
    /// Raw `Authorization` header from the client; preferred when present.
    pub authorization: Option<String>,
    pub access_cookie: Option<BearerToken>,
}

/// Backend identity answer, relayed as JSON with the backend's status.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentityResult {
    pub status: StatusCode,
    pub body: Value,
}

pub struct GetIdentityHandler {
    backend: Arc<dyn BackendClient>,
    me_path: String,
}

impl GetIdentityHandler {
    pub fn new(backend: Arc<dyn BackendClient>, me_path: impl Into<String>) -> Self {
        Self {
            backend,
            me_path: me_path.into(),
        }
    }

    pub async fn handle(&self, query: GetIdentityQuery) -> Result<IdentityResult, GatewayError> {
        let bearer = query
            .authorization
            .filter(|h| !h.trim().is_empty())
            .or_else(|| query.access_cookie.map(|t| t.authorization_value()))
            .ok_or_else(|| {
                GatewayError::auth(ErrorCode::NotAuthenticated, "Not authenticated")
            })?;
        let bearer = HeaderValue::from_str(&bearer).map_err(|_| {
            GatewayError::auth(ErrorCode::NotAuthenticated, "Not authenticated")
        })?;

        let request = UpstreamRequest::new(Method::GET, self.me_path.clone())
            .with_header(header::ACCEPT, HeaderValue::from_static("application/json"))
            .with_header(header::AUTHORIZATION, bearer);

        let response = self.backend.send(request).await.map_err(|e| {
            GatewayError::upstream(ErrorCode::BackendUnavailable, None, &e.to_string(), 400)
        })?;

        let body = response
            .json()
            .unwrap_or_else(|| json!({ "detail": response.text() }));

        Ok(IdentityResult {
            status: response.status,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::backend::MockBackendClient;
    use crate::ports::UpstreamResponse;

    const ME: &str = "/api/v1/auth/me";

    fn handler(backend: &MockBackendClient) -> GetIdentityHandler {
        GetIdentityHandler::new(Arc::new(backend.clone()), ME)
    }

    #[tokio::test]
    async fn header_wins_over_cookie() {
        let backend = MockBackendClient::new();
        backend.respond_json(Method::GET, ME, 200, json!({"email": "a@b.nl"}));

        let result = handler(&backend)
            .handle(GetIdentityQuery {
                authorization: Some("Bearer header".into()),
                access_cookie: BearerToken::new("cookie"),
            })
            .await
            .unwrap();

        assert_eq!(result.status, StatusCode::OK);
        assert_eq!(result.body["email"], "a@b.nl");
        assert_eq!(backend.calls()[0].authorization(), Some("Bearer header"));
    }

    #[tokio::test]
    async fn cookie_is_used_without_header() {
        let backend = MockBackendClient::new();
        backend.respond_json(Method::GET, ME, 401, json!({"detail": "expired"}));

        let result = handler(&backend)
            .handle(GetIdentityQuery {
                authorization: None,
                access_cookie: BearerToken::new("cookie"),
            })
            .await
            .unwrap();

        assert_eq!(result.status, StatusCode::UNAUTHORIZED);
        assert_eq!(backend.calls()[0].authorization(), Some("Bearer cookie"));
    }

    #[tokio::test]
    async fn no_credential_is_rejected_locally() {
        let backend = MockBackendClient::new();
        let err = handler(&backend)
            .handle(GetIdentityQuery::default())
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotAuthenticated);
        assert_eq!(backend.total_calls(), 0);
    }

    #[tokio::test]
    async fn non_json_body_is_wrapped_as_detail() {
        let backend = MockBackendClient::new();
        backend.respond(
            Method::GET,
            ME,
            UpstreamResponse::new(StatusCode::BAD_GATEWAY, "upstream exploded"),
        );

        let result = handler(&backend)
            .handle(GetIdentityQuery {
                authorization: Some("Bearer x".into()),
                access_cookie: None,
            })
            .await
            .unwrap();
        assert_eq!(result.body, json!({"detail": "upstream exploded"}));
    }
}
