//! ForwardWithRefreshHandler - generic forwarding with one refresh-and-retry.
//!
//! Flow for one request:
//! 1. Forward with the access cookie as bearer (client header otherwise).
//! 2. On 401 with a refresh cookie, exchange it once.
//! 3. On success, retry exactly once with the new access token and store
//!    the new pair; the retry's response is returned whatever its status.
//!    A retry that never reaches the backend becomes a 502 that still
//!    stores the rotated pair.
//! 4. On refresh failure, return the original 401 and leave cookies alone.

use http::{header, HeaderValue, StatusCode};
use serde_json::json;

use crate::domain::foundation::{GatewayError, StateMachine};
use crate::domain::session::{CookieUpdate, Session, SessionState};
use crate::ports::{UpstreamRequest, UpstreamResponse};

use super::forwarder::{CredentialOverride, Forwarder};
use super::login::SessionResponse;
use super::refresh_session::RefreshSessionHandler;

#[derive(Debug, Clone)]
pub struct ForwardCommand {
    pub request: UpstreamRequest,
    pub session: Session,
}

pub struct ForwardWithRefreshHandler {
    forwarder: Forwarder,
    refresher: RefreshSessionHandler,
}

impl ForwardWithRefreshHandler {
    pub fn new(forwarder: Forwarder, refresher: RefreshSessionHandler) -> Self {
        Self {
            forwarder,
            refresher,
        }
    }

    pub async fn handle(&self, cmd: ForwardCommand) -> Result<SessionResponse, GatewayError> {
        let credential = match &cmd.session.access {
            Some(token) => CredentialOverride::Bearer(token.clone()),
            None => CredentialOverride::Inherit,
        };

        let response = self.forwarder.forward(&cmd.request, credential).await?;

        let refresh = match (&cmd.session.refresh, response.status.as_u16()) {
            (Some(refresh), 401) => refresh,
            _ => {
                return Ok(SessionResponse {
                    response,
                    cookies: CookieUpdate::Keep,
                })
            }
        };

        let state = cmd.session.state().transition_to(SessionState::Refreshing)?;
        tracing::debug!(path = %cmd.request.path_and_query, "Access token rejected, refreshing");

        let Some(pair) = self.refresher.exchange(refresh).await else {
            return Ok(SessionResponse {
                response,
                cookies: CookieUpdate::Keep,
            });
        };

        state.transition_to(SessionState::Authenticated)?;
        // The old refresh token is spent once exchanged, so the new pair
        // must reach the client even when the retry fails.
        let retried = match self
            .forwarder
            .forward(&cmd.request, CredentialOverride::Bearer(pair.access.clone()))
            .await
        {
            Ok(response) => response,
            Err(err) => unavailable_response(&err),
        };

        tracing::info!(
            path = %cmd.request.path_and_query,
            status = retried.status.as_u16(),
            "Retried request after refresh"
        );

        Ok(SessionResponse {
            response: retried,
            cookies: CookieUpdate::Store(pair),
        })
    }
}

/// 502 answer shaped like the gateway's upstream error body.
fn unavailable_response(err: &GatewayError) -> UpstreamResponse {
    let detail = match err {
        GatewayError::UpstreamUnavailable { detail, .. } => detail.clone(),
        other => other.to_string(),
    };
    let body = json!({ "ok": false, "error": err.code().to_string(), "detail": detail });
    let mut response = UpstreamResponse::new(StatusCode::BAD_GATEWAY, body.to_string());
    response.headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::backend::MockBackendClient;
    use crate::domain::session::{BearerToken, TokenPair};
    use crate::ports::UpstreamError;
    use http::Method;
    use serde_json::json;
    use std::sync::Arc;

    const REFRESH: &str = "/api/v1/auth/refresh";
    const PROJECTS: &str = "/api/v1/projects";

    fn handler(backend: &MockBackendClient) -> ForwardWithRefreshHandler {
        let client: Arc<dyn crate::ports::BackendClient> = Arc::new(backend.clone());
        ForwardWithRefreshHandler::new(
            Forwarder::new(client.clone()),
            RefreshSessionHandler::new(client, REFRESH),
        )
    }

    fn command(access: Option<&str>, refresh: Option<&str>) -> ForwardCommand {
        ForwardCommand {
            request: UpstreamRequest::new(Method::GET, PROJECTS),
            session: Session::new(
                access.and_then(BearerToken::new),
                refresh.and_then(BearerToken::new),
            ),
        }
    }

    #[tokio::test]
    async fn access_cookie_becomes_bearer() {
        let backend = MockBackendClient::new();
        backend.respond_json(Method::GET, PROJECTS, 200, json!([]));

        let result = handler(&backend)
            .handle(command(Some("acc"), Some("ref")))
            .await
            .unwrap();

        assert_eq!(result.cookies, CookieUpdate::Keep);
        assert_eq!(backend.calls()[0].authorization(), Some("Bearer acc"));
        assert_eq!(backend.total_calls(), 1);
    }

    #[tokio::test]
    async fn no_cookies_means_single_call_and_401() {
        let backend = MockBackendClient::new();
        backend.respond_json(Method::GET, PROJECTS, 401, json!({"detail": "no auth"}));

        let result = handler(&backend).handle(command(None, None)).await.unwrap();

        assert_eq!(result.response.status.as_u16(), 401);
        assert_eq!(backend.total_calls(), 1);
        assert_eq!(result.cookies, CookieUpdate::Keep);
    }

    #[tokio::test]
    async fn expired_access_refreshes_and_retries_once() {
        let backend = MockBackendClient::new();
        backend.push_response(Method::GET, PROJECTS, 401, json!({"detail": "expired"}));
        backend.respond_json(Method::GET, PROJECTS, 200, json!([{"id": 1}]));
        backend.respond_json(
            Method::POST,
            REFRESH,
            200,
            json!({"access_token": "fresh", "refresh_token": "rotated"}),
        );

        let result = handler(&backend)
            .handle(command(Some("stale"), Some("ref")))
            .await
            .unwrap();

        assert_eq!(result.response.status.as_u16(), 200);
        assert_eq!(backend.call_count(REFRESH), 1);
        let forwards = backend.calls_to(PROJECTS);
        assert_eq!(forwards.len(), 2);
        assert_eq!(forwards[0].authorization(), Some("Bearer stale"));
        assert_eq!(forwards[1].authorization(), Some("Bearer fresh"));
        assert_eq!(
            result.cookies,
            CookieUpdate::Store(TokenPair {
                access: BearerToken::new("fresh").unwrap(),
                refresh: BearerToken::new("rotated"),
            })
        );
    }

    #[tokio::test]
    async fn retry_returning_401_does_not_loop() {
        let backend = MockBackendClient::new();
        backend.respond_json(Method::GET, PROJECTS, 401, json!({"detail": "nope"}));
        backend.respond_json(Method::POST, REFRESH, 200, json!({"access_token": "fresh"}));

        let result = handler(&backend)
            .handle(command(Some("stale"), Some("ref")))
            .await
            .unwrap();

        assert_eq!(result.response.status.as_u16(), 401);
        assert_eq!(backend.call_count(REFRESH), 1);
        assert_eq!(backend.call_count(PROJECTS), 2);
        // Refresh succeeded, so the new pair is still stored.
        assert!(matches!(result.cookies, CookieUpdate::Store(_)));
    }

    #[tokio::test]
    async fn failed_refresh_returns_original_401_and_keeps_cookies() {
        let backend = MockBackendClient::new();
        backend.respond_json(Method::GET, PROJECTS, 401, json!({"detail": "expired"}));
        backend.respond_json(Method::POST, REFRESH, 401, json!({"detail": "revoked"}));

        let result = handler(&backend)
            .handle(command(Some("stale"), Some("ref")))
            .await
            .unwrap();

        assert_eq!(result.response.status.as_u16(), 401);
        assert_eq!(result.response.json().unwrap()["detail"], "expired");
        assert_eq!(result.cookies, CookieUpdate::Keep);
        assert_eq!(backend.call_count(PROJECTS), 1);
    }

    #[tokio::test]
    async fn refresh_only_session_can_recover() {
        let backend = MockBackendClient::new();
        backend.push_response(Method::GET, PROJECTS, 401, json!({}));
        backend.respond_json(Method::GET, PROJECTS, 200, json!([]));
        backend.respond_json(Method::POST, REFRESH, 200, json!({"access_token": "fresh"}));

        let result = handler(&backend)
            .handle(command(None, Some("ref")))
            .await
            .unwrap();

        assert_eq!(result.response.status.as_u16(), 200);
        match result.cookies {
            CookieUpdate::Store(pair) => assert_eq!(pair.refresh, BearerToken::new("ref")),
            other => panic!("expected Store, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn unreachable_retry_still_stores_rotated_pair() {
        let backend = MockBackendClient::new();
        backend.push_response(Method::GET, PROJECTS, 401, json!({"detail": "expired"}));
        backend.push_error(
            Method::GET,
            PROJECTS,
            UpstreamError::Unreachable("connection reset".into()),
        );
        backend.respond_json(
            Method::POST,
            REFRESH,
            200,
            json!({"access_token": "fresh", "refresh_token": "rotated"}),
        );

        let result = handler(&backend)
            .handle(command(Some("stale"), Some("ref")))
            .await
            .unwrap();

        assert_eq!(result.response.status.as_u16(), 502);
        let body = result.response.json().unwrap();
        assert_eq!(body["ok"], false);
        assert_eq!(body["error"], "BACKEND_UNAVAILABLE");
        assert!(body["detail"].as_str().unwrap().contains("connection reset"));
        assert_eq!(backend.call_count(PROJECTS), 2);
        assert_eq!(
            result.cookies,
            CookieUpdate::Store(TokenPair {
                access: BearerToken::new("fresh").unwrap(),
                refresh: BearerToken::new("rotated"),
            })
        );
    }
}
