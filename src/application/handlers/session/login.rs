//! LoginHandler - relays credentials and turns the token response into cookies.

use crate::domain::foundation::GatewayError;
use crate::domain::session::{CookieUpdate, TokenPair};
use crate::ports::{UpstreamRequest, UpstreamResponse};

use super::forwarder::{CredentialOverride, Forwarder};

/// Command carrying the client's login request as received.
#[derive(Debug, Clone)]
pub struct LoginCommand {
    pub request: UpstreamRequest,
}

/// Backend response plus the cookie changes to apply to it.
#[derive(Debug, Clone)]
pub struct SessionResponse {
    pub response: UpstreamResponse,
    pub cookies: CookieUpdate,
}

pub struct LoginHandler {
    forwarder: Forwarder,
}

impl LoginHandler {
    pub fn new(forwarder: Forwarder) -> Self {
        Self { forwarder }
    }

    /// Failed logins and token-less replies pass through with no cookies.
    pub async fn handle(&self, cmd: LoginCommand) -> Result<SessionResponse, GatewayError> {
        let response = self
            .forwarder
            .forward(&cmd.request, CredentialOverride::Inherit)
            .await?;

        let tokens = if response.is_success() {
            response.json().as_ref().and_then(TokenPair::from_json)
        } else {
            None
        };

        let cookies = match tokens {
            Some(pair) => {
                tracing::info!(
                    has_refresh = pair.refresh.is_some(),
                    "Login succeeded, issuing session cookies"
                );
                CookieUpdate::Store(pair)
            }
            None => {
                tracing::debug!(status = response.status.as_u16(), "Login passed through");
                CookieUpdate::Keep
            }
        };

        Ok(SessionResponse { response, cookies })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::backend::MockBackendClient;
    use crate::domain::session::BearerToken;
    use http::Method;
    use serde_json::json;
    use std::sync::Arc;

    const LOGIN: &str = "/api/v1/auth/login";

    fn handler(backend: &MockBackendClient) -> LoginHandler {
        LoginHandler::new(Forwarder::new(Arc::new(backend.clone())))
    }

    fn command() -> LoginCommand {
        LoginCommand {
            request: UpstreamRequest::json(
                Method::POST,
                LOGIN,
                &json!({"email": "a@b.nl", "password": "secret"}),
            ),
        }
    }

    #[tokio::test]
    async fn successful_login_stores_both_tokens() {
        let backend = MockBackendClient::new();
        backend.respond_json(
            Method::POST,
            LOGIN,
            200,
            json!({"access_token": "acc", "refresh_token": "ref"}),
        );

        let result = handler(&backend).handle(command()).await.unwrap();

        assert_eq!(
            result.cookies,
            CookieUpdate::Store(TokenPair {
                access: BearerToken::new("acc").unwrap(),
                refresh: BearerToken::new("ref"),
            })
        );
        assert_eq!(backend.calls_to(LOGIN)[0].json().unwrap()["email"], "a@b.nl");
    }

    #[tokio::test]
    async fn legacy_token_alias_is_normalized() {
        let backend = MockBackendClient::new();
        backend.respond_json(Method::POST, LOGIN, 200, json!({"jwt": "legacy"}));

        let result = handler(&backend).handle(command()).await.unwrap();

        match result.cookies {
            CookieUpdate::Store(pair) => {
                assert_eq!(pair.access.as_str(), "legacy");
                assert!(pair.refresh.is_none());
            }
            other => panic!("expected Store, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn rejected_login_passes_through_without_cookies() {
        let backend = MockBackendClient::new();
        backend.respond_json(Method::POST, LOGIN, 401, json!({"detail": "bad credentials"}));

        let result = handler(&backend).handle(command()).await.unwrap();

        assert_eq!(result.response.status.as_u16(), 401);
        assert_eq!(result.cookies, CookieUpdate::Keep);
    }

    #[tokio::test]
    async fn success_without_token_sets_no_cookies() {
        let backend = MockBackendClient::new();
        backend.respond_json(Method::POST, LOGIN, 200, json!({"mfa_required": true}));

        let result = handler(&backend).handle(command()).await.unwrap();

        assert_eq!(result.response.status.as_u16(), 200);
        assert_eq!(result.cookies, CookieUpdate::Keep);
    }
}
