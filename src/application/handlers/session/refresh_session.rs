//! RefreshSessionHandler - exchanges a refresh token for a new token pair.

use std::sync::Arc;

use http::Method;
use serde_json::json;

use crate::domain::foundation::{ErrorCode, GatewayError};
use crate::domain::session::{BearerToken, TokenPair};
use crate::ports::{BackendClient, UpstreamRequest};

/// Explicit refresh requested by the client.
#[derive(Debug, Clone, Default)]
pub struct RefreshSessionCommand {
    /// `refresh_token` from the request body; wins over the cookie.
    pub body_token: Option<BearerToken>,
    pub cookie_token: Option<BearerToken>,
}

#[derive(Clone)]
pub struct RefreshSessionHandler {
    backend: Arc<dyn BackendClient>,
    refresh_path: String,
}

impl RefreshSessionHandler {
    pub fn new(backend: Arc<dyn BackendClient>, refresh_path: impl Into<String>) -> Self {
        Self {
            backend,
            refresh_path: refresh_path.into(),
        }
    }

    pub async fn handle(&self, cmd: RefreshSessionCommand) -> Result<TokenPair, GatewayError> {
        let token = cmd
            .body_token
            .or(cmd.cookie_token)
            .ok_or_else(|| GatewayError::auth(ErrorCode::NoRefreshToken, "No refresh token"))?;

        self.exchange(&token)
            .await
            .ok_or_else(|| GatewayError::auth(ErrorCode::RefreshFailed, "Token refresh failed"))
    }

    /// One refresh call. `None` on any failure; the caller decides what that means.
    ///
    /// When the backend does not rotate the refresh token, `refresh` is kept.
    pub async fn exchange(&self, refresh: &BearerToken) -> Option<TokenPair> {
        let request = UpstreamRequest::json(
            Method::POST,
            self.refresh_path.clone(),
            &json!({ "refresh_token": refresh.as_str() }),
        );

        let response = match self.backend.send(request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "Refresh call failed");
                return None;
            }
        };

        if !response.is_success() {
            tracing::info!(status = response.status.as_u16(), "Refresh rejected by backend");
            return None;
        }

        let pair = response.json().as_ref().and_then(TokenPair::from_json);
        if pair.is_none() {
            tracing::warn!("Refresh response carried no access token");
        }
        pair.map(|p| p.or_refresh(refresh))
    }
}
