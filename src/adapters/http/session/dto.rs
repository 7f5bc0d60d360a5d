//! HTTP DTOs for session endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::session::TokenPair;

/// Optional body of `POST /api/v1/auth/refresh`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RefreshRequest {
    #[serde(default)]
    pub refresh_token: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RefreshResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
}

impl From<&TokenPair> for RefreshResponse {
    fn from(pair: &TokenPair) -> Self {
        Self {
            access_token: pair.access.as_str().to_string(),
            refresh_token: pair.refresh.as_ref().map(|r| r.as_str().to_string()),
        }
    }
}

/// Query of the legacy `GET /auth` bridge.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LegacyAuthQuery {
    pub token: Option<String>,
    pub next: Option<String>,
}
