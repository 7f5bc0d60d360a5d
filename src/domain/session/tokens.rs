//! Bearer tokens and normalization of backend token responses.

use std::fmt;

use serde_json::Value;

/// Field names accepted for the access token, in priority order.
pub const ACCESS_TOKEN_FIELDS: [&str; 3] = ["access_token", "token", "jwt"];

/// Field name carrying the refresh token.
pub const REFRESH_TOKEN_FIELD: &str = "refresh_token";

/// Opaque bearer credential. Never printed in full.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    /// Wraps a token, rejecting blank values.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == value.len() {
            Some(Self(value))
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Value for an `Authorization` header.
    pub fn authorization_value(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BearerToken(<{} chars>)", self.0.len())
    }
}

/// Tokens extracted from a login or refresh response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access: BearerToken,
    pub refresh: Option<BearerToken>,
}

impl TokenPair {
    /// Normalizes a backend token response.
    ///
    /// The access token is the first non-empty string among
    /// [`ACCESS_TOKEN_FIELDS`]. Returns `None` when no field carries one.
    pub fn from_json(body: &Value) -> Option<Self> {
        let access = ACCESS_TOKEN_FIELDS
            .iter()
            .find_map(|field| string_field(body, field))?;
        let refresh = string_field(body, REFRESH_TOKEN_FIELD);
        Some(Self { access, refresh })
    }

    /// Keeps `previous` as the refresh token when the backend did not rotate it.
    pub fn or_refresh(mut self, previous: &BearerToken) -> Self {
        if self.refresh.is_none() {
            self.refresh = Some(previous.clone());
        }
        self
    }
}

fn string_field(body: &Value, field: &str) -> Option<BearerToken> {
    body.get(field)
        .and_then(Value::as_str)
        .and_then(BearerToken::new)
}
