//! GetOnboardingStatusHandler - hints for the onboarding UI.
//!
//! Reads the tenant status endpoint first and falls back to the identity
//! endpoint. Without credentials the UI runs its local onboarding flow.

use std::sync::Arc;

use http::{header, HeaderValue, Method};
use serde_json::{json, Map, Value};

use crate::domain::foundation::GatewayError;
use crate::domain::session::BearerToken;
use crate::ports::{BackendClient, UpstreamRequest};

#[derive(Debug, Clone, Default)]
pub struct GetOnboardingStatusQuery {
    /// Raw `Authorization` header from the client; preferred when present.
    pub authorization: Option<String>,
    pub access_cookie: Option<BearerToken>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OnboardingStatus {
    /// `backend` when the backend was asked, `local` otherwise.
    pub mode: &'static str,
    pub hint: Value,
}

pub struct GetOnboardingStatusHandler {
    backend: Arc<dyn BackendClient>,
    status_path: String,
    me_path: String,
}

impl GetOnboardingStatusHandler {
    pub fn new(
        backend: Arc<dyn BackendClient>,
        status_path: impl Into<String>,
        me_path: impl Into<String>,
    ) -> Self {
        Self {
            backend,
            status_path: status_path.into(),
            me_path: me_path.into(),
        }
    }

    pub async fn handle(
        &self,
        query: GetOnboardingStatusQuery,
    ) -> Result<OnboardingStatus, GatewayError> {
        let bearer = query
            .authorization
            .filter(|h| !h.trim().is_empty())
            .or_else(|| query.access_cookie.map(|t| t.authorization_value()))
            .and_then(|h| HeaderValue::from_str(&h).ok());

        let Some(bearer) = bearer else {
            return Ok(OnboardingStatus {
                mode: "local",
                hint: json!({}),
            });
        };

        let status = self.fetch(&self.status_path, &bearer).await;
        let me = match status {
            Some(_) => None,
            None => self.fetch(&self.me_path, &bearer).await,
        };

        Ok(OnboardingStatus {
            mode: "backend",
            hint: onboarding_hint(status.as_ref(), me.as_ref()),
        })
    }

    /// JSON body of a successful answer; anything else is a miss.
    async fn fetch(&self, path: &str, bearer: &HeaderValue) -> Option<Value> {
        let request = UpstreamRequest::new(Method::GET, path)
            .with_header(header::ACCEPT, HeaderValue::from_static("application/json"))
            .with_header(header::AUTHORIZATION, bearer.clone());

        match self.backend.send(request).await {
            Ok(response) if response.is_success() => response.json(),
            Ok(response) => {
                tracing::debug!(path, status = response.status.as_u16(), "Onboarding lookup missed");
                None
            }
            Err(e) => {
                tracing::warn!(path, error = %e, "Onboarding lookup failed");
                None
            }
        }
    }
}

fn onboarding_hint(status: Option<&Value>, me: Option<&Value>) -> Value {
    let mut hint = Map::new();

    if let Some(status) = status {
        hint.insert(
            "tenant".into(),
            first_truthy(status, &["tenant"]).unwrap_or(status).clone(),
        );
        let read_only = ["read_only", "readOnly"]
            .iter()
            .find_map(|k| status.get(k).filter(|v| !v.is_null()))
            .cloned()
            .unwrap_or(Value::Bool(false));
        hint.insert("read_only".into(), read_only);
        hint.insert(
            "reasons".into(),
            first_truthy(status, &["reasons"]).cloned().unwrap_or_else(|| json!([])),
        );
        hint.insert(
            "company".into(),
            Value::String(text(first_truthy(status, &["company", "tenant_name", "name"]))),
        );
        if let Some(seats) = first_truthy(status, &["seats_purchased", "seats", "seatsPurchased"])
            .and_then(seat_count)
        {
            hint.insert("seats".into(), seats);
        }
    }

    if let Some(me) = me {
        let user = first_truthy(me, &["user"]).unwrap_or(me);
        hint.insert("user".into(), user.clone());
        let email = first_truthy(me, &["email"])
            .or_else(|| me.get("user").and_then(|u| first_truthy(u, &["email"])));
        hint.insert("email".into(), Value::String(text(email)));

        let company_known = hint
            .get("company")
            .and_then(Value::as_str)
            .is_some_and(|c| !c.is_empty());
        if !company_known {
            let company = me
                .get("tenant")
                .and_then(|t| first_truthy(t, &["name"]))
                .or_else(|| first_truthy(me, &["tenant_name"]));
            hint.insert("company".into(), Value::String(text(company)));
        }
    }

    Value::Object(hint)
}

/// First field among `keys` holding a truthy value.
fn first_truthy<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| value.get(k))
        .find(|v| is_truthy(v))
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}

/// Positive seat count from a number or numeric string.
fn seat_count(value: &Value) -> Option<Value> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !n.is_finite() || n == 0.0 {
        return None;
    }
    if n.fract() == 0.0 && n > 0.0 {
        Some(json!(n as u64))
    } else {
        Some(json!(n))
    }
}
