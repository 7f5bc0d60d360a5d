//! Cached outcome of reconciling one payment.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::domain::foundation::Timestamp;

use super::{PaymentIntent, PaymentStatus};

/// Cache lifetime while a payment is still unsettled.
pub const UNSETTLED_TTL: Duration = Duration::from_secs(60);

/// Cache lifetime once paid; paid is treated as final.
pub const PAID_TTL: Duration = Duration::from_secs(300);

/// Which trigger produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReconcileSource {
    Webhook,
    Poll,
}

/// Result of the backend activation call for a payment.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendConfirmation {
    /// Payment is not paid, so no call was made.
    NotAttempted,
    /// Backend accepted the confirmation; carries its JSON reply.
    Confirmed(Value),
    /// Backend answered with a non-success status.
    Rejected { status: u16, detail: String },
    /// Backend could not be reached.
    Unreachable,
}

impl BackendConfirmation {
    pub fn activated(&self) -> bool {
        matches!(self, BackendConfirmation::Confirmed(_))
    }

    /// JSON stored under `backend` in the record.
    pub fn to_json(&self) -> Option<Value> {
        match self {
            BackendConfirmation::NotAttempted => None,
            BackendConfirmation::Confirmed(reply) => Some(reply.clone()),
            BackendConfirmation::Rejected { status, detail } => {
                Some(json!({ "ok": false, "status": status, "detail": detail }))
            }
            BackendConfirmation::Unreachable => {
                Some(json!({ "ok": false, "error": "BACKEND_CONFIRM_FAILED" }))
            }
        }
    }
}

/// What the gateway last learned about a payment.
///
/// Never authoritative: the provider owns the status and the backend owns
/// activation. `activated` only says a confirmation call succeeded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmationRecord {
    pub payment_id: String,
    pub status: PaymentStatus,
    pub is_paid: bool,
    pub activated: bool,
    #[serde(rename = "backend")]
    pub backend_result: Option<Value>,
    pub needs_onboarding: bool,
    pub onboarding_url: Option<String>,
    pub metadata: Option<Value>,
    pub source: ReconcileSource,
    pub updated_at: Timestamp,
}

impl ConfirmationRecord {
    pub fn new(
        intent: &PaymentIntent,
        confirmation: &BackendConfirmation,
        source: ReconcileSource,
    ) -> Self {
        let reply = match confirmation {
            BackendConfirmation::Confirmed(reply) => Some(reply),
            _ => None,
        };
        let needs_onboarding = reply
            .map(|r| truthy(r, "needs_onboarding") || truthy(r, "needsOnboarding"))
            .unwrap_or(false);
        let onboarding_url = reply.and_then(|r| {
            non_empty_str(r, "onboarding_url").or_else(|| non_empty_str(r, "onboardingUrl"))
        });

        Self {
            payment_id: intent.id.to_string(),
            status: intent.status,
            is_paid: intent.status.is_paid(),
            activated: confirmation.activated(),
            backend_result: confirmation.to_json(),
            needs_onboarding,
            onboarding_url,
            metadata: intent.metadata.clone(),
            source,
            updated_at: Timestamp::now(),
        }
    }

    /// Shared cache key for a payment's record.
    pub fn cache_key(payment_id: &str) -> String {
        format!("checkout:status:{}", payment_id)
    }

    pub fn cache_ttl(&self) -> Duration {
        if self.is_paid {
            PAID_TTL
        } else {
            UNSETTLED_TTL
        }
    }
}

fn truthy(value: &Value, field: &str) -> bool {
    match value.get(field) {
        Some(Value::Bool(b)) => *b,
        Some(Value::Null) | None => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Some(_) => true,
    }
}

fn non_empty_str(value: &Value, field: &str) -> Option<String> {
    value
        .get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
