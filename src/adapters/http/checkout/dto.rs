//! HTTP DTOs for checkout endpoints.
//!
//! Request bodies are parsed leniently: a malformed body is treated as empty,
//! so the caller sees the field-level error (`EMAIL_REQUIRED`) instead of a
//! generic parse failure.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::application::handlers::checkout::{CheckoutSessionResult, PaymentStatusView};
use crate::domain::payment::{ConfirmationRecord, Quote};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateCheckoutSessionRequest {
    pub email: String,
    pub company: String,
    pub seats: Option<Value>,
    pub plan: Option<String>,
    pub turnstile_token: Option<String>,
}

impl CreateCheckoutSessionRequest {
    pub fn seats(&self) -> Option<u32> {
        self.seats.as_ref().and_then(lenient_u32)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentStatusParams {
    #[serde(rename = "paymentId")]
    pub payment_id: Option<String>,
}

/// Accepts `3`, `3.0` or `"3"`, as browsers send form values as strings.
pub fn lenient_u32(value: &Value) -> Option<u32> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if number.is_finite() && number >= 0.0 {
        Some(number.min(f64::from(u32::MAX)) as u32)
    } else {
        None
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSessionResponse {
    pub ok: bool,
    pub mode: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checkout_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancel_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<&'static str>,
    pub total: u64,
    pub currency: String,
    pub quote: Quote,
}

impl From<CheckoutSessionResult> for CheckoutSessionResponse {
    fn from(result: CheckoutSessionResult) -> Self {
        match result {
            CheckoutSessionResult::Created {
                payment_id,
                checkout_url,
                cancel_url,
                currency,
                quote,
            } => Self {
                ok: true,
                mode: "mollie",
                checkout_url: Some(checkout_url),
                payment_id: Some(payment_id.to_string()),
                cancel_url: Some(cancel_url),
                note: None,
                total: quote.net,
                currency,
                quote,
            },
            CheckoutSessionResult::Placeholder {
                currency,
                quote,
                note,
            } => Self {
                ok: true,
                mode: "placeholder",
                checkout_url: None,
                payment_id: None,
                cancel_url: None,
                note: Some(note),
                total: quote.net,
                currency,
                quote,
            },
        }
    }
}

/// Body of `GET /api/checkout/status`.
pub fn status_body(view: PaymentStatusView) -> Value {
    match view {
        PaymentStatusView::Cached(record) => record_body(&record, true),
        PaymentStatusView::Fresh(record) => record_body(&record, false),
        PaymentStatusView::Unknown { payment_id } => json!({
            "ok": true,
            "paymentId": payment_id.as_str(),
            "status": "unknown",
            "isPaid": false,
            "activated": false,
            "note": "Payment provider not configured; status unavailable.",
        }),
    }
}

fn record_body(record: &ConfirmationRecord, cached: bool) -> Value {
    let mut body = match serde_json::to_value(record) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    };
    body.insert("ok".to_string(), Value::Bool(true));
    body.insert("cached".to_string(), Value::Bool(cached));
    Value::Object(body)
}
