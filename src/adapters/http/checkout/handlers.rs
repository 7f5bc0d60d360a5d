//! HTTP handlers for checkout endpoints.

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

use crate::adapters::http::error::GatewayApiError;
use crate::adapters::http::middleware::ClientIp;
use crate::adapters::http::router::GatewayAppState;
use crate::application::handlers::checkout::{
    CreateCheckoutSessionCommand, GetPaymentStatusQuery, PaymentWebhookCommand,
};

use super::dto::{status_body, CheckoutSessionResponse, CreateCheckoutSessionRequest, PaymentStatusParams};

/// POST /api/checkout/create-session - Start a paid checkout
pub async fn create_session(
    State(state): State<GatewayAppState>,
    ClientIp(client_ip): ClientIp,
    body: Bytes,
) -> Result<Json<CheckoutSessionResponse>, GatewayApiError> {
    let req: CreateCheckoutSessionRequest = serde_json::from_slice(&body).unwrap_or_default();
    let cmd = CreateCheckoutSessionCommand {
        seats: req.seats(),
        email: req.email,
        company: req.company,
        plan: req.plan,
        captcha_token: req.turnstile_token,
        client_ip,
    };

    let result = state.checkout_handler().handle(cmd).await?;
    Ok(Json(result.into()))
}

/// GET /api/checkout/status?paymentId= - Poll a payment, reconciling on cache miss
pub async fn payment_status(
    State(state): State<GatewayAppState>,
    Query(params): Query<PaymentStatusParams>,
) -> Result<Response, GatewayApiError> {
    let query = GetPaymentStatusQuery {
        payment_id: params.payment_id,
    };
    let view = state.status_handler().handle(query).await?;
    Ok((
        [(header::CACHE_CONTROL, "no-store")],
        Json(status_body(view)),
    )
        .into_response())
}

/// POST /api/mollie/webhook - Provider notification (form-encoded or JSON `id`)
pub async fn payment_webhook(
    State(state): State<GatewayAppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, GatewayApiError> {
    let cmd = PaymentWebhookCommand {
        payment_id: webhook_payment_id(&headers, &body),
    };
    let record = state.webhook_handler().handle(cmd).await?;
    tracing::info!(payment_id = %record.payment_id, status = %record.status, "Payment webhook handled");
    Ok((StatusCode::OK, "ok").into_response())
}

/// Reads `id` from a form body when the content type says so, from a JSON body otherwise.
pub fn webhook_payment_id(headers: &HeaderMap, body: &[u8]) -> Option<String> {
    let is_form = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| {
            ct.to_ascii_lowercase()
                .contains("application/x-www-form-urlencoded")
        })
        .unwrap_or(false);

    if is_form {
        return url::form_urlencoded::parse(body)
            .find(|(key, _)| key == "id")
            .map(|(_, value)| value.into_owned());
    }

    serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|v| v.get("id").and_then(Value::as_str).map(str::to_string))
}
