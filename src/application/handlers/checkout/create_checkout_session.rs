//! CreateCheckoutSessionHandler - prices a subscription and opens a provider payment.
//!
//! Abuse checks run before anything leaves the gateway. Without a provider key
//! or a return base the handler answers in placeholder mode with the quote only.

use std::sync::Arc;

use http::Method;
use serde_json::{json, Value};

use crate::application::handlers::guard::{CaptchaGate, RateLimitGuard};
use crate::config::{BackendConfig, PaymentConfig};
use crate::domain::foundation::{ErrorCode, GatewayError};
use crate::domain::payment::{PaymentId, Plan, PriceList, Quote};
use crate::ports::{
    BackendClient, CreatePaymentRequest, PaymentProvider, RateLimitScope, UpstreamRequest,
};

const DETAIL_MAX_CHARS: usize = 500;

pub const PLACEHOLDER_NOTE: &str =
    "Payment provider not configured. Set the payment API key and checkout return base.";

/// Pricing and URL settings for checkout.
#[derive(Debug, Clone)]
pub struct CheckoutSettings {
    pub prices: PriceList,
    pub currency: String,
    pub return_base: Option<String>,
    pub webhook_url: Option<String>,
    pub billing_preview_path: Option<String>,
}

impl CheckoutSettings {
    pub fn from_config(payment: &PaymentConfig, backend: &BackendConfig) -> Self {
        Self {
            prices: PriceList {
                standard_seat_price: payment.standard_seat_price,
                pro_seat_price: payment.pro_seat_price,
                vat_percent: payment.vat_percent,
            },
            currency: payment.currency.clone(),
            return_base: payment.return_base().map(str::to_string),
            webhook_url: payment.webhook_url(),
            billing_preview_path: backend.billing_preview_path().map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CreateCheckoutSessionCommand {
    pub email: String,
    pub company: String,
    pub seats: Option<u32>,
    pub plan: Option<String>,
    pub captcha_token: Option<String>,
    pub client_ip: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CheckoutSessionResult {
    /// Payment created; the customer goes to `checkout_url`.
    Created {
        payment_id: PaymentId,
        checkout_url: String,
        cancel_url: String,
        currency: String,
        quote: Quote,
    },
    /// No provider configured; nothing was created.
    Placeholder {
        currency: String,
        quote: Quote,
        note: &'static str,
    },
}

pub struct CreateCheckoutSessionHandler {
    rate_limit: RateLimitGuard,
    captcha: CaptchaGate,
    provider: Option<Arc<dyn PaymentProvider>>,
    backend: Arc<dyn BackendClient>,
    settings: CheckoutSettings,
}

impl CreateCheckoutSessionHandler {
    pub fn new(
        rate_limit: RateLimitGuard,
        captcha: CaptchaGate,
        provider: Option<Arc<dyn PaymentProvider>>,
        backend: Arc<dyn BackendClient>,
        settings: CheckoutSettings,
    ) -> Self {
        Self {
            rate_limit,
            captcha,
            provider,
            backend,
            settings,
        }
    }

    pub async fn handle(
        &self,
        cmd: CreateCheckoutSessionCommand,
    ) -> Result<CheckoutSessionResult, GatewayError> {
        self.rate_limit
            .check(RateLimitScope::Checkout, &cmd.client_ip)
            .await?;

        let email = cmd.email.trim();
        if email.is_empty() {
            return Err(GatewayError::validation(
                ErrorCode::EmailRequired,
                "email is required",
            ));
        }

        self.captcha
            .enforce(cmd.captcha_token.as_deref(), Some(&cmd.client_ip))
            .await?;

        let plan = cmd.plan.as_deref().map(Plan::parse).unwrap_or_default();
        let quote = self.settings.prices.quote(plan, cmd.seats.unwrap_or(1));
        let company = cmd.company.trim();

        let (Some(provider), Some(return_base)) = (&self.provider, &self.settings.return_base)
        else {
            tracing::info!(seats = quote.seats, plan = plan.as_str(), "Checkout in placeholder mode");
            return Ok(CheckoutSessionResult::Placeholder {
                currency: self.settings.currency.clone(),
                quote,
                note: PLACEHOLDER_NOTE,
            });
        };

        let order_ref = self.preview_order(&quote, email, company).await;
        let cancel_url = format!("{}/cancel.html", return_base);
        let request = CreatePaymentRequest {
            amount: quote.charge(),
            currency: self.settings.currency.clone(),
            description: format!(
                "NEN1090 {} - {} seat(s) - {}",
                plan.as_str(),
                quote.seats,
                if company.is_empty() { email } else { company }
            ),
            redirect_url: format!("{}/success.html", return_base),
            cancel_url: Some(cancel_url.clone()),
            webhook_url: self.settings.webhook_url.clone(),
            metadata: json!({
                "email": email,
                "company": company,
                "seats": quote.seats,
                "plan": plan.as_str(),
                "orderRef": order_ref.unwrap_or_default(),
            }),
        };

        let session = provider.create_payment(request).await.map_err(|e| {
            tracing::warn!(error = %e, "Payment creation failed");
            GatewayError::upstream(
                ErrorCode::MollieCreateFailed,
                e.provider_status,
                &e.message,
                DETAIL_MAX_CHARS,
            )
        })?;

        tracing::info!(
            payment_id = %session.payment_id,
            seats = quote.seats,
            plan = plan.as_str(),
            "Checkout session created"
        );

        Ok(CheckoutSessionResult::Created {
            payment_id: session.payment_id,
            checkout_url: session.checkout_url,
            cancel_url,
            currency: self.settings.currency.clone(),
            quote,
        })
    }

    /// Asks the backend to pre-register the order. Any failure yields `None`.
    async fn preview_order(&self, quote: &Quote, email: &str, company: &str) -> Option<String> {
        let path = self.settings.billing_preview_path.as_deref()?;
        let request = UpstreamRequest::json(
            Method::POST,
            path,
            &json!({
                "seats": quote.seats,
                "plan": quote.plan.as_str(),
                "email": email,
                "company": company,
                "source": "website",
            }),
        );

        let response = match self.backend.send(request).await {
            Ok(response) if response.is_success() => response,
            Ok(response) => {
                tracing::debug!(status = response.status.as_u16(), "Billing preview declined");
                return None;
            }
            Err(e) => {
                tracing::debug!(error = %e, "Billing preview unavailable");
                return None;
            }
        };

        let body = response.json()?;
        ["order_ref", "orderRef"]
            .iter()
            .find_map(|field| match body.get(*field) {
                Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
                Some(Value::Number(n)) => Some(n.to_string()),
                _ => None,
            })
    }
}
