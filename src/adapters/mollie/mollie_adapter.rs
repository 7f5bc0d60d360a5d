//! Mollie payment provider adapter.
//!
//! Implements `PaymentProvider` against the Mollie v2 REST API. Every call
//! authenticates with the bearer API key; amounts go over the wire as
//! two-decimal strings.
//!
//! # Configuration
//!
//! ```ignore
//! let config = MollieConfig::new(api_key);
//! let adapter = MolliePaymentAdapter::new(config);
//! ```

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;

use crate::config::PaymentConfig;
use crate::domain::payment::{PaymentId, PaymentIntent};
use crate::ports::{CheckoutSession, CreatePaymentRequest, PaymentError, PaymentProvider};

use super::mollie_types::{MollieCreatePayment, MolliePayment};

const DEFAULT_API_BASE_URL: &str = "https://api.mollie.com";

/// Mollie API configuration.
#[derive(Clone)]
pub struct MollieConfig {
    /// Mollie API key (live_... or test_...).
    api_key: SecretString,

    /// Base URL for the Mollie API (default: https://api.mollie.com).
    api_base_url: String,
}

impl MollieConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key.into()),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }

    /// Builds the config from the payment section; `None` without a usable key.
    pub fn from_payment_config(config: &PaymentConfig) -> Option<Self> {
        let key = config.api_key.as_ref()?.expose_secret().trim().to_string();
        if key.is_empty() {
            return None;
        }
        Some(Self::new(key).with_base_url(config.api_base_url.clone()))
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }
}

impl std::fmt::Debug for MollieConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MollieConfig")
            .field("api_key", &"[REDACTED]")
            .field("api_base_url", &self.api_base_url)
            .finish()
    }
}

/// Mollie payment provider adapter.
#[derive(Debug, Clone)]
pub struct MolliePaymentAdapter {
    config: MollieConfig,
    http_client: reqwest::Client,
}

impl MolliePaymentAdapter {
    pub fn new(config: MollieConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    fn payments_url(&self) -> String {
        format!("{}/v2/payments", self.config.api_base_url)
    }

    async fn read_body(response: reqwest::Response) -> Result<(u16, String), PaymentError> {
        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| PaymentError::network(e.to_string()))?;
        Ok((status, text))
    }
}

#[async_trait]
impl PaymentProvider for MolliePaymentAdapter {
    async fn create_payment(
        &self,
        request: CreatePaymentRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        let body = MollieCreatePayment::from(request);

        let response = self
            .http_client
            .post(self.payments_url())
            .bearer_auth(self.config.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| PaymentError::network(e.to_string()))?;

        let (status, text) = Self::read_body(response).await?;
        if !(200..300).contains(&status) {
            tracing::error!(status, error = %text, "Mollie create payment failed");
            return Err(PaymentError::provider(status, text));
        }

        let payment: MolliePayment = serde_json::from_str(&text).map_err(|e| {
            PaymentError::invalid_response(format!("Failed to parse Mollie response: {}", e))
        })?;
        let checkout_url = payment
            .checkout_url()
            .map(str::to_string)
            .ok_or_else(|| PaymentError::invalid_response("Mollie response has no checkout link"))?;
        let payment_id = PaymentId::new(payment.id)
            .map_err(|e| PaymentError::invalid_response(e.to_string()))?;

        tracing::info!(payment_id = %payment_id, "Mollie payment created");

        Ok(CheckoutSession {
            payment_id,
            checkout_url,
        })
    }

    async fn fetch_payment(&self, payment_id: &PaymentId) -> Result<PaymentIntent, PaymentError> {
        let url = format!("{}/{}", self.payments_url(), payment_id);

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(self.config.api_key.expose_secret())
            .send()
            .await
            .map_err(|e| PaymentError::network(e.to_string()))?;

        let (status, text) = Self::read_body(response).await?;
        if !(200..300).contains(&status) {
            tracing::warn!(status, payment_id = %payment_id, "Mollie fetch payment failed");
            return Err(PaymentError::provider(status, text));
        }

        let payload: Value = serde_json::from_str(&text).map_err(|e| {
            PaymentError::invalid_response(format!("Failed to parse Mollie response: {}", e))
        })?;
        let payment: MolliePayment = serde_json::from_value(payload.clone())
            .map_err(|e| PaymentError::invalid_response(e.to_string()))?;

        payment
            .into_intent(payload)
            .map_err(|e| PaymentError::invalid_response(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::payment::{Money, PaymentStatus};
    use crate::ports::PaymentErrorCode;
    use mockito::Matcher;
    use serde_json::json;

    fn adapter_for(server: &mockito::Server) -> MolliePaymentAdapter {
        MolliePaymentAdapter::new(MollieConfig::new("test_key").with_base_url(server.url()))
    }

    fn create_request() -> CreatePaymentRequest {
        CreatePaymentRequest {
            amount: Money::from_units(897),
            currency: "EUR".into(),
            description: "NEN1090 standard - 3 seat(s) - Acme".into(),
            redirect_url: "https://shop.example/success.html".into(),
            cancel_url: Some("https://shop.example/cancel.html".into()),
            webhook_url: Some("https://shop.example/api/mollie/webhook".into()),
            metadata: json!({"email": "a@b.nl", "seats": 3}),
        }
    }

    #[tokio::test]
    async fn create_payment_sends_decimal_string_amount() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v2/payments")
            .match_header("authorization", "Bearer test_key")
            .match_body(Matcher::PartialJson(json!({
                "amount": {"currency": "EUR", "value": "897.00"},
                "redirectUrl": "https://shop.example/success.html",
                "webhookUrl": "https://shop.example/api/mollie/webhook"
            })))
            .with_status(201)
            .with_body(
                json!({
                    "id": "tr_abc123",
                    "status": "open",
                    "_links": {"checkout": {"href": "https://www.mollie.com/checkout/tr_abc123"}}
                })
                .to_string(),
            )
            .create_async()
            .await;

        let session = adapter_for(&server)
            .create_payment(create_request())
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(session.payment_id.as_str(), "tr_abc123");
        assert_eq!(
            session.checkout_url,
            "https://www.mollie.com/checkout/tr_abc123"
        );
    }

    #[tokio::test]
    async fn create_payment_surfaces_provider_error_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v2/payments")
            .with_status(422)
            .with_body(r#"{"status":422,"detail":"The amount is lower than minimum"}"#)
            .create_async()
            .await;

        let err = adapter_for(&server)
            .create_payment(create_request())
            .await
            .unwrap_err();

        assert_eq!(err.code, PaymentErrorCode::ProviderError);
        assert_eq!(err.provider_status, Some(422));
        assert!(err.message.contains("lower than minimum"));
    }

    #[tokio::test]
    async fn create_payment_without_checkout_link_is_invalid() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v2/payments")
            .with_status(201)
            .with_body(r#"{"id":"tr_abc123","status":"open"}"#)
            .create_async()
            .await;

        let err = adapter_for(&server)
            .create_payment(create_request())
            .await
            .unwrap_err();
        assert_eq!(err.code, PaymentErrorCode::InvalidResponse);
    }

    #[tokio::test]
    async fn fetch_payment_returns_full_payload() {
        let mut server = mockito::Server::new_async().await;
        let body = json!({
            "id": "tr_abc123",
            "status": "paid",
            "amount": {"currency": "EUR", "value": "1085.00"},
            "metadata": {"email": "a@b.nl"}
        });
        let mock = server
            .mock("GET", "/v2/payments/tr_abc123")
            .match_header("authorization", "Bearer test_key")
            .with_status(200)
            .with_body(body.to_string())
            .create_async()
            .await;

        let id = PaymentId::new("tr_abc123").unwrap();
        let intent = adapter_for(&server).fetch_payment(&id).await.unwrap();

        mock.assert_async().await;
        assert_eq!(intent.status, PaymentStatus::Paid);
        assert_eq!(intent.amount, Some(Money::from_units(1085)));
        assert_eq!(intent.payload, body);
    }

    #[tokio::test]
    async fn fetch_payment_not_found_is_provider_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/v2/payments/tr_missing")
            .with_status(404)
            .with_body(r#"{"status":404,"title":"Not Found"}"#)
            .create_async()
            .await;

        let id = PaymentId::new("tr_missing").unwrap();
        let err = adapter_for(&server).fetch_payment(&id).await.unwrap_err();
        assert_eq!(err.provider_status, Some(404));
    }

    #[test]
    fn config_requires_non_blank_key() {
        let mut payment = PaymentConfig::default();
        assert!(MollieConfig::from_payment_config(&payment).is_none());

        payment.api_key = Some(SecretString::new("   ".to_string()));
        assert!(MollieConfig::from_payment_config(&payment).is_none());

        payment.api_key = Some(SecretString::new("test_x".to_string()));
        let config = MollieConfig::from_payment_config(&payment).unwrap();
        assert!(!format!("{:?}", config).contains("test_x"));
    }
}
