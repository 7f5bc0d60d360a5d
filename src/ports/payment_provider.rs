//! Payment provider port for external payment processing.
//!
//! Defines the contract for the payment gateway integration (Mollie).
//! The provider holds the canonical copy of every payment; this system
//! only creates payments and reads their state back.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::payment::{Money, PaymentId, PaymentIntent};

/// Port for payment provider integrations.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Create a one-off payment and return where to send the customer.
    async fn create_payment(
        &self,
        request: CreatePaymentRequest,
    ) -> Result<CheckoutSession, PaymentError>;

    /// Fetch the canonical state of a payment.
    async fn fetch_payment(&self, payment_id: &PaymentId) -> Result<PaymentIntent, PaymentError>;
}

/// Request to create a payment.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatePaymentRequest {
    pub amount: Money,
    pub currency: String,
    pub description: String,
    pub redirect_url: String,
    pub cancel_url: Option<String>,
    pub webhook_url: Option<String>,
    pub metadata: Value,
}

/// Created payment awaiting customer action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSession {
    pub payment_id: PaymentId,
    pub checkout_url: String,
}

/// Payment provider error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentError {
    pub code: PaymentErrorCode,
    pub message: String,
    /// HTTP status returned by the provider, when it answered.
    pub provider_status: Option<u16>,
}

impl PaymentError {
    pub fn new(code: PaymentErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            provider_status: None,
        }
    }

    /// Create a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::NetworkError, message)
    }

    /// Non-success answer from the provider; `body` is kept for diagnostics.
    pub fn provider(status: u16, body: impl Into<String>) -> Self {
        Self {
            code: PaymentErrorCode::ProviderError,
            message: body.into(),
            provider_status: Some(status),
        }
    }

    /// Provider answered 2xx but the body was unusable.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::InvalidResponse, message)
    }

    /// No API key configured.
    pub fn not_configured() -> Self {
        Self::new(
            PaymentErrorCode::NotConfigured,
            "payment provider API key is not configured",
        )
    }
}

impl std::fmt::Display for PaymentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.provider_status {
            Some(status) => write!(f, "{} ({}): {}", self.code, status, self.message),
            None => write!(f, "{}: {}", self.code, self.message),
        }
    }
}

impl std::error::Error for PaymentError {}

/// Categories of payment errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentErrorCode {
    NetworkError,
    ProviderError,
    InvalidResponse,
    NotConfigured,
}

impl std::fmt::Display for PaymentErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PaymentErrorCode::NetworkError => "network_error",
            PaymentErrorCode::ProviderError => "provider_error",
            PaymentErrorCode::InvalidResponse => "invalid_response",
            PaymentErrorCode::NotConfigured => "not_configured",
        };
        write!(f, "{}", s)
    }
}
