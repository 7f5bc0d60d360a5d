//! Payment intents as reported by the payment provider.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::foundation::ValidationError;

use super::Money;

/// Provider payment identifier (e.g. `tr_WDqYK6vllg`).
///
/// Restricted to ASCII alphanumerics and underscores so it can be placed
/// in a URL path without escaping.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PaymentId(String);

impl PaymentId {
    const MAX_LEN: usize = 64;

    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into().trim().to_string();
        if value.is_empty() {
            return Err(ValidationError::empty_field("paymentId"));
        }
        if value.len() > Self::MAX_LEN
            || !value
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'_')
        {
            return Err(ValidationError::invalid_format(
                "paymentId",
                "expected letters, digits and underscores",
            ));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PaymentId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PaymentId> for String {
    fn from(id: PaymentId) -> Self {
        id.0
    }
}

impl fmt::Display for PaymentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Payment lifecycle status. Unrecognized values map to `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PaymentStatus {
    Open,
    Pending,
    Authorized,
    Paid,
    Failed,
    Canceled,
    Expired,
    Unknown,
}

impl PaymentStatus {
    pub fn parse(value: &str) -> Self {
        match value {
            "open" => PaymentStatus::Open,
            "pending" => PaymentStatus::Pending,
            "authorized" => PaymentStatus::Authorized,
            "paid" => PaymentStatus::Paid,
            "failed" => PaymentStatus::Failed,
            "canceled" => PaymentStatus::Canceled,
            "expired" => PaymentStatus::Expired,
            _ => PaymentStatus::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Open => "open",
            PaymentStatus::Pending => "pending",
            PaymentStatus::Authorized => "authorized",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Canceled => "canceled",
            PaymentStatus::Expired => "expired",
            PaymentStatus::Unknown => "unknown",
        }
    }

    pub fn is_paid(&self) -> bool {
        matches!(self, PaymentStatus::Paid)
    }
}

impl From<String> for PaymentStatus {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<PaymentStatus> for String {
    fn from(status: PaymentStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical payment state fetched from the provider.
///
/// `payload` is the provider's full JSON document, relayed to the backend
/// unchanged on confirmation.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentIntent {
    pub id: PaymentId,
    pub status: PaymentStatus,
    pub amount: Option<Money>,
    pub currency: Option<String>,
    pub metadata: Option<Value>,
    pub payload: Value,
}
