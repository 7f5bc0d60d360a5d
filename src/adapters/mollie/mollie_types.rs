//! Wire types for the Mollie v2 payments API.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::foundation::ValidationError;
use crate::domain::payment::{Money, PaymentId, PaymentIntent, PaymentStatus};
use crate::ports::CreatePaymentRequest;

/// Amount as Mollie expects it: currency plus a two-decimal string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MollieAmount {
    pub currency: String,
    pub value: String,
}

/// Body of `POST /v2/payments`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MollieCreatePayment {
    pub amount: MollieAmount,
    pub description: String,
    pub redirect_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancel_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
    pub metadata: Value,
}

impl From<CreatePaymentRequest> for MollieCreatePayment {
    fn from(request: CreatePaymentRequest) -> Self {
        Self {
            amount: MollieAmount {
                currency: request.currency,
                value: request.amount.to_string(),
            },
            description: request.description,
            redirect_url: request.redirect_url,
            cancel_url: request.cancel_url,
            webhook_url: request.webhook_url,
            metadata: request.metadata,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MollieLink {
    pub href: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MollieLinks {
    pub checkout: Option<MollieLink>,
}

/// The subset of a Mollie payment resource the gateway reads.
#[derive(Debug, Clone, Deserialize)]
pub struct MolliePayment {
    pub id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub amount: Option<MollieAmount>,
    #[serde(default)]
    pub metadata: Option<Value>,
    #[serde(rename = "_links", default)]
    pub links: MollieLinks,
}

impl MolliePayment {
    pub fn checkout_url(&self) -> Option<&str> {
        self.links
            .checkout
            .as_ref()
            .map(|link| link.href.as_str())
            .filter(|href| !href.is_empty())
    }

    /// Converts to a domain intent, keeping `payload` as the full document.
    pub fn into_intent(self, payload: Value) -> Result<PaymentIntent, ValidationError> {
        let id = PaymentId::new(self.id)?;
        let status = self
            .status
            .as_deref()
            .map(PaymentStatus::parse)
            .unwrap_or(PaymentStatus::Unknown);
        let (amount, currency) = match self.amount {
            Some(amount) => (Money::parse_decimal(&amount.value).ok(), Some(amount.currency)),
            None => (None, None),
        };
        Ok(PaymentIntent {
            id,
            status,
            amount,
            currency,
            metadata: self.metadata.filter(|m| !m.is_null()),
            payload,
        })
    }
}
