//! Payment configuration

use secrecy::SecretString;
use serde::Deserialize;

use super::error::ValidationError;

/// Payment provider (Mollie) and pricing configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Mollie API key (live_... or test_...)
    pub api_key: Option<SecretString>,

    /// Base URL of the Mollie API
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Public site origin used for redirect and cancel pages
    pub return_base_url: Option<String>,

    /// Explicit webhook URL; derived from the return base when absent
    pub webhook_url: Option<String>,

    /// ISO currency code for all payments
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Yearly price per seat on the standard plan, whole currency units
    #[serde(default = "default_standard_seat_price")]
    pub standard_seat_price: u32,

    /// Yearly price per seat on the pro plan, whole currency units
    #[serde(default = "default_pro_seat_price")]
    pub pro_seat_price: u32,

    /// VAT rate applied to the net amount
    #[serde(default = "default_vat_percent")]
    pub vat_percent: u32,
}

impl PaymentConfig {
    /// Return base without trailing slashes, ignoring blank values.
    pub fn return_base(&self) -> Option<&str> {
        self.return_base_url
            .as_deref()
            .map(|b| b.trim().trim_end_matches('/'))
            .filter(|b| !b.is_empty())
    }

    /// Webhook URL handed to the provider on payment creation.
    pub fn webhook_url(&self) -> Option<String> {
        let explicit = self
            .webhook_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty());
        match explicit {
            Some(url) => Some(url.to_string()),
            None => self
                .return_base()
                .map(|base| format!("{}/api/mollie/webhook", base)),
        }
    }

    /// Validate payment configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://")
        {
            return Err(ValidationError::InvalidUrl("payment.api_base_url"));
        }
        if let Some(base) = self.return_base() {
            if !base.starts_with("http://") && !base.starts_with("https://") {
                return Err(ValidationError::InvalidUrl("payment.return_base_url"));
            }
        }
        if self.vat_percent > 100 {
            return Err(ValidationError::InvalidVatPercent);
        }
        Ok(())
    }
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base_url: default_api_base_url(),
            return_base_url: None,
            webhook_url: None,
            currency: default_currency(),
            standard_seat_price: default_standard_seat_price(),
            pro_seat_price: default_pro_seat_price(),
            vat_percent: default_vat_percent(),
        }
    }
}

fn default_api_base_url() -> String {
    "https://api.mollie.com".to_string()
}

fn default_currency() -> String {
    "EUR".to_string()
}

fn default_standard_seat_price() -> u32 {
    299
}

fn default_pro_seat_price() -> u32 {
    499
}

fn default_vat_percent() -> u32 {
    21
}
