//! Mollie payment provider adapters.

mod mock_payment_provider;
mod mollie_adapter;
mod mollie_types;

pub use mock_payment_provider::{MethodCall, MockPaymentProvider};
pub use mollie_adapter::{MollieConfig, MolliePaymentAdapter};
