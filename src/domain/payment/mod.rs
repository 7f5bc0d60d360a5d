//! Payment domain: pricing, provider payment intents and reconciliation records.

mod confirmation;
mod intent;
mod money;
mod quote;

pub use confirmation::{
    BackendConfirmation, ConfirmationRecord, ReconcileSource, PAID_TTL, UNSETTLED_TTL,
};
pub use intent::{PaymentId, PaymentIntent, PaymentStatus};
pub use money::Money;
pub use quote::{Plan, PriceList, Quote};
