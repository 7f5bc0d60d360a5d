//! Checkout handlers: session creation and payment reconciliation.

mod create_checkout_session;
mod get_payment_status;
mod handle_payment_webhook;
mod reconcile_payment;

pub use create_checkout_session::{
    CheckoutSessionResult, CheckoutSettings, CreateCheckoutSessionCommand,
    CreateCheckoutSessionHandler, PLACEHOLDER_NOTE,
};
pub use get_payment_status::{
    parse_payment_id, GetPaymentStatusHandler, GetPaymentStatusQuery, PaymentStatusView,
};
pub use handle_payment_webhook::{HandlePaymentWebhookHandler, PaymentWebhookCommand};
pub use reconcile_payment::{Reconciled, ReconcilePaymentHandler, WEBHOOK_TOKEN_HEADER};
