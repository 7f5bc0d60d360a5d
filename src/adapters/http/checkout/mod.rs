//! HTTP adapter for checkout and payment reconciliation.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    lenient_u32, CheckoutSessionResponse, CreateCheckoutSessionRequest, PaymentStatusParams,
};
pub use handlers::webhook_payment_id;
pub use routes::checkout_routes;
