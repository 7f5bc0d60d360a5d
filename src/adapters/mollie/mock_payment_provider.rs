//! Mock payment provider for testing.
//!
//! Provides a configurable mock implementation of `PaymentProvider`:
//! - Pre-configured payments by id
//! - Error injection
//! - Call tracking

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;

use crate::domain::payment::{PaymentId, PaymentIntent, PaymentStatus};
use crate::ports::{CheckoutSession, CreatePaymentRequest, PaymentError, PaymentProvider};

/// Mock payment provider for testing.
///
/// # Example
///
/// ```ignore
/// let mock = MockPaymentProvider::new();
/// mock.add_payment_with_status("tr_123", PaymentStatus::Paid);
/// mock.set_method_error("create_payment", PaymentError::network("down"));
/// ```
#[derive(Default, Clone)]
pub struct MockPaymentProvider {
    /// Inner state (thread-safe for async tests).
    inner: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    /// Known payments by id.
    payments: HashMap<String, PaymentIntent>,

    /// Checkout session returned by the next `create_payment`.
    next_checkout: Option<CheckoutSession>,

    /// Error to return on next call.
    next_error: Option<PaymentError>,

    /// Specific errors by method name.
    method_errors: HashMap<String, PaymentError>,

    /// Track method calls for assertions.
    call_log: Vec<MethodCall>,

    /// Requests received by `create_payment`.
    create_requests: Vec<CreatePaymentRequest>,
}

/// Recorded method call for assertions.
#[derive(Debug, Clone)]
pub struct MethodCall {
    pub method: String,
    pub args: Vec<String>,
}

impl MockPaymentProvider {
    pub fn new() -> Self {
        Self::default()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Configuration Methods
    // ════════════════════════════════════════════════════════════════════════════

    /// Add a payment that `fetch_payment` will return.
    pub fn add_payment(&self, intent: PaymentIntent) {
        let id = intent.id.to_string();
        self.inner.lock().unwrap().payments.insert(id, intent);
    }

    /// Add a payment with the given status and a minimal provider payload.
    pub fn add_payment_with_status(&self, id: &str, status: PaymentStatus) {
        let payment_id = PaymentId::new(id).expect("valid mock payment id");
        let metadata = json!({"email": "buyer@example.com", "seats": 3, "plan": "standard"});
        self.add_payment(PaymentIntent {
            id: payment_id,
            status,
            amount: None,
            currency: Some("EUR".to_string()),
            metadata: Some(metadata.clone()),
            payload: json!({
                "resource": "payment",
                "id": id,
                "status": status.as_str(),
                "metadata": metadata,
            }),
        });
    }

    /// Set the checkout session to return.
    pub fn set_checkout_session(&self, session: CheckoutSession) {
        self.inner.lock().unwrap().next_checkout = Some(session);
    }

    /// Set an error to return on the next call to any method.
    pub fn set_error(&self, error: PaymentError) {
        self.inner.lock().unwrap().next_error = Some(error);
    }

    /// Set an error for a specific method.
    pub fn set_method_error(&self, method: &str, error: PaymentError) {
        self.inner
            .lock()
            .unwrap()
            .method_errors
            .insert(method.to_string(), error);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Call Tracking
    // ════════════════════════════════════════════════════════════════════════════

    pub fn calls(&self) -> Vec<MethodCall> {
        self.inner.lock().unwrap().call_log.clone()
    }

    pub fn was_called(&self, method: &str) -> bool {
        self.call_count(method) > 0
    }

    pub fn call_count(&self, method: &str) -> usize {
        self.inner
            .lock()
            .unwrap()
            .call_log
            .iter()
            .filter(|c| c.method == method)
            .count()
    }

    /// Requests passed to `create_payment`, oldest first.
    pub fn create_requests(&self) -> Vec<CreatePaymentRequest> {
        self.inner.lock().unwrap().create_requests.clone()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Internal Helpers
    // ════════════════════════════════════════════════════════════════════════════

    fn record_call(&self, method: &str, args: Vec<String>) {
        self.inner.lock().unwrap().call_log.push(MethodCall {
            method: method.to_string(),
            args,
        });
    }

    fn check_error(&self, method: &str) -> Result<(), PaymentError> {
        let mut state = self.inner.lock().unwrap();

        if let Some(error) = state.method_errors.get(method) {
            return Err(error.clone());
        }

        if let Some(error) = state.next_error.take() {
            return Err(error);
        }

        Ok(())
    }
}

#[async_trait]
impl PaymentProvider for MockPaymentProvider {
    async fn create_payment(
        &self,
        request: CreatePaymentRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        self.record_call(
            "create_payment",
            vec![request.amount.to_string(), request.description.clone()],
        );
        self.check_error("create_payment")?;

        let mut state = self.inner.lock().unwrap();
        state.create_requests.push(request);

        if let Some(session) = state.next_checkout.take() {
            return Ok(session);
        }

        let suffix = uuid::Uuid::new_v4().simple().to_string();
        let id = format!("tr_mock_{}", &suffix[..10]);
        let payment_id = PaymentId::new(id.clone())
            .map_err(|e| PaymentError::invalid_response(e.to_string()))?;
        Ok(CheckoutSession {
            payment_id,
            checkout_url: format!("https://mock.mollie.test/checkout/{}", id),
        })
    }

    async fn fetch_payment(&self, payment_id: &PaymentId) -> Result<PaymentIntent, PaymentError> {
        self.record_call("fetch_payment", vec![payment_id.to_string()]);
        self.check_error("fetch_payment")?;

        let state = self.inner.lock().unwrap();
        state
            .payments
            .get(payment_id.as_str())
            .cloned()
            .ok_or_else(|| PaymentError::provider(404, r#"{"status":404,"title":"Not Found"}"#))
    }
}
