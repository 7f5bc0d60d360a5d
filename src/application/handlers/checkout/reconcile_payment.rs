//! ReconcilePaymentHandler - converges provider state, backend activation and cache.
//!
//! Both the provider webhook and the success-page poll land here. Each call:
//! 1. Fetches the canonical payment from the provider.
//! 2. If it is paid, posts it to the backend confirm endpoint. The backend
//!    must treat repeated confirmations for one payment as a no-op.
//! 3. Caches the resulting record (5 minutes when paid, 1 minute otherwise).
//!
//! Confirmation failures end up in the record, never in the `Err` branch.

use std::sync::Arc;

use http::{HeaderName, HeaderValue, Method};
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;

use crate::domain::foundation::{truncate_detail, ErrorCode, GatewayError};
use crate::domain::payment::{
    BackendConfirmation, ConfirmationRecord, PaymentId, PaymentIntent, ReconcileSource,
};
use crate::ports::{BackendClient, PaymentProvider, SharedCache, UpstreamRequest};

/// Header carrying the shared secret on confirm calls.
pub const WEBHOOK_TOKEN_HEADER: &str = "x-webhook-token";

const DETAIL_MAX_CHARS: usize = 400;

/// Outcome of one reconcile pass.
#[derive(Debug, Clone)]
pub struct Reconciled {
    pub record: ConfirmationRecord,
    pub intent: PaymentIntent,
}

pub struct ReconcilePaymentHandler {
    provider: Arc<dyn PaymentProvider>,
    backend: Arc<dyn BackendClient>,
    cache: Arc<dyn SharedCache>,
    confirm_path: String,
    confirm_token: Option<SecretString>,
}

impl ReconcilePaymentHandler {
    pub fn new(
        provider: Arc<dyn PaymentProvider>,
        backend: Arc<dyn BackendClient>,
        cache: Arc<dyn SharedCache>,
        confirm_path: impl Into<String>,
        confirm_token: Option<SecretString>,
    ) -> Self {
        Self {
            provider,
            backend,
            cache,
            confirm_path: confirm_path.into(),
            confirm_token: confirm_token.filter(|t| !t.expose_secret().trim().is_empty()),
        }
    }

    pub async fn reconcile(
        &self,
        payment_id: &PaymentId,
        source: ReconcileSource,
    ) -> Result<Reconciled, GatewayError> {
        let intent = self.provider.fetch_payment(payment_id).await.map_err(|e| {
            tracing::warn!(payment_id = %payment_id, error = %e, "Payment fetch failed");
            GatewayError::upstream(
                ErrorCode::MollieFetchFailed,
                e.provider_status,
                &e.message,
                DETAIL_MAX_CHARS,
            )
        })?;

        let confirmation = if intent.status.is_paid() {
            self.confirm(&intent).await
        } else {
            BackendConfirmation::NotAttempted
        };

        let record = ConfirmationRecord::new(&intent, &confirmation, source);
        self.store(&record).await;

        tracing::info!(
            payment_id = %payment_id,
            status = %record.status,
            activated = record.activated,
            source = ?source,
            "Payment reconciled"
        );

        Ok(Reconciled { record, intent })
    }

    async fn confirm(&self, intent: &PaymentIntent) -> BackendConfirmation {
        let mut request = UpstreamRequest::json(
            Method::POST,
            self.confirm_path.clone(),
            &json!({ "provider": "mollie", "payment": intent.payload }),
        );
        if let Some(token) = &self.confirm_token {
            if let Ok(value) = HeaderValue::from_str(token.expose_secret().trim()) {
                request = request.with_header(HeaderName::from_static(WEBHOOK_TOKEN_HEADER), value);
            }
        }

        match self.backend.send(request).await {
            Ok(response) if response.is_success() => {
                let reply = response
                    .json()
                    .unwrap_or_else(|| json!({ "raw": response.text() }));
                BackendConfirmation::Confirmed(reply)
            }
            Ok(response) => {
                tracing::warn!(
                    payment_id = %intent.id,
                    status = response.status.as_u16(),
                    "Backend rejected payment confirmation"
                );
                BackendConfirmation::Rejected {
                    status: response.status.as_u16(),
                    detail: truncate_detail(&response.text(), DETAIL_MAX_CHARS),
                }
            }
            Err(e) => {
                tracing::warn!(payment_id = %intent.id, error = %e, "Backend confirmation unreachable");
                BackendConfirmation::Unreachable
            }
        }
    }

    async fn store(&self, record: &ConfirmationRecord) {
        let key = ConfirmationRecord::cache_key(&record.payment_id);
        let value = match serde_json::to_string(record) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(error = %e, "Could not serialize confirmation record");
                return;
            }
        };
        if let Err(e) = self.cache.put(&key, &value, record.cache_ttl()).await {
            tracing::warn!(error = %e, key, "Could not cache confirmation record");
        }
    }
}

/// Reads a cached record; anything unreadable is a miss.
pub async fn cached_record(cache: &dyn SharedCache, payment_id: &PaymentId) -> Option<ConfirmationRecord> {
    let key = ConfirmationRecord::cache_key(payment_id.as_str());
    match cache.get(&key).await {
        Ok(Some(raw)) => serde_json::from_str::<ConfirmationRecord>(&raw)
            .map_err(|e| tracing::debug!(error = %e, key, "Discarding unreadable cache entry"))
            .ok(),
        Ok(None) => None,
        Err(e) => {
            tracing::warn!(error = %e, "Status cache unavailable");
            None
        }
    }
}
