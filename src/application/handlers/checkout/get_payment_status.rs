//! GetPaymentStatusHandler - success-page polling.
//!
//! Serves a cached record while it is fresh and reconciles otherwise, so a
//! polling browser activates the subscription even when the webhook was lost.

use std::sync::Arc;

use crate::domain::foundation::{ErrorCode, GatewayError};
use crate::domain::payment::{ConfirmationRecord, PaymentId, ReconcileSource};
use crate::ports::SharedCache;

use super::reconcile_payment::{cached_record, ReconcilePaymentHandler};

#[derive(Debug, Clone, Default)]
pub struct GetPaymentStatusQuery {
    pub payment_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PaymentStatusView {
    Cached(ConfirmationRecord),
    Fresh(ConfirmationRecord),
    /// No provider key; the status cannot be looked up.
    Unknown { payment_id: PaymentId },
}

pub struct GetPaymentStatusHandler {
    cache: Arc<dyn SharedCache>,
    reconciler: Option<Arc<ReconcilePaymentHandler>>,
}

impl GetPaymentStatusHandler {
    pub fn new(
        cache: Arc<dyn SharedCache>,
        reconciler: Option<Arc<ReconcilePaymentHandler>>,
    ) -> Self {
        Self { cache, reconciler }
    }

    pub async fn handle(&self, query: GetPaymentStatusQuery) -> Result<PaymentStatusView, GatewayError> {
        let payment_id = parse_payment_id(query.payment_id.as_deref())?;

        if let Some(record) = cached_record(self.cache.as_ref(), &payment_id).await {
            return Ok(PaymentStatusView::Cached(record));
        }

        let Some(reconciler) = &self.reconciler else {
            return Ok(PaymentStatusView::Unknown { payment_id });
        };

        let reconciled = reconciler.reconcile(&payment_id, ReconcileSource::Poll).await?;
        Ok(PaymentStatusView::Fresh(reconciled.record))
    }
}

/// Missing ids get `PAYMENT_ID_REQUIRED`; malformed ones `VALIDATION_FAILED`.
pub fn parse_payment_id(raw: Option<&str>) -> Result<PaymentId, GatewayError> {
    let raw = raw.map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return Err(GatewayError::validation(
            ErrorCode::PaymentIdRequired,
            "paymentId is required",
        ));
    }
    Ok(PaymentId::new(raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::backend::MockBackendClient;
    use crate::adapters::cache::InMemoryCache;
    use crate::adapters::mollie::MockPaymentProvider;
    use crate::domain::payment::PaymentStatus;
    use http::Method;
    use serde_json::json;

    const CONFIRM: &str = "/api/v1/tenant/billing/confirm";

    fn handler(
        provider: &MockPaymentProvider,
        backend: &MockBackendClient,
        cache: &InMemoryCache,
    ) -> GetPaymentStatusHandler {
        let reconciler = ReconcilePaymentHandler::new(
            Arc::new(provider.clone()),
            Arc::new(backend.clone()),
            Arc::new(cache.clone()),
            CONFIRM,
            None,
        );
        GetPaymentStatusHandler::new(Arc::new(cache.clone()), Some(Arc::new(reconciler)))
    }

    fn query(id: &str) -> GetPaymentStatusQuery {
        GetPaymentStatusQuery {
            payment_id: Some(id.to_string()),
        }
    }

    #[tokio::test]
    async fn first_poll_reconciles_second_hits_cache() {
        let provider = MockPaymentProvider::new();
        let backend = MockBackendClient::new();
        let cache = InMemoryCache::new();
        provider.add_payment_with_status("tr_paid", PaymentStatus::Paid);
        backend.respond_json(Method::POST, CONFIRM, 200, json!({"ok": true}));
        let handler = handler(&provider, &backend, &cache);

        let first = handler.handle(query("tr_paid")).await.unwrap();
        assert!(matches!(first, PaymentStatusView::Fresh(ref r) if r.activated));

        let second = handler.handle(query("tr_paid")).await.unwrap();
        assert!(matches!(second, PaymentStatusView::Cached(ref r) if r.activated));

        assert_eq!(provider.call_count("fetch_payment"), 1);
        assert_eq!(backend.call_count(CONFIRM), 1);
    }

    #[tokio::test]
    async fn unreadable_cache_entry_is_a_miss() {
        let provider = MockPaymentProvider::new();
        let backend = MockBackendClient::new();
        let cache = InMemoryCache::new();
        provider.add_payment_with_status("tr_open", PaymentStatus::Open);
        cache
            .put(
                &ConfirmationRecord::cache_key("tr_open"),
                "not json",
                std::time::Duration::from_secs(60),
            )
            .await
            .unwrap();

        let view = handler(&provider, &backend, &cache)
            .handle(query("tr_open"))
            .await
            .unwrap();
        assert!(matches!(view, PaymentStatusView::Fresh(_)));
    }

    #[tokio::test]
    async fn unconfigured_provider_reports_unknown() {
        let cache = InMemoryCache::new();
        let handler = GetPaymentStatusHandler::new(Arc::new(cache), None);

        let view = handler.handle(query("tr_x")).await.unwrap();
        assert!(matches!(view, PaymentStatusView::Unknown { .. }));
    }

    #[tokio::test]
    async fn missing_and_malformed_ids_are_rejected() {
        let handler = GetPaymentStatusHandler::new(Arc::new(InMemoryCache::new()), None);

        let err = handler.handle(GetPaymentStatusQuery::default()).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::PaymentIdRequired);

        let err = handler.handle(query("../admin")).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationFailed);
    }
}
