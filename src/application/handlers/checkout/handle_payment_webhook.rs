//! HandlePaymentWebhookHandler - provider notifications.
//!
//! The notification only carries an id; its state is fetched back from the
//! provider before anything is trusted. Fetch failures surface as errors so
//! the provider retries delivery.

use std::sync::Arc;

use http::Method;
use serde_json::json;

use crate::domain::foundation::{ErrorCode, GatewayError};
use crate::domain::payment::{ConfirmationRecord, PaymentIntent, ReconcileSource};
use crate::ports::{BackendClient, UpstreamRequest};

use super::get_payment_status::parse_payment_id;
use super::reconcile_payment::ReconcilePaymentHandler;

#[derive(Debug, Clone, Default)]
pub struct PaymentWebhookCommand {
    pub payment_id: Option<String>,
}

pub struct HandlePaymentWebhookHandler {
    reconciler: Option<Arc<ReconcilePaymentHandler>>,
    backend: Arc<dyn BackendClient>,
    forward_path: Option<String>,
}

impl HandlePaymentWebhookHandler {
    pub fn new(
        reconciler: Option<Arc<ReconcilePaymentHandler>>,
        backend: Arc<dyn BackendClient>,
        forward_path: Option<String>,
    ) -> Self {
        Self {
            reconciler,
            backend,
            forward_path,
        }
    }

    pub async fn handle(&self, cmd: PaymentWebhookCommand) -> Result<ConfirmationRecord, GatewayError> {
        let Some(reconciler) = &self.reconciler else {
            tracing::error!("Payment webhook received but no provider key configured");
            return Err(GatewayError::configuration(
                ErrorCode::PaymentProviderNotConfigured,
                "Payment provider is not configured",
            ));
        };

        let payment_id = parse_payment_id(cmd.payment_id.as_deref())?;
        let reconciled = reconciler
            .reconcile(&payment_id, ReconcileSource::Webhook)
            .await?;

        self.forward(&reconciled.intent).await;
        Ok(reconciled.record)
    }

    async fn forward(&self, intent: &PaymentIntent) {
        let Some(path) = self.forward_path.as_deref() else {
            return;
        };
        let request = UpstreamRequest::json(
            Method::POST,
            path,
            &json!({ "source": "mollie_webhook", "payment": intent.payload }),
        );
        match self.backend.send(request).await {
            Ok(response) if !response.is_success() => {
                tracing::warn!(status = response.status.as_u16(), "Backend webhook forward declined");
            }
            Ok(_) => {}
            Err(e) => tracing::warn!(error = %e, "Backend webhook forward failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::backend::MockBackendClient;
    use crate::adapters::cache::InMemoryCache;
    use crate::adapters::mollie::MockPaymentProvider;
    use crate::domain::payment::PaymentStatus;
    use crate::ports::UpstreamError;

    const CONFIRM: &str = "/api/v1/tenant/billing/confirm";
    const FORWARD: &str = "/api/v1/billing/webhook";

    fn handler(provider: &MockPaymentProvider, backend: &MockBackendClient) -> HandlePaymentWebhookHandler {
        let reconciler = ReconcilePaymentHandler::new(
            Arc::new(provider.clone()),
            Arc::new(backend.clone()),
            Arc::new(InMemoryCache::new()),
            CONFIRM,
            None,
        );
        HandlePaymentWebhookHandler::new(
            Some(Arc::new(reconciler)),
            Arc::new(backend.clone()),
            Some(FORWARD.to_string()),
        )
    }

    fn cmd(id: &str) -> PaymentWebhookCommand {
        PaymentWebhookCommand {
            payment_id: Some(id.to_string()),
        }
    }

    #[tokio::test]
    async fn paid_webhook_confirms_and_forwards() {
        let provider = MockPaymentProvider::new();
        let backend = MockBackendClient::new();
        provider.add_payment_with_status("tr_paid", PaymentStatus::Paid);
        backend.respond_json(Method::POST, CONFIRM, 200, json!({"ok": true}));
        backend.respond_json(Method::POST, FORWARD, 200, json!({"ok": true}));

        let record = handler(&provider, &backend).handle(cmd("tr_paid")).await.unwrap();

        assert!(record.activated);
        assert_eq!(record.source, ReconcileSource::Webhook);
        let forwarded = backend.calls_to(FORWARD)[0].json().unwrap();
        assert_eq!(forwarded["source"], "mollie_webhook");
        assert_eq!(forwarded["payment"]["id"], "tr_paid");
    }

    #[tokio::test]
    async fn forward_failure_is_swallowed() {
        let provider = MockPaymentProvider::new();
        let backend = MockBackendClient::new();
        provider.add_payment_with_status("tr_open", PaymentStatus::Open);
        backend.set_error(UpstreamError::Unreachable("down".into()));

        let record = handler(&provider, &backend).handle(cmd("tr_open")).await.unwrap();
        assert!(!record.is_paid);
    }

    #[tokio::test]
    async fn unreachable_confirmation_still_records_paid_payment() {
        let provider = MockPaymentProvider::new();
        let backend = MockBackendClient::new();
        provider.add_payment_with_status("tr_paid", PaymentStatus::Paid);
        backend.set_error(UpstreamError::Unreachable("timeout".into()));

        let record = handler(&provider, &backend).handle(cmd("tr_paid")).await.unwrap();

        assert!(record.is_paid);
        assert!(!record.activated);
        let backend_result = record.backend_result.unwrap();
        assert_eq!(backend_result["ok"], false);
        assert_eq!(backend_result["error"], "BACKEND_CONFIRM_FAILED");
        assert_eq!(backend.call_count(FORWARD), 1);
    }

    #[tokio::test]
    async fn unknown_payment_is_an_error_for_retry() {
        let provider = MockPaymentProvider::new();
        let backend = MockBackendClient::new();

        let err = handler(&provider, &backend).handle(cmd("tr_ghost")).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::MollieFetchFailed);
        assert_eq!(backend.total_calls(), 0);
    }

    #[tokio::test]
    async fn missing_id_is_rejected() {
        let provider = MockPaymentProvider::new();
        let backend = MockBackendClient::new();

        let err = handler(&provider, &backend)
            .handle(PaymentWebhookCommand::default())
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::PaymentIdRequired);
    }

    #[tokio::test]
    async fn unconfigured_provider_is_configuration_error() {
        let handler = HandlePaymentWebhookHandler::new(None, Arc::new(MockBackendClient::new()), None);
        let err = handler.handle(cmd("tr_paid")).await.unwrap_err();
        assert!(matches!(err, GatewayError::Configuration { .. }));
    }
}
