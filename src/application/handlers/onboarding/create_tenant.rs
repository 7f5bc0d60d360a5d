//! CreateTenantHandler - relays self-service tenant creation to the backend.

use std::sync::Arc;

use http::Method;
use serde_json::{json, Value};

use crate::domain::foundation::{ErrorCode, GatewayError};
use crate::ports::{BackendClient, UpstreamRequest, UpstreamResponse};

#[derive(Debug, Clone, Default)]
pub struct CreateTenantCommand {
    /// Client JSON body, passed through unchanged.
    pub body: Value,
}

pub struct CreateTenantHandler {
    backend: Arc<dyn BackendClient>,
    path: String,
}

impl CreateTenantHandler {
    pub fn new(backend: Arc<dyn BackendClient>, path: impl Into<String>) -> Self {
        Self {
            backend,
            path: path.into(),
        }
    }

    /// Returns the backend answer as-is, whatever its status.
    pub async fn handle(&self, cmd: CreateTenantCommand) -> Result<UpstreamResponse, GatewayError> {
        let body = if cmd.body.is_null() { json!({}) } else { cmd.body };
        let request = UpstreamRequest::json(Method::POST, self.path.clone(), &body);
        let response = self.backend.send(request).await.map_err(|e| {
            tracing::warn!(error = %e, "Create-tenant backend unreachable");
            GatewayError::upstream(ErrorCode::BackendUnavailable, None, &e.to_string(), 400)
        })?;

        tracing::info!(status = response.status.as_u16(), "Tenant creation relayed");
        Ok(response)
    }
}
