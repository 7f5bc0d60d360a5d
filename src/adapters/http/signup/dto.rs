//! HTTP DTOs for demo and onboarding endpoints.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::adapters::http::checkout::lenient_u32;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StartDemoRequest {
    pub email: String,
    pub company: String,
    pub trial_days: Option<Value>,
    pub turnstile_token: Option<String>,
}

impl StartDemoRequest {
    pub fn trial_days(&self) -> Option<u32> {
        self.trial_days
            .as_ref()
            .and_then(lenient_u32)
            .filter(|days| *days > 0)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StartDemoResponse {
    pub ok: bool,
    pub mode: &'static str,
    pub data: Value,
}

#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct SetPasswordRequest {
    pub token: String,
    pub password: String,
}
