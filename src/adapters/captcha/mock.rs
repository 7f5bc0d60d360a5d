//! Mock captcha verifier for testing.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::ports::{CaptchaError, CaptchaVerifier};

/// Accepts only tokens registered with [`MockCaptchaVerifier::accept`].
#[derive(Default, Clone)]
pub struct MockCaptchaVerifier {
    inner: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    accepted: HashSet<String>,
    next_error: Option<CaptchaError>,
    /// `(token, remote_ip)` per call.
    call_log: Vec<(String, Option<String>)>,
}

impl MockCaptchaVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accept(&self, token: &str) {
        self.inner.lock().unwrap().accepted.insert(token.to_string());
    }

    pub fn set_error(&self, error: CaptchaError) {
        self.inner.lock().unwrap().next_error = Some(error);
    }

    pub fn calls(&self) -> Vec<(String, Option<String>)> {
        self.inner.lock().unwrap().call_log.clone()
    }

    pub fn call_count(&self) -> usize {
        self.inner.lock().unwrap().call_log.len()
    }
}

#[async_trait]
impl CaptchaVerifier for MockCaptchaVerifier {
    async fn verify(&self, token: &str, remote_ip: Option<&str>) -> Result<bool, CaptchaError> {
        let mut state = self.inner.lock().unwrap();
        state
            .call_log
            .push((token.to_string(), remote_ip.map(str::to_string)));
        if let Some(error) = state.next_error.take() {
            return Err(error);
        }
        Ok(state.accepted.contains(token))
    }
}
