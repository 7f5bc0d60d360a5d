//! Mock backend client for testing.
//!
//! Responses are scripted per `(method, path)` or queued in order; every
//! request is recorded so tests can assert on call counts and headers.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use http::{header, HeaderMap, Method, StatusCode};
use serde_json::Value;

use crate::ports::{BackendClient, UpstreamError, UpstreamRequest, UpstreamResponse};

/// Mock backend.
///
/// # Example
///
/// ```ignore
/// let backend = MockBackendClient::new();
/// backend.respond_json(Method::POST, "/api/v1/auth/login", 200, json!({"access_token": "a"}));
/// backend.push_response(Method::GET, "/api/v1/projects", 401, json!({}));
/// ```
#[derive(Default, Clone)]
pub struct MockBackendClient {
    inner: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    /// Sticky responses, used when no queued response is left.
    responses: HashMap<(Method, String), UpstreamResponse>,

    /// One-shot outcomes consumed in order.
    queued: HashMap<(Method, String), VecDeque<Result<UpstreamResponse, UpstreamError>>>,

    /// Error to return on the next call.
    next_error: Option<UpstreamError>,

    /// Every request received.
    call_log: Vec<RecordedRequest>,
}

/// A request seen by the mock.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl RecordedRequest {
    pub fn json(&self) -> Option<Value> {
        serde_json::from_slice(&self.body).ok()
    }

    pub fn authorization(&self) -> Option<&str> {
        self.headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
    }
}

fn json_response(status: u16, body: &Value) -> UpstreamResponse {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut response = UpstreamResponse::new(status, body.to_string());
    response.headers.insert(
        header::CONTENT_TYPE,
        header::HeaderValue::from_static("application/json"),
    );
    response
}

fn split_path(path_and_query: &str) -> (String, Option<String>) {
    match path_and_query.split_once('?') {
        Some((path, query)) => (path.to_string(), Some(query.to_string())),
        None => (path_and_query.to_string(), None),
    }
}

impl MockBackendClient {
    pub fn new() -> Self {
        Self::default()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Configuration Methods
    // ════════════════════════════════════════════════════════════════════════════

    /// Always answer `(method, path)` with this JSON.
    pub fn respond_json(&self, method: Method, path: &str, status: u16, body: Value) {
        self.respond(method, path, json_response(status, &body));
    }

    /// Always answer `(method, path)` with this response.
    pub fn respond(&self, method: Method, path: &str, response: UpstreamResponse) {
        self.inner
            .lock()
            .unwrap()
            .responses
            .insert((method, path.to_string()), response);
    }

    /// Answer the next call to `(method, path)` with this JSON, then fall back.
    pub fn push_response(&self, method: Method, path: &str, status: u16, body: Value) {
        self.inner
            .lock()
            .unwrap()
            .queued
            .entry((method, path.to_string()))
            .or_default()
            .push_back(Ok(json_response(status, &body)));
    }

    /// Fail the next call to `(method, path)` with a transport error.
    pub fn push_error(&self, method: Method, path: &str, error: UpstreamError) {
        self.inner
            .lock()
            .unwrap()
            .queued
            .entry((method, path.to_string()))
            .or_default()
            .push_back(Err(error));
    }

    /// Fail the next call with a transport error.
    pub fn set_error(&self, error: UpstreamError) {
        self.inner.lock().unwrap().next_error = Some(error);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Call Tracking
    // ════════════════════════════════════════════════════════════════════════════

    pub fn calls(&self) -> Vec<RecordedRequest> {
        self.inner.lock().unwrap().call_log.clone()
    }

    pub fn calls_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.calls().into_iter().filter(|c| c.path == path).collect()
    }

    pub fn call_count(&self, path: &str) -> usize {
        self.calls_to(path).len()
    }

    pub fn total_calls(&self) -> usize {
        self.inner.lock().unwrap().call_log.len()
    }
}

#[async_trait]
impl BackendClient for MockBackendClient {
    async fn send(&self, request: UpstreamRequest) -> Result<UpstreamResponse, UpstreamError> {
        let (path, query) = split_path(&request.path_and_query);
        let mut state = self.inner.lock().unwrap();

        state.call_log.push(RecordedRequest {
            method: request.method.clone(),
            path: path.clone(),
            query,
            headers: request.headers.clone(),
            body: request.body.clone(),
        });

        if let Some(error) = state.next_error.take() {
            return Err(error);
        }

        let key = (request.method, path);
        if let Some(outcome) = state.queued.get_mut(&key).and_then(VecDeque::pop_front) {
            return outcome;
        }
        Ok(state
            .responses
            .get(&key)
            .cloned()
            .unwrap_or_else(|| UpstreamResponse::new(StatusCode::NOT_FOUND, "not found")))
    }
}
