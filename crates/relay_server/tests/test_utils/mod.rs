//! Test utilities for relay tests.
//!
//! Provides a scripted generator double and request helpers.

#![allow(dead_code)]

use async_trait::async_trait;
use relay_core::{ApiKey, GenerationRequest, RelayRequest};
use relay_error::{GeminiError, GeminiErrorKind};
use relay_interface::TextGenerator;
use relay_server::{FallbackPolicy, PromptRelay, RelayConfig};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Credential used across relay tests.
pub const TEST_KEY: &str = "test-key-abc123";

/// One scripted outcome.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return this text
    Text(String),
    /// Fail with this error
    Fail(GeminiErrorKind),
}

/// Generator double that replays scripted responses in order and records
/// every request it sees.
#[derive(Debug, Default)]
pub struct MockGenerator {
    script: Mutex<VecDeque<MockResponse>>,
    calls: Mutex<Vec<(String, GenerationRequest)>>,
}

impl MockGenerator {
    /// Creates a generator that replays `responses` in order.
    pub fn new(responses: Vec<MockResponse>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(responses.into()),
            calls: Mutex::new(Vec::new()),
        })
    }

    /// Creates a generator that always returns the same text once.
    pub fn text(text: &str) -> Arc<Self> {
        Self::new(vec![MockResponse::Text(text.to_string())])
    }

    /// Number of generate calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Requests received so far, in order.
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, r)| r.clone())
            .collect()
    }

    /// Models requested so far, in order.
    pub fn models(&self) -> Vec<String> {
        self.requests()
            .iter()
            .map(|r| r.config().model().clone())
            .collect()
    }

    /// Credentials received so far, in order.
    pub fn credentials(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(k, _)| k.clone())
            .collect()
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(
        &self,
        credential: &ApiKey,
        request: &GenerationRequest,
    ) -> Result<String, GeminiError> {
        self.calls
            .lock()
            .unwrap()
            .push((credential.expose().to_string(), request.clone()));

        match self.script.lock().unwrap().pop_front() {
            Some(MockResponse::Text(text)) => Ok(text),
            Some(MockResponse::Fail(kind)) => Err(GeminiError::new(kind)),
            None => Err(GeminiError::new(GeminiErrorKind::Transport(
                "mock script exhausted".to_string(),
            ))),
        }
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// Relay configuration with the test key and the given output format.
pub fn test_config(output_format: relay_core::OutputFormat) -> RelayConfig {
    RelayConfig::builder()
        .api_key(ApiKey::new(TEST_KEY))
        .policy(FallbackPolicy::primary_with_fallback("primary-model", "fallback-model"))
        .output_format(output_format)
        .build()
        .expect("Failed to build test relay config")
}

/// Relay around `generator` with the test key and text output.
pub fn test_relay(generator: Arc<MockGenerator>) -> PromptRelay<Arc<MockGenerator>> {
    PromptRelay::new(generator, test_config(relay_core::OutputFormat::Text))
}

/// POST request carrying a prompt pair.
pub fn prompt_request(system: &str, user: &str) -> RelayRequest {
    let body = serde_json::json!({ "systemPrompt": system, "userPrompt": user });
    RelayRequest::post(body.to_string())
}

/// Parses the `error` field out of an error response body.
pub fn error_message(body: &str) -> String {
    let value: serde_json::Value =
        serde_json::from_str(body).expect("Error body should be valid JSON");
    value["error"]
        .as_str()
        .expect("Error body should carry an error string")
        .to_string()
}
