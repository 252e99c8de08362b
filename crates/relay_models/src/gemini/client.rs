//! HTTP client for the Gemini `generateContent` endpoint.

use crate::gemini::{GenerateContentRequest, GenerateContentResponse, GoogleErrorEnvelope};
use async_trait::async_trait;
use derive_getters::Getters;
use relay_core::{ApiKey, GenerationRequest};
use relay_error::{GeminiError, GeminiErrorKind};
use relay_interface::TextGenerator;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error, instrument};

/// Public Gemini API root.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Per-request timeout applied when none is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

// Header auth keeps the key out of URLs, and so out of transport error text.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Connection settings for [`GeminiClient`].
///
/// # Examples
///
/// ```
/// use relay_models::{DEFAULT_BASE_URL, GeminiClientConfig};
///
/// let config = GeminiClientConfig::builder().timeout_secs(5u64).build().unwrap();
/// assert_eq!(config.base_url(), DEFAULT_BASE_URL);
/// assert_eq!(*config.timeout_secs(), 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Getters, derive_builder::Builder)]
#[builder(setter(into))]
pub struct GeminiClientConfig {
    /// API root, without the `/models/...` suffix
    #[builder(default = "DEFAULT_BASE_URL.to_string()")]
    base_url: String,
    /// Whole-request timeout in seconds
    #[builder(default = "DEFAULT_TIMEOUT_SECS")]
    timeout_secs: u64,
}

impl GeminiClientConfig {
    /// Creates a configuration with every field given.
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs,
        }
    }

    /// Returns a builder for constructing a GeminiClientConfig.
    pub fn builder() -> GeminiClientConfigBuilder {
        GeminiClientConfigBuilder::default()
    }
}

impl Default for GeminiClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Gemini client implementing [`TextGenerator`].
///
/// Holds no credential; the key is supplied per call by the relay.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
}

impl GeminiClient {
    /// Creates a client with the given settings.
    ///
    /// # Errors
    ///
    /// Returns `ClientCreation` if the underlying HTTP client cannot be built.
    #[instrument(
        skip(config),
        fields(base_url = %config.base_url(), timeout_secs = config.timeout_secs())
    )]
    pub fn new(config: &GeminiClientConfig) -> Result<Self, GeminiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(*config.timeout_secs()))
            .build()
            .map_err(|e| GeminiError::new(GeminiErrorKind::ClientCreation(e.to_string())))?;

        debug!("Created Gemini client");

        Ok(Self {
            client,
            base_url: config.base_url().trim_end_matches('/').to_string(),
        })
    }

    /// Endpoint URL for a model.
    pub fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model)
    }
}

fn transport_error(e: reqwest::Error) -> GeminiError {
    if e.is_timeout() {
        GeminiError::new(GeminiErrorKind::Timeout)
    } else {
        GeminiError::new(GeminiErrorKind::Transport(e.to_string()))
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    #[instrument(
        skip(self, credential, request),
        fields(
            model = %request.config().model(),
            output_format = %request.config().output_format(),
        )
    )]
    async fn generate(
        &self,
        credential: &ApiKey,
        request: &GenerationRequest,
    ) -> Result<String, GeminiError> {
        let body = GenerateContentRequest::from(request);

        debug!(
            instruction_len = request.instruction().len(),
            safety_settings = body.safety_settings().settings().len(),
            "Sending generateContent request"
        );

        let response = self
            .client
            .post(self.endpoint(request.config().model()))
            .header(API_KEY_HEADER, credential.expose())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                let e = e.without_url();
                error!(error = %e, timeout = e.is_timeout(), "Gemini HTTP request failed");
                transport_error(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let message = GoogleErrorEnvelope::message_from_body(&error_text);
            error!(status = %status, error = %message, "Gemini API error");

            return Err(GeminiError::new(GeminiErrorKind::Api {
                status_code: status.as_u16(),
                message,
            }));
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|e| {
            error!(error = %e, "Failed to parse Gemini response");
            GeminiError::new(GeminiErrorKind::ResponseParsing(e.without_url().to_string()))
        })?;

        let text = parsed.into_text()?;
        debug!(response_len = text.len(), "Received Gemini response");
        Ok(text)
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }
}
