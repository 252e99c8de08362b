//! The prompt relay: one request in, one response out.

use derive_getters::Getters;
use relay_core::{
    ApiKey, GenerationConfig, GenerationRequest, OutputFormat, PromptPair, RelayRequest,
    RelayResponse, SafetyThresholds, increment_counter, sanitize_output,
};
use relay_error::{
    ConfigError, GeminiError, GenerationError, MethodNotAllowedError, RelayError, RelayErrorKind,
    RelayResult, ValidationError,
};
use relay_interface::TextGenerator;
use tracing::{debug, error, info, instrument, warn};

/// Model tried first.
pub const DEFAULT_PRIMARY_MODEL: &str = "gemini-2.5-flash";

/// Model tried when the primary fails.
pub const DEFAULT_FALLBACK_MODEL: &str = "gemini-2.0-flash";

/// Ordered models to try, capped at `max_attempts`.
///
/// # Examples
///
/// ```
/// use relay_server::FallbackPolicy;
///
/// let policy = FallbackPolicy::new(vec!["a".into(), "b".into(), "c".into()], 2);
/// assert_eq!(policy.attempts().collect::<Vec<_>>(), vec!["a", "b"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Getters)]
pub struct FallbackPolicy {
    /// Model identifiers in the order they are tried
    models: Vec<String>,
    /// Upper bound on invocations per request
    max_attempts: usize,
}

impl FallbackPolicy {
    /// Creates a policy from an ordered model list.
    pub fn new(models: Vec<String>, max_attempts: usize) -> Self {
        Self {
            models,
            max_attempts,
        }
    }

    /// A primary model and one fallback: exactly two attempts.
    pub fn primary_with_fallback(primary: impl Into<String>, fallback: impl Into<String>) -> Self {
        Self::new(vec![primary.into(), fallback.into()], 2)
    }

    /// Models that will actually be tried, in order.
    pub fn attempts(&self) -> impl Iterator<Item = &str> {
        self.models
            .iter()
            .map(String::as_str)
            .filter(|m| !m.trim().is_empty())
            .take(self.max_attempts)
    }
}

impl Default for FallbackPolicy {
    fn default() -> Self {
        Self::primary_with_fallback(DEFAULT_PRIMARY_MODEL, DEFAULT_FALLBACK_MODEL)
    }
}

/// Everything the relay needs besides the generator.
///
/// The credential is injected here rather than read from the environment
/// inside the relay.
#[derive(Debug, Clone, Default, Getters, derive_builder::Builder)]
#[builder(setter(into))]
pub struct RelayConfig {
    /// Credential for the generation service
    #[builder(default)]
    api_key: Option<ApiKey>,
    /// Primary/fallback model chain
    #[builder(default)]
    policy: FallbackPolicy,
    /// Requested output format
    #[builder(default)]
    output_format: OutputFormat,
    /// Safety thresholds sent with every call
    #[builder(default)]
    safety: SafetyThresholds,
}

impl RelayConfig {
    /// Creates a configuration with every field given.
    pub fn new(
        api_key: Option<ApiKey>,
        policy: FallbackPolicy,
        output_format: OutputFormat,
        safety: SafetyThresholds,
    ) -> Self {
        Self {
            api_key,
            policy,
            output_format,
            safety,
        }
    }

    /// Returns a builder for constructing a RelayConfig.
    pub fn builder() -> RelayConfigBuilder {
        RelayConfigBuilder::default()
    }
}

/// Forwards a prompt pair to a [`TextGenerator`] and shapes the reply.
pub struct PromptRelay<G> {
    generator: G,
    config: RelayConfig,
}

impl<G> PromptRelay<G>
where
    G: TextGenerator,
{
    /// Creates a relay around a generator.
    pub fn new(generator: G, config: RelayConfig) -> Self {
        Self { generator, config }
    }

    /// The relay's configuration.
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    /// The wrapped generator.
    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Handles one request. Never fails: every error becomes a response.
    #[instrument(
        skip(self, request),
        fields(method = %request.method, provider = self.generator.provider_name())
    )]
    pub async fn handle(&self, request: RelayRequest) -> RelayResponse {
        increment_counter("relay_requests", None);

        match self.process(&request).await {
            Ok(body) => {
                info!(response_len = body.len(), "Relay request succeeded");
                RelayResponse::json(200, body)
            }
            Err(err) => self.error_response(err),
        }
    }

    /// Handles one serialized function event (`{"httpMethod", "body"}`).
    ///
    /// An event that does not decode still yields an error envelope.
    #[instrument(skip_all, fields(event_len = raw.len()))]
    pub async fn handle_event(&self, raw: &str) -> RelayResponse {
        match serde_json::from_str::<RelayRequest>(raw) {
            Ok(request) => self.handle(request).await,
            Err(e) => {
                let err = ValidationError::new(format!("malformed function event: {}", e));
                self.reject(err.into())
            }
        }
    }

    /// Turns an error raised outside [`handle`](Self::handle), such as a body
    /// the host could not read, into the same response shape.
    pub fn reject(&self, err: RelayError) -> RelayResponse {
        increment_counter("relay_requests", None);
        self.error_response(err)
    }

    async fn process(&self, request: &RelayRequest) -> RelayResult<String> {
        if !request.is_allowed_method() {
            return Err(MethodNotAllowedError::new(request.method.trim()).into());
        }

        let credential = self
            .config
            .api_key
            .as_ref()
            .ok_or_else(|| ConfigError::missing_api_key())?;

        let prompts = PromptPair::from_body(request.body.as_deref())?;
        let instruction = prompts.instruction();
        debug!(
            system_len = prompts.system_prompt().len(),
            user_len = prompts.user_prompt().len(),
            "Assembled instruction"
        );

        let raw = self.generate_with_fallback(credential, &instruction).await?;
        Ok(sanitize_output(&raw))
    }

    /// Tries each model of the policy in order until one returns text.
    async fn generate_with_fallback(
        &self,
        credential: &ApiKey,
        instruction: &str,
    ) -> RelayResult<String> {
        let models: Vec<&str> = self.config.policy.attempts().collect();
        let mut failures: Vec<GeminiError> = Vec::new();

        for (attempt, &model) in models.iter().enumerate() {
            if attempt > 0 {
                increment_counter("relay_fallbacks", Some(model));
                info!(model, attempt, "Falling back to next model");
            }

            match self.invoke_model(credential, instruction, model).await {
                Ok(text) => {
                    debug!(model, attempt, raw_len = text.len(), "Model returned text");
                    return Ok(text);
                }
                Err(e) => {
                    warn!(
                        model,
                        attempt,
                        error = %self.redact(&e.to_string()),
                        "Model invocation failed"
                    );
                    failures.push(e);
                }
            }
        }

        match failures.pop() {
            Some(last) => Err(GenerationError::new(
                models.into_iter().map(String::from).collect(),
                last,
            )
            .into()),
            None => Err(ConfigError::new("no models configured for generation").into()),
        }
    }

    /// One model invocation, downgrading from JSON to text output if the
    /// model refuses the format hint.
    async fn invoke_model(
        &self,
        credential: &ApiKey,
        instruction: &str,
        model: &str,
    ) -> Result<String, GeminiError> {
        let config = GenerationConfig::new(
            model,
            self.config.safety.clone(),
            self.config.output_format,
        );
        let request = GenerationRequest::new(instruction, config);

        match self.generator.generate(credential, &request).await {
            Err(e)
                if self.config.output_format == OutputFormat::Json
                    && e.kind.is_format_rejection() =>
            {
                warn!(model, "Model rejected JSON output format, retrying as plain text");
                let downgraded = GenerationRequest::new(
                    instruction,
                    request.config().with_output_format(OutputFormat::Text),
                );
                self.generator.generate(credential, &downgraded).await
            }
            other => other,
        }
    }

    fn error_response(&self, err: RelayError) -> RelayResponse {
        if let RelayErrorKind::MethodNotAllowed(e) = err.kind() {
            debug!(method = %e.method, "Rejected non-POST request");
            return RelayResponse::method_not_allowed();
        }

        error!(error = %self.redact(&err.to_string()), "Relay request failed");
        increment_counter("relay_failures", None);
        RelayResponse::error(err.status_code(), self.redact(&err.client_message()))
    }

    fn redact(&self, text: &str) -> String {
        match &self.config.api_key {
            Some(key) => key.redact(text),
            None => text.to_string(),
        }
    }
}
