//! Generation request and per-call configuration.

use crate::SafetyThresholds;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Output format requested from the model.
///
/// `Json` asks the API for `application/json` output. Not every model version
/// accepts that hint, so `Text` with manual fence stripping is the default.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum OutputFormat {
    /// Unstructured text, cleaned up after the call
    #[default]
    Text,
    /// Strict JSON via the response MIME type hint
    Json,
}

impl OutputFormat {
    /// MIME type to send as the response format hint, if any.
    pub fn mime_type(&self) -> Option<&'static str> {
        match self {
            OutputFormat::Text => None,
            OutputFormat::Json => Some("application/json"),
        }
    }
}

/// Configuration bundle for one model invocation.
///
/// # Examples
///
/// ```
/// use relay_core::{GenerationConfig, OutputFormat};
///
/// let config = GenerationConfig::builder()
///     .model("gemini-2.5-flash")
///     .build()
///     .unwrap();
/// assert_eq!(config.model(), "gemini-2.5-flash");
/// assert_eq!(*config.output_format(), OutputFormat::Text);
/// assert_eq!(config.safety().settings().len(), 4);
/// ```
#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, derive_builder::Builder,
)]
#[builder(setter(into))]
pub struct GenerationConfig {
    /// Model identifier, e.g. `gemini-2.5-flash`
    model: String,
    /// Content-safety thresholds
    #[builder(default)]
    safety: SafetyThresholds,
    /// Requested output format
    #[builder(default)]
    output_format: OutputFormat,
}

impl GenerationConfig {
    /// Creates a configuration with every field given.
    pub fn new(
        model: impl Into<String>,
        safety: SafetyThresholds,
        output_format: OutputFormat,
    ) -> Self {
        Self {
            model: model.into(),
            safety,
            output_format,
        }
    }

    /// Returns a builder for constructing a GenerationConfig.
    pub fn builder() -> GenerationConfigBuilder {
        GenerationConfigBuilder::default()
    }

    /// Same configuration with a different output format.
    pub fn with_output_format(&self, output_format: OutputFormat) -> Self {
        Self {
            output_format,
            ..self.clone()
        }
    }
}

/// An instruction paired with the configuration to run it under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct GenerationRequest {
    /// Combined system + user instruction
    instruction: String,
    /// Model, safety and format settings
    config: GenerationConfig,
}

impl GenerationRequest {
    /// Creates a new generation request.
    pub fn new(instruction: impl Into<String>, config: GenerationConfig) -> Self {
        Self {
            instruction: instruction.into(),
            config,
        }
    }
}
