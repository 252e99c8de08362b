//! Core data types for the prompt relay.
//!
//! This crate holds the request-scoped values that flow through one relay
//! call: the inbound and outbound envelopes, the prompt pair, the generation
//! configuration sent to the model, and the output sanitizer.

mod credential;
mod envelope;
mod generation;
mod observability;
mod prompt;
mod safety;
mod sanitize;

pub use credential::{ApiKey, REDACTED};
pub use envelope::{RelayRequest, RelayResponse};
pub use generation::{
    GenerationConfig, GenerationConfigBuilder, GenerationRequest, OutputFormat,
};
pub use observability::{
    LogFormat, increment_counter, init_observability, init_tracing, shutdown_observability,
};
pub use prompt::{PromptPair, USER_INPUT_SEPARATOR};
pub use safety::{HarmBlockThreshold, HarmCategory, SafetySetting, SafetyThresholds};
pub use sanitize::sanitize_output;
