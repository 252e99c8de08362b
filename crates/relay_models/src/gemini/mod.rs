//! Google Gemini REST client.
//!
//! Talks to `models/{model}:generateContent` directly over reqwest so that
//! safety settings and the response MIME type hint go on the wire exactly as
//! configured.

mod client;
mod dto;

pub use client::{
    DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, GeminiClient, GeminiClientConfig,
    GeminiClientConfigBuilder,
};
pub use dto::{
    Candidate, Content, GenerateContentRequest, GenerateContentResponse, GoogleErrorBody,
    GoogleErrorEnvelope, Part, PromptFeedback, ResponseFormatConfig,
};
