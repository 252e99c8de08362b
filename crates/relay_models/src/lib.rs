//! Generation backends for the prompt relay.
//!
//! Currently one backend: the Gemini `generateContent` REST API.

mod gemini;

pub use gemini::{
    Candidate, Content, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, GeminiClient, GeminiClientConfig,
    GeminiClientConfigBuilder, GenerateContentRequest, GenerateContentResponse,
    GoogleErrorBody, GoogleErrorEnvelope, Part, PromptFeedback, ResponseFormatConfig,
};
