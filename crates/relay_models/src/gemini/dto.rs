//! Wire types for the Gemini `generateContent` endpoint.

use derive_getters::Getters;
use relay_core::{GenerationRequest, SafetyThresholds};
use relay_error::{GeminiError, GeminiErrorKind};
use serde::{Deserialize, Serialize};

/// A piece of content; only text parts are used by the relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    /// Text of this part
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// A turn of content with its role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    /// "user" or "model"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Content parts
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    /// A single-part user turn.
    pub fn user_text(text: impl Into<String>) -> Self {
        Self {
            role: Some("user".to_string()),
            parts: vec![Part {
                text: Some(text.into()),
            }],
        }
    }
}

/// The subset of `generationConfig` the relay sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseFormatConfig {
    /// e.g. `application/json`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
}

/// Request body for `models/{model}:generateContent`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// Conversation turns
    contents: Vec<Content>,
    /// Per-category safety thresholds
    safety_settings: SafetyThresholds,
    /// Output format hint, omitted for plain text
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<ResponseFormatConfig>,
}

impl From<&GenerationRequest> for GenerateContentRequest {
    fn from(req: &GenerationRequest) -> Self {
        let generation_config = req
            .config()
            .output_format()
            .mime_type()
            .map(|mime| ResponseFormatConfig {
                response_mime_type: Some(mime.to_string()),
            });

        Self {
            contents: vec![Content::user_text(req.instruction().clone())],
            safety_settings: req.config().safety().clone(),
            generation_config,
        }
    }
}

/// A generated candidate.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Generated content
    #[serde(default)]
    pub content: Option<Content>,
    /// Why generation stopped, e.g. `STOP` or `SAFETY`
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Feedback on the prompt itself.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    /// Set when the prompt was blocked
    #[serde(default)]
    pub block_reason: Option<String>,
}

/// Response body from `generateContent`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// Candidates, usually one
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    /// Present when the prompt was filtered
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate.
    ///
    /// # Errors
    ///
    /// `Blocked` when there is no candidate, `EmptyResponse` when the first
    /// candidate carries no text.
    pub fn into_text(self) -> Result<String, GeminiError> {
        let Some(candidate) = self.candidates.into_iter().next() else {
            let reason = self
                .prompt_feedback
                .and_then(|f| f.block_reason)
                .unwrap_or_else(|| "no candidates returned".to_string());
            return Err(GeminiError::new(GeminiErrorKind::Blocked(reason)));
        };

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.is_empty() {
            let reason = candidate
                .finish_reason
                .unwrap_or_else(|| "UNSPECIFIED".to_string());
            return Err(GeminiError::new(GeminiErrorKind::EmptyResponse(reason)));
        }

        Ok(text)
    }
}

/// Google API error envelope: `{"error": {"code", "message", "status"}}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GoogleErrorEnvelope {
    /// Error details
    pub error: GoogleErrorBody,
}

/// Body of a Google API error.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GoogleErrorBody {
    /// HTTP status code
    #[serde(default)]
    pub code: Option<u16>,
    /// Human-readable message
    #[serde(default)]
    pub message: String,
    /// Canonical status, e.g. `NOT_FOUND`
    #[serde(default)]
    pub status: Option<String>,
}

impl GoogleErrorEnvelope {
    /// Extracts a readable message from an error body, falling back to the raw text.
    pub fn message_from_body(body: &str) -> String {
        match serde_json::from_str::<GoogleErrorEnvelope>(body) {
            Ok(envelope) if !envelope.error.message.is_empty() => match envelope.error.status {
                Some(status) => format!("{} ({})", envelope.error.message, status),
                None => envelope.error.message,
            },
            _ => body.trim().to_string(),
        }
    }
}
