//! The prompt pair carried in the request body.

use derive_getters::Getters;
use relay_error::ValidationError;
use serde::{Deserialize, Serialize};

/// Marker placed between the system and user portions of the instruction.
pub const USER_INPUT_SEPARATOR: &str = "\n\nUSER INPUT:\n";

/// System and user prompts decoded from `{"systemPrompt", "userPrompt"}`.
///
/// # Examples
///
/// ```
/// use relay_core::PromptPair;
///
/// let pair = PromptPair::from_body(Some(r#"{"systemPrompt":"Be terse.","userPrompt":"hi"}"#))
///     .unwrap();
/// assert_eq!(pair.instruction(), "Be terse.\n\nUSER INPUT:\nhi");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct PromptPair {
    /// Instructions for the model
    system_prompt: String,
    /// Input the instructions apply to
    user_prompt: String,
}

impl PromptPair {
    /// Creates a prompt pair.
    pub fn new(system_prompt: impl Into<String>, user_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            user_prompt: user_prompt.into(),
        }
    }

    /// Decodes a request body.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when the body is absent or blank, is not
    /// JSON, or lacks either prompt as a string.
    pub fn from_body(body: Option<&str>) -> Result<Self, ValidationError> {
        let body = body
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .ok_or_else(|| ValidationError::empty_body())?;

        serde_json::from_str(body).map_err(|e| ValidationError::new(e.to_string()))
    }

    /// Joins both prompts into the single instruction sent to the model.
    pub fn instruction(&self) -> String {
        format!(
            "{}{}{}",
            self.system_prompt, USER_INPUT_SEPARATOR, self.user_prompt
        )
    }
}
