//! Trait definitions for the prompt relay.
//!
//! The relay never talks to a model directly; it calls a [`TextGenerator`].
//! Production code plugs in the Gemini client, tests plug in scripted doubles.

use async_trait::async_trait;
use relay_core::{ApiKey, GenerationRequest};
use relay_error::GeminiError;
use std::sync::Arc;

/// An external text-generation capability.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Runs one generation call and returns the model's raw text.
    ///
    /// # Errors
    ///
    /// Returns a [`GeminiError`] for transport failures, non-success API
    /// responses, blocked prompts, or empty candidates.
    async fn generate(
        &self,
        credential: &ApiKey,
        request: &GenerationRequest,
    ) -> Result<String, GeminiError>;

    /// Name of the backend, for logging.
    fn provider_name(&self) -> &'static str;
}

#[async_trait]
impl<T> TextGenerator for Arc<T>
where
    T: TextGenerator + ?Sized,
{
    async fn generate(
        &self,
        credential: &ApiKey,
        request: &GenerationRequest,
    ) -> Result<String, GeminiError> {
        (**self).generate(credential, request).await
    }

    fn provider_name(&self) -> &'static str {
        (**self).provider_name()
    }
}
