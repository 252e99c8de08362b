//! Error raised when every model in the fallback chain has failed.

use crate::GeminiError;

/// All configured models were tried and none produced text.
#[derive(Debug, Clone)]
pub struct GenerationError {
    /// Models attempted, in order
    pub models: Vec<String>,
    /// The failure from the final attempt
    pub last: GeminiError,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl GenerationError {
    /// Create a new GenerationError at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use relay_error::{GeminiError, GeminiErrorKind, GenerationError};
    ///
    /// let last = GeminiError::new(GeminiErrorKind::Timeout);
    /// let err = GenerationError::new(vec!["a".into(), "b".into()], last);
    /// assert_eq!(err.models.len(), 2);
    /// assert!(err.cause().contains("timed out"));
    /// ```
    #[track_caller]
    pub fn new(models: Vec<String>, last: GeminiError) -> Self {
        let location = std::panic::Location::caller();
        Self {
            models,
            last,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Human-readable description of the final failure, without location.
    pub fn cause(&self) -> String {
        self.last.kind.to_string()
    }
}

impl std::fmt::Display for GenerationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Generation Error: {} model(s) failed [{}], last: {} at line {} in {}",
            self.models.len(),
            self.models.join(", "),
            self.last,
            self.line,
            self.file
        )
    }
}

impl std::error::Error for GenerationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.last)
    }
}
