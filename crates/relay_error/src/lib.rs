//! Error types for the prompt relay.
//!
//! Every error records the source location where it was created. `Display`
//! includes that location and is meant for operator logs; the text returned to
//! HTTP callers comes from [`RelayError::client_message`].

mod config;
mod gemini;
mod generation;
mod http;
mod validation;

pub use config::ConfigError;
pub use gemini::{GeminiError, GeminiErrorKind};
pub use generation::GenerationError;
pub use http::MethodNotAllowedError;
pub use validation::ValidationError;

/// Crate-level error variants.
#[derive(Debug, derive_more::From)]
pub enum RelayErrorKind {
    /// Inbound method was not POST
    MethodNotAllowed(MethodNotAllowedError),
    /// Missing credential or unusable settings
    Config(ConfigError),
    /// Missing or malformed request body
    Validation(ValidationError),
    /// Every model in the fallback chain failed
    Generation(GenerationError),
}

impl std::fmt::Display for RelayErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RelayErrorKind::MethodNotAllowed(e) => write!(f, "{}", e),
            RelayErrorKind::Config(e) => write!(f, "{}", e),
            RelayErrorKind::Validation(e) => write!(f, "{}", e),
            RelayErrorKind::Generation(e) => write!(f, "{}", e),
        }
    }
}

/// Relay error with kind discrimination.
#[derive(Debug)]
pub struct RelayError(Box<RelayErrorKind>);

impl RelayError {
    /// Create a new error from a kind.
    pub fn new(kind: RelayErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &RelayErrorKind {
        &self.0
    }

    /// HTTP status this error maps to at the handler boundary.
    ///
    /// # Examples
    ///
    /// ```
    /// use relay_error::{ConfigError, MethodNotAllowedError, RelayError};
    ///
    /// assert_eq!(RelayError::from(MethodNotAllowedError::new("GET")).status_code(), 405);
    /// assert_eq!(RelayError::from(ConfigError::missing_api_key()).status_code(), 500);
    /// ```
    pub fn status_code(&self) -> u16 {
        match self.kind() {
            RelayErrorKind::MethodNotAllowed(_) => 405,
            _ => 500,
        }
    }

    /// Caller-facing message, free of source locations.
    pub fn client_message(&self) -> String {
        match self.kind() {
            RelayErrorKind::MethodNotAllowed(_) => "Method Not Allowed".to_string(),
            RelayErrorKind::Config(e) => e.message.clone(),
            RelayErrorKind::Validation(e) => format!("Invalid request body: {}", e.message),
            RelayErrorKind::Generation(e) => format!("Failed to generate content: {}", e.cause()),
        }
    }
}

impl std::fmt::Display for RelayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Relay Error: {}", self.0)
    }
}

impl std::error::Error for RelayError {}

// Generic From implementation for any type that converts to RelayErrorKind
impl<T> From<T> for RelayError
where
    T: Into<RelayErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for relay operations.
pub type RelayResult<T> = std::result::Result<T, RelayError>;
