//! Errors from a single call to the Gemini generation API.

/// Gemini-specific error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GeminiErrorKind {
    /// Failed to build the HTTP client
    ClientCreation(String),
    /// Network or transport failure before a response arrived
    Transport(String),
    /// The request exceeded the configured timeout
    Timeout,
    /// The API answered with a non-success status
    Api {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API envelope, or the raw body
        message: String,
    },
    /// The prompt was blocked before generation
    Blocked(String),
    /// A candidate came back without any text
    EmptyResponse(String),
    /// The response body could not be decoded
    ResponseParsing(String),
}

impl std::fmt::Display for GeminiErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeminiErrorKind::ClientCreation(msg) => {
                write!(f, "Failed to create Gemini client: {}", msg)
            }
            GeminiErrorKind::Transport(msg) => write!(f, "Gemini request failed: {}", msg),
            GeminiErrorKind::Timeout => write!(f, "Gemini request timed out"),
            GeminiErrorKind::Api {
                status_code,
                message,
            } => write!(f, "HTTP {} error: {}", status_code, message),
            GeminiErrorKind::Blocked(reason) => write!(f, "Prompt blocked: {}", reason),
            GeminiErrorKind::EmptyResponse(reason) => {
                write!(f, "Model returned no text (finish reason: {})", reason)
            }
            GeminiErrorKind::ResponseParsing(msg) => {
                write!(f, "Failed to parse Gemini response: {}", msg)
            }
        }
    }
}

impl GeminiErrorKind {
    /// HTTP status returned by the API, if the failure came from one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            GeminiErrorKind::Api { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }

    /// True when the API refused the request shape itself (HTTP 400).
    ///
    /// Some model versions answer 400 when asked for `application/json`
    /// output; the relay downgrades to plain text on this signal.
    pub fn is_format_rejection(&self) -> bool {
        self.status_code() == Some(400)
    }
}

/// Gemini error with source location tracking.
///
/// # Examples
///
/// ```
/// use relay_error::{GeminiError, GeminiErrorKind};
///
/// let err = GeminiError::new(GeminiErrorKind::Api {
///     status_code: 404,
///     message: "models/gemini-9 is not found".to_string(),
/// });
/// assert!(format!("{}", err).contains("HTTP 404"));
/// assert!(!err.kind.is_format_rejection());
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Gemini Error: {} at line {} in {}", kind, line, file)]
pub struct GeminiError {
    /// The kind of error that occurred
    pub kind: GeminiErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl GeminiError {
    /// Create a new GeminiError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: GeminiErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
