//! Request body validation errors.

/// The inbound body was missing, not JSON, or lacked a required prompt field.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// What was wrong with the body
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ValidationError {
    /// Create a new ValidationError with the given message at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use relay_error::ValidationError;
    ///
    /// let err = ValidationError::new("missing field `userPrompt`");
    /// assert!(err.to_string().contains("userPrompt"));
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }

    /// The request arrived without a body, or with only whitespace.
    #[track_caller]
    pub fn empty_body() -> Self {
        Self::new("request body is empty")
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Validation Error: {} at line {} in {}",
            self.message, self.line, self.file
        )
    }
}

impl std::error::Error for ValidationError {}
