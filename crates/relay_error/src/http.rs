//! HTTP method gate errors.

/// The inbound request used a method other than POST.
#[derive(Debug, Clone)]
pub struct MethodNotAllowedError {
    /// The method the caller sent
    pub method: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl MethodNotAllowedError {
    /// Create a new MethodNotAllowedError for the given method at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use relay_error::MethodNotAllowedError;
    ///
    /// let err = MethodNotAllowedError::new("GET");
    /// assert_eq!(err.method, "GET");
    /// ```
    #[track_caller]
    pub fn new(method: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            method: method.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}

impl std::fmt::Display for MethodNotAllowedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Method Not Allowed: {} at line {} in {}",
            self.method, self.line, self.file
        )
    }
}

impl std::error::Error for MethodNotAllowedError {}
