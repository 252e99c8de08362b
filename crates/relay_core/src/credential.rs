//! API credential handling.

/// Placeholder substituted for the credential in any outgoing text.
pub const REDACTED: &str = "[REDACTED]";

/// Credential for the generation service.
///
/// `Debug` never prints the key, and [`ApiKey::redact`] scrubs it from error
/// text before that text leaves the process.
///
/// # Examples
///
/// ```
/// use relay_core::ApiKey;
///
/// let key = ApiKey::new("sk-123").unwrap();
/// assert_eq!(key.expose(), "sk-123");
/// assert!(!format!("{:?}", key).contains("sk-123"));
/// assert!(ApiKey::new("   ").is_none());
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wraps a credential, returning `None` when it is blank.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// The raw key, for placing in an outbound request header.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Replaces every occurrence of the key in `text` with [`REDACTED`].
    pub fn redact(&self, text: &str) -> String {
        text.replace(&self.0, REDACTED)
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ApiKey({})", REDACTED)
    }
}
