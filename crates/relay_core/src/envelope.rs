//! Inbound and outbound HTTP envelopes.
//!
//! The shapes mirror what serverless function hosts hand to a handler and
//! expect back, so the relay can run behind one without an adapter.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The only method the relay accepts.
pub const ALLOWED_METHOD: &str = "POST";

const CONTENT_TYPE: &str = "Content-Type";
const APPLICATION_JSON: &str = "application/json";

/// An inbound request, reduced to what the relay reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayRequest {
    /// HTTP method, e.g. `POST`
    #[serde(alias = "httpMethod")]
    pub method: String,
    /// Raw JSON body, if any
    #[serde(default)]
    pub body: Option<String>,
}

impl RelayRequest {
    /// Creates a request with the given method and body.
    pub fn new(method: impl Into<String>, body: Option<String>) -> Self {
        Self {
            method: method.into(),
            body,
        }
    }

    /// Creates a POST request carrying `body`.
    pub fn post(body: impl Into<String>) -> Self {
        Self::new(ALLOWED_METHOD, Some(body.into()))
    }

    /// True if the method passes the relay's method gate.
    pub fn is_allowed_method(&self) -> bool {
        self.method.trim() == ALLOWED_METHOD
    }
}

/// An outbound response.
///
/// # Examples
///
/// ```
/// use relay_core::RelayResponse;
///
/// let resp = RelayResponse::error(500, "boom");
/// assert_eq!(resp.status_code, 500);
/// assert_eq!(resp.body, r#"{"error":"boom"}"#);
/// assert_eq!(resp.header("Content-Type"), Some("application/json"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayResponse {
    /// HTTP status code
    pub status_code: u16,
    /// Response headers
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    /// Response body
    pub body: String,
}

impl RelayResponse {
    /// A response whose body is already JSON text.
    pub fn json(status_code: u16, body: impl Into<String>) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert(CONTENT_TYPE.to_string(), APPLICATION_JSON.to_string());
        Self {
            status_code,
            headers,
            body: body.into(),
        }
    }

    /// A JSON `{"error": message}` response.
    pub fn error(status_code: u16, message: impl AsRef<str>) -> Self {
        let body = serde_json::json!({ "error": message.as_ref() }).to_string();
        Self::json(status_code, body)
    }

    /// Plain-text 405 for anything other than POST.
    pub fn method_not_allowed() -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("Allow".to_string(), ALLOWED_METHOD.to_string());
        Self {
            status_code: 405,
            headers,
            body: "Method Not Allowed".to_string(),
        }
    }

    /// Looks up a header by exact name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }
}
