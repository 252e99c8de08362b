//! Prompt relay handler and HTTP host.
//!
//! [`PromptRelay`] turns one inbound request into one outbound response:
//! method gate, credential check, body validation, instruction assembly,
//! model invocation with fallback, and output sanitization. [`create_router`]
//! mounts it on an axum router; [`RelaySettings`] loads its configuration.

mod relay;
mod router;
mod settings;

pub use relay::{
    DEFAULT_FALLBACK_MODEL, DEFAULT_PRIMARY_MODEL, FallbackPolicy, PromptRelay, RelayConfig,
    RelayConfigBuilder,
};
pub use router::{FUNCTION_PATH, MAX_BODY_BYTES, create_router, into_http_response};
pub use settings::{DEFAULT_BIND_ADDRESS, RelaySettings};
