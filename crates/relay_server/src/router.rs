//! axum adapter for the relay.

use crate::PromptRelay;
use axum::{
    Json, Router,
    body::Bytes,
    extract::{DefaultBodyLimit, State, rejection::BytesRejection},
    http::{HeaderName, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get},
};
use relay_core::{RelayRequest, RelayResponse};
use relay_error::ValidationError;
use relay_interface::TextGenerator;
use serde_json::json;
use std::sync::Arc;
use tracing::{instrument, warn};

/// Path serverless hosts conventionally mount the function on.
pub const FUNCTION_PATH: &str = "/.netlify/functions/generate";

/// Largest request body the host buffers, in bytes.
pub const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Creates the router.
///
/// Every method is routed to the relay so that its own method gate, not the
/// router, produces the 405.
pub fn create_router<G>(relay: Arc<PromptRelay<G>>) -> Router
where
    G: TextGenerator + 'static,
{
    Router::new()
        .route("/", any(relay_handler::<G>))
        .route(FUNCTION_PATH, any(relay_handler::<G>))
        .route("/health", get(health_check))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(relay)
}

/// Health check endpoint.
#[instrument(skip_all)]
async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

async fn relay_handler<G>(
    State(relay): State<Arc<PromptRelay<G>>>,
    method: Method,
    body: Result<Bytes, BytesRejection>,
) -> Response
where
    G: TextGenerator + 'static,
{
    let body = match body {
        Ok(body) if body.is_empty() => None,
        Ok(body) => Some(String::from_utf8_lossy(&body).into_owned()),
        // The method gate still wins over an unreadable body
        Err(_) if method != Method::POST => None,
        Err(rejection) => {
            warn!(status = %rejection.status(), "Request body rejected by host");
            let err = ValidationError::new(rejection.body_text());
            return into_http_response(relay.reject(err.into()));
        }
    };

    let response = relay.handle(RelayRequest::new(method.as_str(), body)).await;
    into_http_response(response)
}

/// Converts a relay response into an HTTP response.
pub fn into_http_response(relay_response: RelayResponse) -> Response {
    let status = StatusCode::from_u16(relay_response.status_code)
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut response = (status, relay_response.body).into_response();

    for (name, value) in &relay_response.headers {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                response.headers_mut().insert(name, value);
            }
            _ => warn!(header = %name, "Dropping header that is not valid HTTP"),
        }
    }

    response
}
