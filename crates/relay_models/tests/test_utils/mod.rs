//! Local stand-in for the Gemini API.
//!
//! Serves `POST /models/{model}:generateContent` on an ephemeral port and
//! records every call so tests can inspect headers and bodies.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};

/// A request the stub received.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub model: String,
    pub api_key: Option<String>,
    pub body: Value,
}

/// Calls recorded by the stub.
pub type CallLog = Arc<Mutex<Vec<RecordedCall>>>;

/// Starts the stub and returns its base URL and call log.
///
/// Behavior is keyed on the model name:
/// - `missing-model` answers 404 with a Google error envelope
/// - `blocked-model` answers 200 with a blocked prompt
/// - `json-averse` answers 400 when asked for JSON output, text otherwise
/// - `slow-model` sleeps for two seconds before answering
/// - anything else answers with a fenced JSON candidate
pub async fn spawn_stub() -> anyhow::Result<(String, CallLog)> {
    let calls: CallLog = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/models/:call", post(generate_content))
        .with_state(calls.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok((format!("http://{}", addr), calls))
}

async fn generate_content(
    State(calls): State<CallLog>,
    Path(call): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    let model = call
        .strip_suffix(":generateContent")
        .unwrap_or(&call)
        .to_string();
    let api_key = headers
        .get("x-goog-api-key")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let wants_json = body["generationConfig"]["responseMimeType"] == "application/json";

    calls.lock().unwrap().push(RecordedCall {
        model: model.clone(),
        api_key,
        body,
    });

    match model.as_str() {
        "missing-model" => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": {
                    "code": 404,
                    "message": "models/missing-model is not found for API version v1beta",
                    "status": "NOT_FOUND"
                }
            })),
        ),
        "blocked-model" => (
            StatusCode::OK,
            Json(json!({ "promptFeedback": { "blockReason": "OTHER" } })),
        ),
        "json-averse" if wants_json => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": {
                    "code": 400,
                    "message": "JSON mode is not enabled for this model",
                    "status": "INVALID_ARGUMENT"
                }
            })),
        ),
        "slow-model" => {
            tokio::time::sleep(std::time::Duration::from_secs(2)).await;
            (StatusCode::OK, Json(candidate("{}")))
        }
        _ => (StatusCode::OK, Json(candidate("```json\n{\"ok\":true}\n```"))),
    }
}

fn candidate(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
}
