//! Behavior of the relay handler against a scripted generator.

mod test_utils;

use relay_core::{HarmBlockThreshold, OutputFormat, RelayRequest, USER_INPUT_SEPARATOR};
use relay_error::GeminiErrorKind;
use relay_server::{PromptRelay, RelayConfig};
use test_utils::{
    MockGenerator, MockResponse, TEST_KEY, error_message, prompt_request, test_config, test_relay,
};

fn api_error(status_code: u16, message: &str) -> MockResponse {
    MockResponse::Fail(GeminiErrorKind::Api {
        status_code,
        message: message.to_string(),
    })
}

#[tokio::test]
async fn test_non_post_methods_get_405_without_calling_model() {
    let generator = MockGenerator::text("{}");
    let relay = test_relay(generator.clone());

    for method in ["GET", "PUT", "DELETE", "OPTIONS", "post"] {
        let response = relay
            .handle(RelayRequest::new(method, Some("{}".to_string())))
            .await;
        assert_eq!(response.status_code, 405, "method {}", method);
        assert_eq!(response.body, "Method Not Allowed");
        assert_eq!(response.header("Content-Type"), None);
    }

    assert_eq!(generator.call_count(), 0);
}

#[tokio::test]
async fn test_missing_api_key_is_configuration_error() {
    let generator = MockGenerator::text("{}");
    let relay = PromptRelay::new(generator.clone(), RelayConfig::default());

    let response = relay.handle(prompt_request("sys", "user")).await;

    assert_eq!(response.status_code, 500);
    assert_eq!(
        error_message(&response.body),
        "Server Configuration Error: API Key missing"
    );
    assert_eq!(response.header("Content-Type"), Some("application/json"));
    assert_eq!(generator.call_count(), 0);
}

#[tokio::test]
async fn test_missing_api_key_checked_before_body() {
    let generator = MockGenerator::text("{}");
    let relay = PromptRelay::new(generator.clone(), RelayConfig::default());

    let response = relay.handle(RelayRequest::post("not json at all")).await;

    assert_eq!(response.status_code, 500);
    assert_eq!(
        error_message(&response.body),
        "Server Configuration Error: API Key missing"
    );
}

#[tokio::test]
async fn test_invalid_body_is_500_json_error() {
    let generator = MockGenerator::text("{}");
    let relay = test_relay(generator.clone());

    for body in [None, Some("not json"), Some(r#"{"systemPrompt":"only"}"#)] {
        let response = relay
            .handle(RelayRequest::new("POST", body.map(String::from)))
            .await;
        assert_eq!(response.status_code, 500);
        let message = error_message(&response.body);
        assert!(
            message.starts_with("Invalid request body"),
            "unexpected message: {}",
            message
        );
    }

    assert_eq!(generator.call_count(), 0);
}

#[tokio::test]
async fn test_primary_success_skips_fallback() {
    let generator = MockGenerator::new(vec![
        MockResponse::Text(r#"{"answer":42}"#.to_string()),
        MockResponse::Text("unused".to_string()),
    ]);
    let relay = test_relay(generator.clone());

    let response = relay.handle(prompt_request("sys", "user")).await;

    assert_eq!(response.status_code, 200);
    assert_eq!(response.body, r#"{"answer":42}"#);
    assert_eq!(response.header("Content-Type"), Some("application/json"));
    assert_eq!(generator.models(), vec!["primary-model"]);
}

#[tokio::test]
async fn test_primary_failure_falls_back_once() {
    let generator = MockGenerator::new(vec![
        api_error(503, "overloaded"),
        MockResponse::Text("```json\n{\"from\":\"fallback\"}\n```".to_string()),
    ]);
    let relay = test_relay(generator.clone());

    let response = relay.handle(prompt_request("sys", "user")).await;

    assert_eq!(response.status_code, 200);
    assert_eq!(response.body, r#"{"from":"fallback"}"#);
    assert_eq!(generator.models(), vec!["primary-model", "fallback-model"]);

    let requests = generator.requests();
    assert_eq!(requests[0].instruction(), requests[1].instruction());
}

#[tokio::test]
async fn test_both_models_failing_reports_last_error() {
    let generator = MockGenerator::new(vec![
        api_error(503, "primary overloaded"),
        api_error(404, "fallback model not found"),
    ]);
    let relay = test_relay(generator.clone());

    let response = relay.handle(prompt_request("sys", "user")).await;

    assert_eq!(response.status_code, 500);
    let message = error_message(&response.body);
    assert!(message.starts_with("Failed to generate content: "));
    assert!(message.contains("fallback model not found"), "{}", message);
    assert!(!message.contains("primary overloaded"), "{}", message);
    assert_eq!(generator.call_count(), 2);
}

#[tokio::test]
async fn test_fenced_json_is_cleaned() {
    let generator = MockGenerator::text("```json\n{\"ok\":true}\n```");
    let relay = test_relay(generator);

    let response = relay.handle(prompt_request("Reply in JSON", "ping")).await;

    assert_eq!(response.status_code, 200);
    assert_eq!(response.body, r#"{"ok":true}"#);
}

#[tokio::test]
async fn test_instruction_and_safety_reach_generator() {
    let generator = MockGenerator::text("{}");
    let relay = test_relay(generator.clone());

    relay.handle(prompt_request("You are terse.", "Say hi")).await;

    let requests = generator.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].instruction(),
        &format!("You are terse.{}Say hi", USER_INPUT_SEPARATOR)
    );

    let settings = requests[0].config().safety().settings();
    assert_eq!(settings.len(), 4);
    assert!(
        settings
            .iter()
            .all(|s| s.threshold == HarmBlockThreshold::BlockNone)
    );
    assert_eq!(*requests[0].config().output_format(), OutputFormat::Text);
    assert_eq!(generator.credentials(), vec![TEST_KEY]);
}

#[tokio::test]
async fn test_empty_prompts_are_forwarded() {
    let generator = MockGenerator::text("{}");
    let relay = test_relay(generator.clone());

    let response = relay.handle(prompt_request("", "")).await;

    assert_eq!(response.status_code, 200);
    assert_eq!(generator.requests()[0].instruction(), USER_INPUT_SEPARATOR);
}

#[tokio::test]
async fn test_json_rejection_downgrades_to_text_on_same_model() {
    let generator = MockGenerator::new(vec![
        api_error(400, "response mime type not supported"),
        MockResponse::Text("```\n{\"plain\":true}\n```".to_string()),
    ]);
    let relay = PromptRelay::new(generator.clone(), test_config(OutputFormat::Json));

    let response = relay.handle(prompt_request("sys", "user")).await;

    assert_eq!(response.status_code, 200);
    assert_eq!(response.body, r#"{"plain":true}"#);

    let requests = generator.requests();
    assert_eq!(generator.models(), vec!["primary-model", "primary-model"]);
    assert_eq!(*requests[0].config().output_format(), OutputFormat::Json);
    assert_eq!(*requests[1].config().output_format(), OutputFormat::Text);
}

#[tokio::test]
async fn test_text_mode_does_not_retry_on_400() {
    let generator = MockGenerator::new(vec![
        api_error(400, "bad request"),
        MockResponse::Text("{}".to_string()),
    ]);
    let relay = test_relay(generator.clone());

    let response = relay.handle(prompt_request("sys", "user")).await;

    assert_eq!(response.status_code, 200);
    assert_eq!(generator.models(), vec!["primary-model", "fallback-model"]);
}

#[tokio::test]
async fn test_api_key_is_redacted_from_error_body() {
    let leak = format!("invalid key {} supplied", TEST_KEY);
    let generator = MockGenerator::new(vec![
        MockResponse::Fail(GeminiErrorKind::Transport(leak.clone())),
        MockResponse::Fail(GeminiErrorKind::Transport(leak)),
    ]);
    let relay = test_relay(generator);

    let response = relay.handle(prompt_request("sys", "user")).await;

    assert_eq!(response.status_code, 500);
    assert!(!response.body.contains(TEST_KEY), "{}", response.body);
    assert!(response.body.contains("[REDACTED]"), "{}", response.body);
}

#[tokio::test]
async fn test_blocked_and_empty_responses_trigger_fallback() {
    let generator = MockGenerator::new(vec![
        MockResponse::Fail(GeminiErrorKind::Blocked("SAFETY".to_string())),
        MockResponse::Fail(GeminiErrorKind::EmptyResponse("MAX_TOKENS".to_string())),
    ]);
    let relay = test_relay(generator.clone());

    let response = relay.handle(prompt_request("sys", "user")).await;

    assert_eq!(response.status_code, 500);
    assert!(error_message(&response.body).contains("MAX_TOKENS"));
    assert_eq!(generator.call_count(), 2);
}

#[tokio::test]
async fn test_function_event_is_handled() {
    let generator = MockGenerator::text("```json\n{\"ok\":true}\n```");
    let relay = test_relay(generator.clone());
    let body = prompt_request("sys", "user").body.unwrap_or_default();
    let event = serde_json::json!({ "httpMethod": "POST", "body": body }).to_string();

    let response = relay.handle_event(&event).await;

    assert_eq!(response.status_code, 200);
    assert_eq!(response.body, r#"{"ok":true}"#);
    assert_eq!(generator.call_count(), 1);
}

#[tokio::test]
async fn test_malformed_function_event_still_gets_envelope() {
    let generator = MockGenerator::text("{}");
    let relay = test_relay(generator.clone());

    for event in ["not json", r#"{"body":"{}"}"#, ""] {
        let response = relay.handle_event(event).await;
        assert_eq!(response.status_code, 500, "event {:?}", event);
        assert_eq!(response.header("Content-Type"), Some("application/json"));
        let message = error_message(&response.body);
        assert!(
            message.starts_with("Invalid request body: malformed function event"),
            "{}",
            message
        );
    }

    assert_eq!(generator.call_count(), 0);
}
