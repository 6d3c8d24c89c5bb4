// ABOUTME: Tests for the OpenAI-compatible completion provider against a local mock server
// ABOUTME: Request encoding, bearer auth, JSON mode, response parsing, and HTTP error mapping
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use common::init_test_logging;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use workout_formatter::errors::ErrorCode;
use workout_formatter::llm::{
    ChatMessage, ChatRequest, LlmCapabilities, LlmProvider, OpenAiCompatibleConfig,
    OpenAiCompatibleProvider,
};

struct MockState {
    status: StatusCode,
    reply: Value,
    last_body: Mutex<Option<Value>>,
    last_auth: Mutex<Option<String>>,
}

async fn chat_completions(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    *state.last_body.lock().unwrap() = Some(body);
    *state.last_auth.lock().unwrap() = headers
        .get("authorization")
        .map(|value| value.to_str().unwrap().to_owned());
    (state.status, Json(state.reply.clone()))
}

async fn models(State(state): State<Arc<MockState>>) -> StatusCode {
    state.status
}

/// Start a mock `OpenAI`-compatible server and return its base URL
async fn start_mock(status: StatusCode, reply: Value) -> (String, Arc<MockState>) {
    init_test_logging();
    let state = Arc::new(MockState {
        status,
        reply,
        last_body: Mutex::new(None),
        last_auth: Mutex::new(None),
    });
    let app = Router::new()
        .route("/v1/chat/completions", post(chat_completions))
        .route("/v1/models", get(models))
        .with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}/v1"), state)
}

fn completion_reply(content: &str) -> Value {
    json!({
        "id": "chatcmpl-1",
        "model": "mock-model",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 12, "completion_tokens": 8, "total_tokens": 20 }
    })
}

fn provider_for(base_url: &str, api_key: Option<&str>) -> OpenAiCompatibleProvider {
    let config = OpenAiCompatibleConfig::local(base_url, "mock-model", api_key.map(str::to_owned))
        .with_request_timeout(Duration::from_secs(5));
    OpenAiCompatibleProvider::new(config).unwrap()
}

fn request() -> ChatRequest {
    ChatRequest::new(vec![
        ChatMessage::system("You are a workout parser."),
        ChatMessage::user("Parse this workout into structured JSON format:\n\nSquat 5x5"),
    ])
    .with_temperature(0.3)
}

#[tokio::test]
async fn test_completion_round_trip() {
    let (base_url, state) = start_mock(StatusCode::OK, completion_reply("{\"name\": \"x\"}")).await;
    let provider = provider_for(&base_url, Some("sk-local"));

    let response = provider.complete(&request()).await.unwrap();

    assert_eq!(response.content, "{\"name\": \"x\"}");
    assert_eq!(response.model, "mock-model");
    assert_eq!(response.finish_reason.as_deref(), Some("stop"));
    assert_eq!(response.usage.unwrap().total_tokens, 20);

    let body = state.last_body.lock().unwrap().clone().unwrap();
    assert_eq!(body["model"], "mock-model");
    assert_eq!(body["stream"], false);
    assert_eq!(body["messages"][0]["role"], "system");
    assert_eq!(body["messages"][1]["role"], "user");
    assert!((body["temperature"].as_f64().unwrap() - 0.3).abs() < 1e-6);
    assert!(body.get("response_format").is_none());
    assert_eq!(
        state.last_auth.lock().unwrap().as_deref(),
        Some("Bearer sk-local")
    );
}

#[tokio::test]
async fn test_no_auth_header_without_key() {
    let (base_url, state) = start_mock(StatusCode::OK, completion_reply("{}")).await;
    let provider = provider_for(&base_url, None);

    provider.complete(&request()).await.unwrap();
    assert!(state.last_auth.lock().unwrap().is_none());
}

#[tokio::test]
async fn test_json_mode_only_when_supported() {
    let (base_url, state) = start_mock(StatusCode::OK, completion_reply("{}")).await;

    let plain = OpenAiCompatibleProvider::new(
        OpenAiCompatibleConfig::local(&base_url, "mock-model", None)
            .with_capabilities(LlmCapabilities::text_only()),
    )
    .unwrap();
    plain.complete(&request().with_json_mode()).await.unwrap();
    assert!(state
        .last_body
        .lock()
        .unwrap()
        .as_ref()
        .unwrap()
        .get("response_format")
        .is_none());

    let json_capable = OpenAiCompatibleProvider::new(
        OpenAiCompatibleConfig::local(&base_url, "mock-model", None)
            .with_capabilities(LlmCapabilities::SYSTEM_MESSAGES | LlmCapabilities::JSON_MODE),
    )
    .unwrap();
    json_capable
        .complete(&request().with_json_mode())
        .await
        .unwrap();
    let body = state.last_body.lock().unwrap().clone().unwrap();
    assert_eq!(body["response_format"]["type"], "json_object");
}

#[tokio::test]
async fn test_model_override() {
    let (base_url, state) = start_mock(StatusCode::OK, completion_reply("{}")).await;
    let provider = provider_for(&base_url, None);

    provider
        .complete(&request().with_model("other-model").with_max_tokens(512))
        .await
        .unwrap();

    let body = state.last_body.lock().unwrap().clone().unwrap();
    assert_eq!(body["model"], "other-model");
    assert_eq!(body["max_tokens"], 512);
}

#[tokio::test]
async fn test_http_errors_map_to_codes() {
    let cases = [
        (StatusCode::UNAUTHORIZED, ErrorCode::ExternalAuthFailed),
        (StatusCode::FORBIDDEN, ErrorCode::ExternalAuthFailed),
        (StatusCode::TOO_MANY_REQUESTS, ErrorCode::ExternalRateLimited),
        (StatusCode::BAD_GATEWAY, ErrorCode::ExternalServiceUnavailable),
        (StatusCode::BAD_REQUEST, ErrorCode::ExternalServiceError),
    ];

    for (status, expected) in cases {
        let reply = json!({ "error": { "message": "nope", "type": "invalid_request_error" } });
        let (base_url, _) = start_mock(status, reply).await;
        let error = provider_for(&base_url, Some("k"))
            .complete(&request())
            .await
            .unwrap_err();
        assert_eq!(error.code, expected, "status {status}");
    }
}

#[tokio::test]
async fn test_rate_limit_message_extracts_wait() {
    let reply = json!({ "error": { "message": "Rate limited, try again in 7.2s" } });
    let (base_url, _) = start_mock(StatusCode::TOO_MANY_REQUESTS, reply).await;

    let error = provider_for(&base_url, None)
        .complete(&request())
        .await
        .unwrap_err();
    assert!(error.message.contains("try again in 8 seconds"), "{}", error.message);
}

#[tokio::test]
async fn test_empty_choices_is_service_error() {
    let (base_url, _) = start_mock(StatusCode::OK, json!({ "choices": [] })).await;

    let error = provider_for(&base_url, None)
        .complete(&request())
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::ExternalServiceError);
}

#[tokio::test]
async fn test_connection_refused_is_unavailable() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let error = provider_for(&format!("http://{addr}/v1"), None)
        .complete(&request())
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::ExternalServiceUnavailable);
}

#[tokio::test]
async fn test_health_check() {
    let (healthy_url, _) = start_mock(StatusCode::OK, json!({})).await;
    assert!(provider_for(&healthy_url, None).health_check().await.unwrap());

    let (sick_url, _) = start_mock(StatusCode::SERVICE_UNAVAILABLE, json!({})).await;
    assert!(!provider_for(&sick_url, None).health_check().await.unwrap());
}

#[test]
fn test_openrouter_preset() {
    let config = OpenAiCompatibleConfig::openrouter("sk-or", None);
    assert_eq!(config.base_url, "https://openrouter.ai/api/v1");
    assert_eq!(config.provider_name, "openrouter");
    assert!(!config.capabilities.supports_json_mode());

    let ollama = OpenAiCompatibleConfig::ollama("llama3.1:8b");
    assert!(ollama.capabilities.supports_json_mode());
    assert!(ollama.api_key.is_none());
}
