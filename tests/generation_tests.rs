//! Wire-level tests for the Gemini backend against a mock HTTP server.

use serde_json::{Value, json};
use tokio_chat_memory_api::core::assistant::{ChatMessage, Role};
use tokio_chat_memory_api::core::error::GenerationError;
use tokio_chat_memory_api::core::limiter::RateLimiter;
use tokio_chat_memory_api::core::traits::GenerativeBackend;
use tokio_chat_memory_api::infrastructure::gemini::GeminiBackend;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MODEL: &str = "gemini-2.5-flash";

fn backend(server: &MockServer) -> GeminiBackend {
    GeminiBackend::new(
        "test-key".to_string(),
        MODEL.to_string(),
        RateLimiter::new(6000),
    )
    .with_base_url(server.uri())
}

fn generate_path() -> String {
    format!("/v1beta/models/{MODEL}:generateContent")
}

fn success_body(text: &str) -> Value {
    json!({
        "candidates": [
            {"content": {"parts": [{"text": text}], "role": "model"}, "finishReason": "STOP"}
        ]
    })
}

#[tokio::test]
async fn test_generate_returns_candidate_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(generate_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_body("Four.")))
        .mount(&server)
        .await;

    let reply = backend(&server)
        .generate("answer briefly", &[], "What is 2+2?")
        .await
        .unwrap();

    assert_eq!(reply, "Four.");
}

#[tokio::test]
async fn test_request_payload_shape() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(generate_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_body("ok")))
        .mount(&server)
        .await;

    let history = vec![
        ChatMessage {
            role: Role::User,
            content: "Hi".to_string(),
        },
        ChatMessage {
            role: Role::Assistant,
            content: "Hello!".to_string(),
        },
    ];

    backend(&server)
        .generate("be nice", &history, "Bye")
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);

    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["systemInstruction"]["parts"][0]["text"], "be nice");
    assert_eq!(body["contents"][0]["role"], "user");
    assert_eq!(body["contents"][1]["role"], "model");
    assert_eq!(body["contents"][2]["parts"][0]["text"], "Bye");
    assert_eq!(body["generationConfig"]["temperature"], 0.65);
}

#[tokio::test]
async fn test_http_429_classified_as_quota() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(generate_path()))
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
        .mount(&server)
        .await;

    let err = backend(&server)
        .generate("answer", &[], "Hello")
        .await
        .unwrap_err();

    assert!(matches!(err, GenerationError::QuotaExhausted(_)));
}

#[tokio::test]
async fn test_quota_marker_in_body_classified_as_quota() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(generate_path()))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({
            "error": {"status": "RESOURCE_EXHAUSTED", "message": "Quota exceeded"}
        })))
        .mount(&server)
        .await;

    let err = backend(&server)
        .generate("answer", &[], "Hello")
        .await
        .unwrap_err();

    assert!(matches!(err, GenerationError::QuotaExhausted(_)));
}

#[tokio::test]
async fn test_other_http_errors_are_upstream_failures() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(generate_path()))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
        .mount(&server)
        .await;

    let err = backend(&server)
        .generate("answer", &[], "Hello")
        .await
        .unwrap_err();

    assert!(matches!(err, GenerationError::Failed(msg) if msg.contains("500")));
}

#[tokio::test]
async fn test_empty_candidates_is_a_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(generate_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"candidates": []})))
        .mount(&server)
        .await;

    let err = backend(&server)
        .generate("answer", &[], "Hello")
        .await
        .unwrap_err();

    assert!(matches!(err, GenerationError::Failed(msg) if msg.contains("No response")));
}
