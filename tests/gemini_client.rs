//! Integration tests for the Gemini HTTP client
//!
//! A wiremock server stands in for the generative-language API so the tests
//! check the exact request shape and how each failure is classified.

use serde_json::json;
use studydoc::error::ProviderError;
use studydoc::provider::{GeminiClient, GenerativeModel};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MODEL_PATH: &str = "/models/gemini-1.5-flash:generateContent";

fn client_for(server: &MockServer) -> GeminiClient {
    GeminiClient::new(reqwest::Client::new(), server.uri())
}

fn text_response(parts: &[&str]) -> serde_json::Value {
    let parts: Vec<_> = parts.iter().map(|text| json!({ "text": text })).collect();
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": parts },
            "finishReason": "STOP"
        }]
    })
}

#[tokio::test]
async fn test_sends_key_header_and_user_content() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .and(header("x-goog-api-key", "AIza-test"))
        .and(body_json(json!({
            "contents": [{ "role": "user", "parts": [{ "text": "Explain photosynthesis" }] }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_response(&["Plants ", "make food."])))
        .expect(1)
        .mount(&server)
        .await;

    let text = client_for(&server)
        .generate("AIza-test", "gemini-1.5-flash", "Explain photosynthesis")
        .await
        .expect("request should succeed");

    assert_eq!(text, "Plants make food.");
}

#[tokio::test]
async fn test_trailing_slash_in_base_url_is_ignored() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_response(&["ok"])))
        .expect(1)
        .mount(&server)
        .await;

    let client = GeminiClient::new(reqwest::Client::new(), format!("{}/", server.uri()));
    let text = client.generate("k", "gemini-1.5-flash", "hi").await.unwrap();
    assert_eq!(text, "ok");
}

#[tokio::test]
async fn test_non_success_status_is_status_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
        .mount(&server)
        .await;

    let error = client_for(&server)
        .generate("k", "gemini-1.5-flash", "hi")
        .await
        .unwrap_err();

    match error {
        ProviderError::Status {
            model,
            status,
            body,
        } => {
            assert_eq!(model, "gemini-1.5-flash");
            assert_eq!(status, 429);
            assert_eq!(body, "quota exceeded");
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_invalid_json_is_malformed_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let error = client_for(&server)
        .generate("k", "gemini-1.5-flash", "hi")
        .await
        .unwrap_err();

    assert!(matches!(error, ProviderError::MalformedResponse { .. }));
}

#[tokio::test]
async fn test_blocked_prompt_is_malformed_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "promptFeedback": { "blockReason": "SAFETY" }
        })))
        .mount(&server)
        .await;

    let error = client_for(&server)
        .generate("k", "gemini-1.5-flash", "hi")
        .await
        .unwrap_err();

    match error {
        ProviderError::MalformedResponse { reason, .. } => assert!(reason.contains("SAFETY")),
        other => panic!("expected malformed response, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    // Bind then release a port so nothing is listening on it
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = GeminiClient::new(reqwest::Client::new(), format!("http://{}", addr));
    let error = client
        .generate("k", "gemini-1.5-flash", "hi")
        .await
        .unwrap_err();

    assert!(matches!(error, ProviderError::Transport { .. }));
}
