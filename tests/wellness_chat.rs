//! Integration tests for POST /api/wellness/chat
//!
//! Covers the default wellness intent, fail-soft texts, and that a failing
//! interaction log never changes the response.

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use studydoc::{
    auth::issue_token,
    config::Config,
    error::{ProviderError, StorageError},
    handlers::{self, AppState, completion::AiTextResponse},
    provider::GenerativeModel,
    storage::{InteractionLog, WellnessChatEntry},
};
use tower::ServiceExt;

const SECRET: &str = "wellness-secret";

struct RecordingModel {
    succeed: bool,
    prompts: Mutex<Vec<String>>,
}

impl RecordingModel {
    fn new(succeed: bool) -> Self {
        Self {
            succeed,
            prompts: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl GenerativeModel for RecordingModel {
    async fn generate(
        &self,
        _api_key: &str,
        model: &str,
        prompt: &str,
    ) -> Result<String, ProviderError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if self.succeed {
            Ok("Take a deep breath.".to_string())
        } else {
            Err(ProviderError::Transport {
                model: model.to_string(),
                reason: "connection refused".to_string(),
            })
        }
    }
}

#[derive(Default)]
struct RecordingLog {
    entries: Mutex<Vec<WellnessChatEntry>>,
}

#[async_trait]
impl InteractionLog for RecordingLog {
    async fn record(&self, entry: &WellnessChatEntry) -> Result<(), StorageError> {
        self.entries.lock().unwrap().push(entry.clone());
        Ok(())
    }
}

struct FailingLog;

#[async_trait]
impl InteractionLog for FailingLog {
    async fn record(&self, _entry: &WellnessChatEntry) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("disk full".to_string()))
    }
}

fn config(with_key: bool) -> Config {
    let key_line = if with_key { "api_key = \"k\"" } else { "" };
    let toml = format!(
        "[server]\nhost = \"127.0.0.1\"\nport = 5000\n\n[provider]\n{}\n\n[auth]\njwt_secret = \"{}\"\n",
        key_line, SECRET
    );
    Config::from_str(&toml).expect("should parse test config")
}

fn create_app(
    with_key: bool,
    model: Arc<RecordingModel>,
    log: Arc<dyn InteractionLog>,
) -> (Router, AppState) {
    let state =
        AppState::new(Arc::new(config(with_key)), model, log).expect("should create AppState");
    (handlers::router(state.clone()), state)
}

fn chat_request(user_id: i64, body: &str) -> Request<Body> {
    let token = issue_token(SECRET, user_id, 600).unwrap();
    Request::builder()
        .method("POST")
        .uri("/api/wellness/chat")
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn read_text(response: axum::response::Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let parsed: AiTextResponse = serde_json::from_slice(&body).expect("should be {text}");
    parsed.text
}

#[tokio::test]
async fn test_reply_is_returned_and_logged() {
    let model = Arc::new(RecordingModel::new(true));
    let log = Arc::new(RecordingLog::default());
    let (app, _) = create_app(true, model.clone(), log.clone());

    let response = app
        .oneshot(chat_request(5, r#"{"message":"I am anxious about exams"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_text(response).await, "Take a deep breath.");

    let prompts = model.prompts.lock().unwrap();
    assert!(prompts[0].contains("empathetic wellness mentor"));
    assert!(prompts[0].contains("\"I am anxious about exams\""));

    let entries = log.entries.lock().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].user_id, 5);
    assert_eq!(
        entries[0].notes(),
        "User: I am anxious about exams\nAI: Take a deep breath."
    );
}

#[tokio::test]
async fn test_failing_log_still_returns_reply() {
    let model = Arc::new(RecordingModel::new(true));
    let (app, state) = create_app(true, model, Arc::new(FailingLog));

    let response = app
        .oneshot(chat_request(5, r#"{"message":"hello"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_text(response).await, "Take a deep breath.");
    assert_eq!(state.metrics().log_failure_count(), 1);
}

#[tokio::test]
async fn test_unconfigured_key_returns_gentle_tip() {
    let model = Arc::new(RecordingModel::new(true));
    let log = Arc::new(RecordingLog::default());
    let (app, _) = create_app(false, model.clone(), log.clone());

    let response = app
        .oneshot(chat_request(2, r#"{"message":"tired"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let text = read_text(response).await;
    assert_eq!(
        text,
        "AI support is temporarily unavailable. Here's a gentle tip: Take a short 5-min walk and try a breathing exercise."
    );
    assert!(model.prompts.lock().unwrap().is_empty());
    assert_eq!(
        log.entries.lock().unwrap()[0].notes(),
        format!("User: tired\nAI: {}", text)
    );
}

#[tokio::test]
async fn test_provider_failure_returns_apology() {
    let model = Arc::new(RecordingModel::new(false));
    let (app, _) = create_app(true, model.clone(), Arc::new(RecordingLog::default()));

    let response = app
        .oneshot(chat_request(2, r#"{"message":"hi"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        read_text(response).await,
        "Sorry, I could not reach the AI right now. Please try again later."
    );
    // primary and secondary
    assert_eq!(model.prompts.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_explicit_intent_overrides_wellness_template() {
    let model = Arc::new(RecordingModel::new(true));
    let (app, _) = create_app(true, model.clone(), Arc::new(RecordingLog::default()));

    let response = app
        .oneshot(chat_request(
            2,
            r#"{"message":"ignored","intent":{"module":"examiner","input":"Cell biology"}}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let prompts = model.prompts.lock().unwrap();
    assert!(prompts[0].contains("You are an examiner."));
    assert!(prompts[0].contains("Cell biology"));
}

#[tokio::test]
async fn test_empty_string_intent_uses_wellness_template() {
    let model = Arc::new(RecordingModel::new(true));
    let (app, _) = create_app(true, model.clone(), Arc::new(RecordingLog::default()));

    let response = app
        .oneshot(chat_request(2, r#"{"message":"I am stressed","intent":""}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let prompts = model.prompts.lock().unwrap();
    assert!(prompts[0].contains("empathetic wellness mentor"));
    assert!(prompts[0].contains("Student message:\n\"I am stressed\""));
}

#[tokio::test]
async fn test_missing_token_is_401() {
    let model = Arc::new(RecordingModel::new(true));
    let (app, _) = create_app(true, model, Arc::new(RecordingLog::default()));

    let request = Request::builder()
        .method("POST")
        .uri("/api/wellness/chat")
        .body(Body::from(r#"{"message":"hi"}"#))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
