use axum::{extract::State, http::HeaderMap, http::StatusCode, routing::post, Json, Router};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use productivity_coach::{
    completion::{CompletionProvider, GatewayError, OpenAiClient},
    config::Config,
};

/// Scripted stand-in for the chat-completions endpoint. Each call pops the
/// next `(status, body)`; the last entry repeats.
#[derive(Clone)]
struct FakeProvider {
    script: Arc<Vec<(StatusCode, Value)>>,
    calls: Arc<AtomicUsize>,
    seen: Arc<parking_lot::Mutex<Vec<(Option<String>, Value)>>>,
}

async fn chat_completions(
    State(fake): State<FakeProvider>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let auth = headers.get("authorization").and_then(|v| v.to_str().ok()).map(str::to_string);
    fake.seen.lock().push((auth, body));
    let n = fake.calls.fetch_add(1, Ordering::SeqCst);
    let (status, body) = fake.script[n.min(fake.script.len() - 1)].clone();
    (status, Json(body))
}

async fn spawn_fake(script: Vec<(StatusCode, Value)>) -> (String, FakeProvider) {
    let fake = FakeProvider {
        script: Arc::new(script),
        calls: Arc::new(AtomicUsize::new(0)),
        seen: Arc::default(),
    };
    let app = Router::new().route("/v1/chat/completions", post(chat_completions)).with_state(fake.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}/v1"), fake)
}

fn config(base: &str, max_retries: u32) -> Config {
    Config {
        api_key: Some("sk-test".into()),
        api_base: base.to_string(),
        request_timeout: Duration::from_secs(5),
        max_retries,
        ..Config::default()
    }
}

fn completion(content: Value) -> Value {
    json!({"choices": [{"index": 0, "message": {"role": "assistant", "content": content}}]})
}

#[tokio::test]
async fn sends_system_and_user_messages_and_returns_first_choice() {
    let (base, fake) = spawn_fake(vec![(StatusCode::OK, completion(json!("{\"summary\":\"hi\"}")))]).await;
    let client = OpenAiClient::new(&config(&base, 0)).unwrap();

    let text = client.complete("system rules", "user prompt").await.unwrap();
    assert_eq!(text, "{\"summary\":\"hi\"}");

    let seen = fake.seen.lock();
    let (auth, body) = &seen[0];
    assert_eq!(auth.as_deref(), Some("Bearer sk-test"));
    assert_eq!(body["model"], "gpt-4o-mini");
    assert_eq!(body["temperature"].as_f64().map(|t| (t * 10.0).round()), Some(7.0));
    assert_eq!(
        body["messages"],
        json!([
            {"role": "system", "content": "system rules"},
            {"role": "user", "content": "user prompt"}
        ])
    );
}

#[tokio::test]
async fn empty_choice_yields_empty_text() {
    let (base, _fake) = spawn_fake(vec![(StatusCode::OK, completion(Value::Null))]).await;
    let client = OpenAiClient::new(&config(&base, 0)).unwrap();
    assert_eq!(client.complete("s", "p").await.unwrap(), "");
}

#[tokio::test]
async fn auth_errors_are_not_retried() {
    let (base, fake) = spawn_fake(vec![(
        StatusCode::UNAUTHORIZED,
        json!({"error": {"message": "Incorrect API key provided"}}),
    )])
    .await;
    let client = OpenAiClient::new(&config(&base, 3)).unwrap();

    let err = client.complete("s", "p").await.unwrap_err();
    assert!(matches!(err, GatewayError::Api { status: 401, ref message } if message == "Incorrect API key provided"));
    assert_eq!(fake.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn transient_errors_are_retried_until_success() {
    let (base, fake) = spawn_fake(vec![
        (StatusCode::TOO_MANY_REQUESTS, json!({"error": {"message": "slow down"}})),
        (StatusCode::BAD_GATEWAY, json!({})),
        (StatusCode::OK, completion(json!("{}"))),
    ])
    .await;
    let client = OpenAiClient::new(&config(&base, 2)).unwrap();

    assert_eq!(client.complete("s", "p").await.unwrap(), "{}");
    assert_eq!(fake.calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn retries_are_bounded() {
    let (base, fake) = spawn_fake(vec![(StatusCode::SERVICE_UNAVAILABLE, json!({}))]).await;
    let client = OpenAiClient::new(&config(&base, 1)).unwrap();

    let err = client.complete("s", "p").await.unwrap_err();
    assert!(matches!(err, GatewayError::Api { status: 503, .. }));
    assert_eq!(fake.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn unreadable_body_is_a_parse_error() {
    let (base, _fake) = spawn_fake(vec![(StatusCode::OK, json!({"choices": "nope"}))]).await;
    let client = OpenAiClient::new(&config(&base, 0)).unwrap();
    assert!(matches!(client.complete("s", "p").await, Err(GatewayError::Parse(_))));
}

#[tokio::test]
async fn missing_key_fails_without_network() {
    let client = OpenAiClient::new(&Config { api_key: None, ..config("http://127.0.0.1:9", 0) }).unwrap();
    assert!(!client.is_configured());
    assert!(matches!(client.complete("s", "p").await, Err(GatewayError::MissingApiKey)));
}
