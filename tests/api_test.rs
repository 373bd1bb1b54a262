mod helpers;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use habitus::api::{self, AppState};
use habitus::config::HabitusConfig;
use habitus::history::{HistoryProvider, MemoryHistory, Snapshot};
use helpers::{spawn_fake_model, test_db};
use serde_json::{json, Value};
use tower::ServiceExt;

fn test_config(endpoint: Option<String>) -> HabitusConfig {
    let mut config = HabitusConfig::default();
    if let Some(endpoint) = endpoint {
        config.assistant.endpoint = endpoint;
    }
    config.assistant.timeout_secs = 5;
    config
}

fn app_with(endpoint: Option<String>) -> (Router, Arc<MemoryHistory>) {
    let history = Arc::new(MemoryHistory::new());
    let state = AppState::new(test_db(), history.clone(), &test_config(endpoint)).unwrap();
    (api::router(state), history)
}

/// History whose appends always fail; reads see nothing.
struct BrokenHistory;

impl HistoryProvider for BrokenHistory {
    fn append(&self, _snapshot: &Snapshot) -> anyhow::Result<()> {
        anyhow::bail!("history disk is read-only")
    }

    fn read(&self) -> anyhow::Result<Vec<Snapshot>> {
        Ok(Vec::new())
    }
}

fn app() -> Router {
    app_with(None).0
}

async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let body = match body {
        Some(v) => Body::from(v.to_string()),
        None => Body::empty(),
    };
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body)
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
    (status, value)
}

#[tokio::test]
async fn health_is_ok() {
    let (status, body) = call(&app(), "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("ok"));
}

#[tokio::test]
async fn save_then_summary_formats_averages() {
    let app = app();

    let (status, body) = call(
        &app,
        "POST",
        "/api/save",
        Some(json!({"data": [
            {"task": "Exercise", "progress": 4},
            {"task": "Exercise", "progress": 8},
            {"task": "Reading", "progress": 10}
        ]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true}));

    let (status, body) = call(&app, "POST", "/api/summary", Some(json!({"days": 7}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            {"task": "Exercise", "average": "6.0"},
            {"task": "Reading", "average": "10.0"}
        ])
    );
}

#[tokio::test]
async fn summary_of_empty_store_is_empty_list() {
    let (status, body) = call(&app(), "POST", "/api/summary", Some(json!({"days": 30}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn summary_rejects_non_positive_days() {
    let app = app();
    for days in [0, -5] {
        let (status, body) = call(&app, "POST", "/api/summary", Some(json!({"days": days}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "days must be a positive integer");
    }

    // Fits in u32 but reaches past the calendar
    let (status, _) =
        call(&app, "POST", "/api/summary", Some(json!({"days": 4_000_000_000u64}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn extreme_scores_summarize_and_server_keeps_working() {
    let app = app();
    let huge = json!({"data": [
        {"task": "a", "progress": i64::MAX},
        {"task": "a", "progress": i64::MAX}
    ]});

    let (status, _) = call(&app, "POST", "/api/save", Some(huge)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = call(&app, "POST", "/api/summary", Some(json!({"days": 7}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["task"], "a");
    assert_eq!(body[0]["average"], "9223372036854775808.0");

    let (status, _) = call(
        &app,
        "POST",
        "/api/save",
        Some(json!({"data": [{"task": "b", "progress": 3}]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = call(&app, "POST", "/api/summary", Some(json!({"days": 7}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[1], json!({"task": "b", "average": "3.0"}));
}

#[tokio::test]
async fn board_save_keeps_store_batch_when_history_fails() {
    let state = AppState::new(test_db(), Arc::new(BrokenHistory), &test_config(None)).unwrap();
    let app = api::router(state);

    call(&app, "POST", "/api/board/adjust", Some(json!({"index": 0, "delta": 4}))).await;
    let (status, body) = call(&app, "POST", "/api/board/save", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["saved"], 8);
    assert_eq!(body["history_saved"], false);

    let (_, summary) = call(&app, "POST", "/api/summary", Some(json!({"days": 1}))).await;
    assert_eq!(summary.as_array().unwrap().len(), 8);
    assert_eq!(summary[0], json!({"task": "Read books consistently", "average": "4.0"}));

    let (_, history) = call(&app, "POST", "/api/history/summary", Some(json!({"days": 1}))).await;
    assert_eq!(history["lines"], json!([]));
}

#[tokio::test]
async fn board_adjust_save_and_reset() {
    let (app, history) = app_with(None);

    let (status, body) = call(&app, "GET", "/api/board", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tasks"].as_array().unwrap().len(), 8);
    assert_eq!(body["overall_percent"], 0);

    let (status, body) = call(
        &app,
        "POST",
        "/api/board/adjust",
        Some(json!({"index": 2, "delta": 5})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let exercise = &body["tasks"][2];
    assert_eq!(exercise["name"], "Exercise daily");
    assert_eq!(exercise["progress"], 5);
    assert_eq!(exercise["bar"], "▓▓▓▓▓░░░░░");
    assert_eq!(exercise["band"], "medium");
    // 5 / 80 = 6.25%
    assert_eq!(body["overall_percent"], 6);

    let (status, _) = call(
        &app,
        "POST",
        "/api/board/adjust",
        Some(json!({"index": 99, "delta": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = call(&app, "POST", "/api/board/save", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["saved"], 8);
    assert_eq!(body["history_saved"], true);
    assert_eq!(history.read().unwrap().len(), 1);

    // The board save also lands in the sample store
    let (_, summary) = call(&app, "POST", "/api/summary", Some(json!({"days": 1}))).await;
    assert_eq!(summary.as_array().unwrap().len(), 8);
    assert_eq!(summary[2], json!({"task": "Exercise daily", "average": "5.0"}));

    let (status, body) = call(&app, "POST", "/api/board/reset", Some(json!({"save": true}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tasks"][2]["progress"], 0);
    assert_eq!(history.read().unwrap().len(), 2);

    let (status, _) = call(&app, "POST", "/api/board/reset", Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history.read().unwrap().len(), 2);
}

#[tokio::test]
async fn history_summary_reports_percent() {
    let app = app();

    let (status, body) = call(&app, "POST", "/api/history/summary", Some(json!({"days": 7}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "No data for the selected period.");
    assert_eq!(body["lines"], json!([]));

    call(&app, "POST", "/api/board/adjust", Some(json!({"index": 7, "delta": 7}))).await;
    call(&app, "POST", "/api/board/save", None).await;

    let (_, body) = call(&app, "POST", "/api/history/summary", Some(json!({"days": 7}))).await;
    assert!(body.get("message").is_none());
    let water = &body["lines"][7];
    assert_eq!(water["task"], "Drink water");
    assert_eq!(water["average"], "7.0");
    assert_eq!(water["percent"], 70);
}

#[tokio::test]
async fn chat_forwards_to_model() {
    let (endpoint, captured) =
        spawn_fake_model(StatusCode::OK, json!({"response": "Drink more water."})).await;
    let (app, _history) = app_with(Some(endpoint));

    let (status, body) = call(
        &app,
        "POST",
        "/api/chat",
        Some(json!({"message": "  What should I improve?  "})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"response": "Drink more water."}));

    let requests = captured.lock().unwrap();
    let prompt = requests[0]["prompt"].as_str().unwrap();
    assert!(prompt.contains("User question: What should I improve?\n"));
}

#[tokio::test]
async fn chat_failure_still_answers() {
    let (endpoint, _captured) =
        spawn_fake_model(StatusCode::SERVICE_UNAVAILABLE, json!({})).await;
    let (app, _history) = app_with(Some(endpoint));

    let (status, body) = call(&app, "POST", "/api/chat", Some(json!({"message": "hi"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["response"]
        .as_str()
        .unwrap()
        .starts_with("Sorry, there was an error processing your request."));
}

#[tokio::test]
async fn chat_rejects_blank_message() {
    let (status, _) = call(&app(), "POST", "/api/chat", Some(json!({"message": "   "}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn assistant_info_lists_suggestions() {
    let (status, body) = call(&app(), "GET", "/api/assistant", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["model"], "llama3");
    assert_eq!(body["suggestions"].as_array().unwrap().len(), 5);
    assert!(body["greeting"].as_str().unwrap().starts_with("Hello!"));
}
