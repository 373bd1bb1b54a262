#![allow(dead_code)]

use chrono::{DateTime, Days, TimeZone, Utc};
use habitus::db;
use habitus::progress::store::append_batch;
use habitus::progress::types::TaskScore;
use rusqlite::Connection;

/// Open a fresh in-memory database with schema and migrations applied.
pub fn test_db() -> Connection {
    db::open_memory_database().unwrap()
}

/// Fixed reference instant used as "now" in windowing tests.
pub fn d0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 20, 18, 0, 0).unwrap()
}

/// `d0()` minus `n` calendar days.
pub fn days_ago(n: u64) -> DateTime<Utc> {
    d0().checked_sub_days(Days::new(n)).unwrap()
}

/// Append one batch of `(task, progress)` pairs dated `date`. Returns the batch id.
pub fn insert_batch(conn: &mut Connection, scores: &[(&str, i64)], date: DateTime<Utc>) -> String {
    let entries: Vec<TaskScore> = scores
        .iter()
        .map(|(task, progress)| TaskScore::new(*task, *progress))
        .collect();
    append_batch(conn, &entries, date).unwrap().batch_id
}

/// Requests received by a fake model server.
pub type Captured = std::sync::Arc<std::sync::Mutex<Vec<serde_json::Value>>>;

/// Start a stand-in for the text-generation server on an ephemeral port.
///
/// Every `POST /api/generate` body is recorded; the reply is `status` with `body`.
/// Returns the endpoint URL and the captured request bodies.
pub async fn spawn_fake_model(
    status: axum::http::StatusCode,
    body: serde_json::Value,
) -> (String, Captured) {
    use axum::extract::State;
    use axum::routing::post;
    use axum::Json;

    type ModelState = (Captured, axum::http::StatusCode, serde_json::Value);

    let captured: Captured = Default::default();

    async fn generate(
        State((captured, status, body)): State<ModelState>,
        Json(request): Json<serde_json::Value>,
    ) -> (axum::http::StatusCode, Json<serde_json::Value>) {
        captured.lock().unwrap().push(request);
        (status, Json(body))
    }

    let app = axum::Router::new()
        .route("/api/generate", post(generate))
        .with_state((captured.clone(), status, body));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}/api/generate"), captured)
}
