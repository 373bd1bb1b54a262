//! HTTP API: shared state, error mapping, and the axum router.
//!
//! Each endpoint lives in its own submodule next to its request/response types.
//! Blocking database and history-file work runs on `spawn_blocking`.

pub mod board;
pub mod chat;
pub mod save;
pub mod summary;

use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use rusqlite::Connection;
use serde_json::json;

use crate::assistant::Assistant;
use crate::config::HabitusConfig;
use crate::history::HistoryProvider;
use crate::progress::board::TaskBoard;
use crate::progress::summary::SummaryError;

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    db: Arc<Mutex<Connection>>,
    history: Arc<dyn HistoryProvider>,
    board: Arc<Mutex<TaskBoard>>,
    assistant: Arc<Assistant>,
}

impl AppState {
    pub fn new(
        conn: Connection,
        history: Arc<dyn HistoryProvider>,
        config: &HabitusConfig,
    ) -> anyhow::Result<Self> {
        let board = TaskBoard::new(&config.board.tasks);
        let task_names = config.board.tasks.iter().map(|t| t.name.clone()).collect();
        let assistant = Assistant::new(&config.assistant, task_names)?;
        Ok(Self {
            db: Arc::new(Mutex::new(conn)),
            history,
            board: Arc::new(Mutex::new(board)),
            assistant: Arc::new(assistant),
        })
    }

    /// Run `f` against the connection on the blocking pool.
    async fn with_db<T, F>(&self, f: F) -> anyhow::Result<T>
    where
        F: FnOnce(&mut Connection) -> anyhow::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || {
            let mut conn = db.lock().map_err(|e| anyhow!("db lock poisoned: {e}"))?;
            f(&mut conn)
        })
        .await
        .map_err(|e| anyhow!("db task failed: {e}"))?
    }

    /// Run `f` against the history provider on the blocking pool.
    async fn with_history<T, F>(&self, f: F) -> anyhow::Result<T>
    where
        F: FnOnce(&dyn HistoryProvider) -> anyhow::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let history = Arc::clone(&self.history);
        tokio::task::spawn_blocking(move || f(history.as_ref()))
            .await
            .map_err(|e| anyhow!("history task failed: {e}"))?
    }

    fn board(&self) -> Result<std::sync::MutexGuard<'_, TaskBoard>, ApiError> {
        self.board
            .lock()
            .map_err(|e| ApiError::internal(anyhow!("board lock poisoned: {e}")))
    }
}

/// An error response: status code plus a message for the client.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    /// Log the cause and hide it behind a generic message.
    pub fn internal(err: anyhow::Error) -> Self {
        tracing::error!(error = %format!("{err:#}"), "request failed");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "failed to process request".into(),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast_ref::<SummaryError>() {
            Some(summary) => Self::bad_request(summary.to_string()),
            None => Self::internal(err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

/// Parse a client-supplied day count into a window length.
pub(crate) fn window_days(days: i64) -> Result<u32, ApiError> {
    if days <= 0 {
        return Err(ApiError::bad_request("days must be a positive integer"));
    }
    u32::try_from(days).map_err(|_| ApiError::bad_request("days is too large"))
}

async fn health_check() -> &'static str {
    "ok"
}

/// Build the axum router for all endpoints.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/save", post(save::save))
        .route("/api/summary", post(summary::summary))
        .route("/api/history/summary", post(summary::history_summary))
        .route("/api/chat", post(chat::chat))
        .route("/api/assistant", get(chat::assistant_info))
        .route("/api/board", get(board::show))
        .route("/api/board/adjust", post(board::adjust))
        .route("/api/board/save", post(board::save))
        .route("/api/board/reset", post(board::reset))
        .route("/health", get(health_check))
        .with_state(state)
}
