//! `POST /api/chat` and `GET /api/assistant`.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::{ApiError, AppState};
use crate::assistant::prompt::{GREETING, QUICK_QUESTIONS};

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatParams {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

/// Forward a question to the model. Model failures still answer 200 with the fallback text.
pub async fn chat(
    State(state): State<AppState>,
    Json(params): Json<ChatParams>,
) -> Result<Json<ChatResponse>, ApiError> {
    let message = params.message.trim();
    if message.is_empty() {
        return Err(ApiError::bad_request("message must not be empty"));
    }
    tracing::info!(message_len = message.len(), "chat called");

    let assistant = Arc::clone(&state.assistant);
    let recent = state
        .with_history(move |history| assistant.recent_history(history))
        .await;
    let response = state.assistant.reply(message, recent).await;

    Ok(Json(ChatResponse { response }))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AssistantInfo {
    pub model: String,
    pub greeting: String,
    pub suggestions: Vec<String>,
}

pub async fn assistant_info(State(state): State<AppState>) -> Json<AssistantInfo> {
    Json(AssistantInfo {
        model: state.assistant.model().to_string(),
        greeting: GREETING.to_string(),
        suggestions: QUICK_QUESTIONS.iter().map(|q| q.to_string()).collect(),
    })
}
