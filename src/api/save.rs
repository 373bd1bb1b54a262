//! `POST /api/save` — append one batch of scores with today's timestamp.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::{ApiError, AppState};
use crate::progress::store::append_batch;
use crate::progress::types::TaskScore;

#[derive(Debug, Serialize, Deserialize)]
pub struct SaveParams {
    pub data: Vec<TaskScore>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SaveResponse {
    pub success: bool,
}

pub async fn save(
    State(state): State<AppState>,
    Json(params): Json<SaveParams>,
) -> Result<Json<SaveResponse>, ApiError> {
    tracing::info!(entries = params.data.len(), "save called");

    let date = Utc::now();
    let receipt = state
        .with_db(move |conn| append_batch(conn, &params.data, date))
        .await?;

    tracing::info!(batch_id = %receipt.batch_id, inserted = receipt.inserted, "progress saved");
    Ok(Json(SaveResponse { success: true }))
}
