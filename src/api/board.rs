//! Task board endpoints: view, adjust, save, reset.

use axum::extract::State;
use axum::Json;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{ApiError, AppState};
use crate::progress::board::{BoardError, BoardView};
use crate::progress::store::append_batch;

pub async fn show(State(state): State<AppState>) -> Result<Json<BoardView>, ApiError> {
    Ok(Json(state.board()?.view()))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AdjustParams {
    pub index: usize,
    pub delta: i32,
}

pub async fn adjust(
    State(state): State<AppState>,
    Json(params): Json<AdjustParams>,
) -> Result<Json<BoardView>, ApiError> {
    let mut board = state.board()?;
    let progress = board
        .adjust(params.index, params.delta)
        .map_err(|e: BoardError| ApiError::not_found(e.to_string()))?;
    tracing::debug!(index = params.index, delta = params.delta, progress, "task adjusted");
    Ok(Json(board.view()))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BoardSaveResponse {
    pub date: NaiveDate,
    pub batch_id: String,
    pub saved: usize,
    /// False when the batch reached the store but the history append failed.
    pub history_saved: bool,
}

pub async fn save(State(state): State<AppState>) -> Result<Json<BoardSaveResponse>, ApiError> {
    Ok(Json(save_board(&state).await?))
}

/// Write the current board to the sample store, then to the history.
///
/// The store is written first. If that fails nothing is recorded anywhere and
/// the request fails. A history failure after a successful store write is
/// logged and reported as `history_saved: false`; the batch is kept.
async fn save_board(state: &AppState) -> Result<BoardSaveResponse, ApiError> {
    let now = Utc::now();
    let today = now.date_naive();
    let (scores, snapshot) = {
        let board = state.board()?;
        (board.scores(), board.snapshot(today))
    };

    let receipt = state
        .with_db(move |conn| append_batch(conn, &scores, now))
        .await?;

    let history_saved = match state
        .with_history(move |history| history.append(&snapshot))
        .await
    {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(
                error = %format!("{e:#}"),
                batch_id = %receipt.batch_id,
                "board saved to store but history append failed"
            );
            false
        }
    };

    tracing::info!(date = %today, batch_id = %receipt.batch_id, history_saved, "board saved");
    Ok(BoardSaveResponse {
        date: today,
        batch_id: receipt.batch_id,
        saved: receipt.inserted,
        history_saved,
    })
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ResetParams {
    /// Save the current scores before zeroing them.
    #[serde(default)]
    pub save: bool,
}

pub async fn reset(
    State(state): State<AppState>,
    Json(params): Json<ResetParams>,
) -> Result<Json<BoardView>, ApiError> {
    if params.save {
        save_board(&state).await?;
    }
    let mut board = state.board()?;
    board.reset();
    Ok(Json(board.view()))
}
