//! `POST /api/summary` (sample store) and `POST /api/history/summary` (history file).

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::{window_days, ApiError, AppState};
use crate::history::summarize_history;
use crate::progress::store::summarize_store;
use crate::progress::summary::format_average;

#[derive(Debug, Serialize, Deserialize)]
pub struct SummaryParams {
    pub days: i64,
}

/// One line of `/api/summary`. The average is text with one decimal (`"6.0"`).
#[derive(Debug, Serialize, Deserialize)]
pub struct SummaryLine {
    pub task: String,
    pub average: String,
}

pub async fn summary(
    State(state): State<AppState>,
    Json(params): Json<SummaryParams>,
) -> Result<Json<Vec<SummaryLine>>, ApiError> {
    let days = window_days(params.days)?;
    tracing::info!(days, "summary called");

    let now = Utc::now();
    let results = state
        .with_db(move |conn| summarize_store(&*conn, days, now))
        .await?;

    Ok(Json(
        results
            .into_iter()
            .map(|r| SummaryLine {
                task: r.task,
                average: format_average(r.average),
            })
            .collect(),
    ))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryLine {
    pub task: String,
    pub average: String,
    pub percent: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HistorySummaryResponse {
    pub days: u32,
    pub lines: Vec<HistoryLine>,
    /// Set when no snapshot falls inside the window.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

pub async fn history_summary(
    State(state): State<AppState>,
    Json(params): Json<SummaryParams>,
) -> Result<Json<HistorySummaryResponse>, ApiError> {
    let days = window_days(params.days)?;
    tracing::info!(days, "history summary called");

    let now = Utc::now();
    let results = state
        .with_history(move |history| summarize_history(history, days, now))
        .await?;

    let message = results
        .is_empty()
        .then(|| "No data for the selected period.".to_string());

    Ok(Json(HistorySummaryResponse {
        days,
        lines: results
            .iter()
            .map(|r| HistoryLine {
                task: r.task.clone(),
                average: format_average(r.average),
                percent: r.percent(),
            })
            .collect(),
        message,
    }))
}
