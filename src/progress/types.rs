//! Core progress type definitions.
//!
//! Defines [`Sample`] (one persisted observation), [`TaskScore`] (one entry of a
//! save request), [`StoredSample`] (a sample with its storage identity), and
//! [`AggregateResult`] (a per-task average over a window).

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Upper bound of the score scale the board produces. The store does not enforce it.
pub const MAX_PROGRESS: i64 = 10;

/// One `(task, progress, date)` observation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    /// Free-text habit name. Grouping is by exact string equality.
    pub task: String,
    pub progress: i64,
    /// Shared by every sample written in the same save.
    pub date: DateTime<Utc>,
}

impl Sample {
    pub fn new(task: impl Into<String>, progress: i64, date: DateTime<Utc>) -> Self {
        Self {
            task: task.into(),
            progress,
            date,
        }
    }
}

/// A `(task, progress)` pair submitted for saving. The date is assigned by the writer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskScore {
    pub task: String,
    pub progress: i64,
}

impl TaskScore {
    pub fn new(task: impl Into<String>, progress: i64) -> Self {
        Self {
            task: task.into(),
            progress,
        }
    }
}

/// A sample row as stored in `progress_samples`.
#[derive(Debug, Clone, Serialize)]
pub struct StoredSample {
    /// UUID v7 primary key.
    pub id: String,
    /// UUID v7 shared by all rows of one save.
    pub batch_id: String,
    #[serde(flatten)]
    pub sample: Sample,
}

/// Mean progress for one task over a window, rounded to one decimal place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateResult {
    pub task: String,
    pub average: f64,
}

impl AggregateResult {
    /// The average on a 0–100 scale, rounded to a whole percent.
    pub fn percent(&self) -> i64 {
        (self.average * 10.0).round() as i64
    }
}

/// Encode a timestamp the way `recorded_at` stores it.
///
/// Fixed millisecond precision with a `Z` suffix keeps lexicographic order equal
/// to chronological order, which `query_after` relies on.
pub fn encode_timestamp(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a stored `recorded_at` value.
pub fn decode_timestamp(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(value).map(|d| d.with_timezone(&Utc))
}
