//! Windowed aggregation: per-task mean progress over the trailing N days.
//!
//! [`summarize`] is pure. Both summary call sites (the SQLite store and the
//! history file) reduce their data to [`Sample`]s and hand them here.
//!
//! Rounding is half away from zero at one decimal place (`0.25` → `0.3`).
//! Output order is the order in which each task first appears among the samples
//! that fall inside the window; callers that need a different order sort the
//! result themselves.

use std::collections::HashMap;

use chrono::{DateTime, Days, Utc};
use thiserror::Error;

use super::types::{AggregateResult, Sample};

/// Precondition violations reported by [`summarize`].
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum SummaryError {
    #[error("window must be at least one day")]
    NonPositiveWindow,
    #[error("a {0}-day window reaches before the supported calendar range")]
    WindowOutOfRange(u32),
}

/// Start of a `window_days` window ending at `now`, using calendar-day subtraction.
pub fn window_start(window_days: u32, now: DateTime<Utc>) -> Result<DateTime<Utc>, SummaryError> {
    if window_days == 0 {
        return Err(SummaryError::NonPositiveWindow);
    }
    now.checked_sub_days(Days::new(u64::from(window_days)))
        .ok_or(SummaryError::WindowOutOfRange(window_days))
}

/// Average progress per task among samples dated at or after `now - window_days`.
///
/// Returns an empty vector when nothing qualifies.
pub fn summarize(
    samples: &[Sample],
    window_days: u32,
    now: DateTime<Utc>,
) -> Result<Vec<AggregateResult>, SummaryError> {
    let cutoff = window_start(window_days, now)?;

    let mut order: HashMap<&str, usize> = HashMap::new();
    // Progress is not range-checked on save, so sum wide enough for any i64 input
    let mut groups: Vec<(&str, i128, u64)> = Vec::new();

    for sample in samples.iter().filter(|s| s.date >= cutoff) {
        let slot = *order.entry(sample.task.as_str()).or_insert_with(|| {
            groups.push((sample.task.as_str(), 0, 0));
            groups.len() - 1
        });
        let (_, sum, count) = &mut groups[slot];
        *sum += i128::from(sample.progress);
        *count += 1;
    }

    Ok(groups
        .into_iter()
        .map(|(task, sum, count)| AggregateResult {
            task: task.to_string(),
            average: round_one_decimal(sum as f64 / count as f64),
        })
        .collect())
}

/// Round half away from zero to one decimal place.
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Render an average as text with exactly one decimal (`6` → `"6.0"`).
pub fn format_average(average: f64) -> String {
    format!("{average:.1}")
}
