//! Saved board snapshots: the client-side progress history.
//!
//! The history is a list of [`Snapshot`]s, one per save, read by the assistant for
//! prompt context and summarizable on its own. It is separate from the SQLite
//! sample store and nothing reconciles the two; the store is the authoritative
//! source for `/api/summary`.
//!
//! Access goes through the [`HistoryProvider`] trait. [`FileHistory`] keeps the
//! list as a JSON array on disk; [`MemoryHistory`] keeps it in process.

mod file;

pub use file::FileHistory;

use std::sync::Mutex;

use anyhow::{anyhow, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::progress::summary::summarize;
use crate::progress::types::{AggregateResult, Sample};

/// One saved board state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Calendar day of the save (`YYYY-MM-DD`).
    pub date: NaiveDate,
    pub data: Vec<SnapshotEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    pub name: String,
    pub progress: i64,
    #[serde(default)]
    pub icon: String,
}

impl Snapshot {
    /// Flatten into samples dated at UTC midnight of the snapshot day.
    pub fn samples(&self) -> Vec<Sample> {
        let date = self.date.and_time(chrono::NaiveTime::MIN).and_utc();
        self.data
            .iter()
            .map(|e| Sample::new(e.name.clone(), e.progress, date))
            .collect()
    }
}

/// Read/append access to the snapshot history.
pub trait HistoryProvider: Send + Sync {
    fn append(&self, snapshot: &Snapshot) -> Result<()>;

    /// All snapshots, oldest first.
    fn read(&self) -> Result<Vec<Snapshot>>;
}

/// The last `n` snapshots, oldest first.
pub fn recent(provider: &dyn HistoryProvider, n: usize) -> Result<Vec<Snapshot>> {
    let mut all = provider.read()?;
    let skip = all.len().saturating_sub(n);
    Ok(all.split_off(skip))
}

/// Aggregate the history over a window.
///
/// Because a snapshot is dated at midnight, a save from exactly `window_days`
/// ago only counts when `now` is itself midnight.
pub fn summarize_history(
    provider: &dyn HistoryProvider,
    window_days: u32,
    now: DateTime<Utc>,
) -> Result<Vec<AggregateResult>> {
    let samples: Vec<Sample> = provider.read()?.iter().flat_map(Snapshot::samples).collect();
    Ok(summarize(&samples, window_days, now)?)
}

/// In-process history, lost on exit.
#[derive(Debug, Default)]
pub struct MemoryHistory {
    entries: Mutex<Vec<Snapshot>>,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HistoryProvider for MemoryHistory {
    fn append(&self, snapshot: &Snapshot) -> Result<()> {
        self.entries
            .lock()
            .map_err(|e| anyhow!("history lock poisoned: {e}"))?
            .push(snapshot.clone());
        Ok(())
    }

    fn read(&self) -> Result<Vec<Snapshot>> {
        Ok(self
            .entries
            .lock()
            .map_err(|e| anyhow!("history lock poisoned: {e}"))?
            .clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn snapshot(d: u32, scores: &[(&str, i64)]) -> Snapshot {
        Snapshot {
            date: day(d),
            data: scores
                .iter()
                .map(|(name, progress)| SnapshotEntry {
                    name: name.to_string(),
                    progress: *progress,
                    icon: String::new(),
                })
                .collect(),
        }
    }

    #[test]
    fn snapshot_json_shape() {
        let json = r#"{"date":"2024-05-20","data":[{"name":"Drink water","progress":7,"icon":"💧"}]}"#;
        let snap: Snapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snap.date, day(20));
        assert_eq!(snap.data[0].progress, 7);
        assert_eq!(serde_json::to_string(&snap).unwrap(), json);
    }

    #[test]
    fn recent_returns_tail() {
        let history = MemoryHistory::new();
        for d in 1..=10 {
            history.append(&snapshot(d, &[("Reading", 1)])).unwrap();
        }
        let tail = recent(&history, 7).unwrap();
        assert_eq!(tail.len(), 7);
        assert_eq!(tail[0].date, day(4));
        assert_eq!(tail[6].date, day(10));

        assert_eq!(recent(&MemoryHistory::new(), 7).unwrap(), vec![]);
    }

    #[test]
    fn summarize_history_windows_by_snapshot_day() {
        let history = MemoryHistory::new();
        history.append(&snapshot(1, &[("Reading", 2)])).unwrap();
        history.append(&snapshot(18, &[("Reading", 4), ("Exercise daily", 5)])).unwrap();
        history.append(&snapshot(19, &[("Reading", 8)])).unwrap();

        let now = Utc.with_ymd_and_hms(2024, 5, 20, 12, 0, 0).unwrap();
        let result = summarize_history(&history, 7, now).unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].task, "Reading");
        assert_eq!(result[0].average, 6.0);
        assert_eq!(result[1].task, "Exercise daily");
        assert_eq!(result[1].average, 5.0);
    }

    #[test]
    fn snapshot_on_cutoff_day_is_excluded_after_midnight() {
        let history = MemoryHistory::new();
        history.append(&snapshot(13, &[("Reading", 2)])).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 5, 20, 12, 0, 0).unwrap();
        assert!(summarize_history(&history, 7, now).unwrap().is_empty());
    }
}
