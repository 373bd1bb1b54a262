//! The in-memory task board: the list of habits and today's scores.
//!
//! Scores move in steps via [`TaskBoard::adjust`] and are clamped to
//! `0..=MAX_PROGRESS`. A board turns into a save batch with
//! [`TaskBoard::scores`] and into a history entry with [`TaskBoard::snapshot`].

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use super::types::{TaskScore, MAX_PROGRESS};
use crate::config::TaskSpec;
use crate::history::{Snapshot, SnapshotEntry};

#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum BoardError {
    #[error("no task at index {index} (board has {len})")]
    UnknownTask { index: usize, len: usize },
}

/// One habit on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    pub name: String,
    pub icon: String,
    pub progress: u8,
}

/// Coarse score bucket used for coloring the progress bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressBand {
    /// 0
    Untouched,
    /// 1–3
    Low,
    /// 4–6
    Medium,
    /// 7–9
    High,
    /// 10
    Complete,
}

impl ProgressBand {
    pub fn of(progress: u8) -> Self {
        match progress {
            0 => Self::Untouched,
            1..=3 => Self::Low,
            4..=6 => Self::Medium,
            7..=9 => Self::High,
            _ => Self::Complete,
        }
    }
}

/// Text bar: one `▓` per point, padded with `░` to ten cells.
pub fn render_bar(progress: u8) -> String {
    let filled = usize::from(progress.min(MAX_PROGRESS as u8));
    let empty = MAX_PROGRESS as usize - filled;
    format!("{}{}", "▓".repeat(filled), "░".repeat(empty))
}

#[derive(Debug, Clone)]
pub struct TaskBoard {
    tasks: Vec<Task>,
}

impl TaskBoard {
    /// A board with every configured habit at zero.
    pub fn new(specs: &[TaskSpec]) -> Self {
        Self {
            tasks: specs
                .iter()
                .map(|s| Task {
                    name: s.name.clone(),
                    icon: s.icon.clone(),
                    progress: 0,
                })
                .collect(),
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Add `delta` to one task's score, clamping to `0..=10`. Returns the new score.
    pub fn adjust(&mut self, index: usize, delta: i32) -> Result<u8, BoardError> {
        let len = self.tasks.len();
        let task = self
            .tasks
            .get_mut(index)
            .ok_or(BoardError::UnknownTask { index, len })?;
        let next = (i64::from(task.progress) + i64::from(delta)).clamp(0, MAX_PROGRESS);
        task.progress = next as u8;
        Ok(task.progress)
    }

    /// Zero every score.
    pub fn reset(&mut self) {
        for task in &mut self.tasks {
            task.progress = 0;
        }
    }

    /// Sum of scores as a share of the maximum, rounded to a whole percent.
    pub fn overall_percent(&self) -> u32 {
        if self.tasks.is_empty() {
            return 0;
        }
        let total: u32 = self.tasks.iter().map(|t| u32::from(t.progress)).sum();
        let max = self.tasks.len() as f64 * MAX_PROGRESS as f64;
        (f64::from(total) / max * 100.0).round() as u32
    }

    /// The current scores as a save batch.
    pub fn scores(&self) -> Vec<TaskScore> {
        self.tasks
            .iter()
            .map(|t| TaskScore::new(t.name.clone(), i64::from(t.progress)))
            .collect()
    }

    /// The current scores as a history entry for `date`.
    pub fn snapshot(&self, date: NaiveDate) -> Snapshot {
        Snapshot {
            date,
            data: self
                .tasks
                .iter()
                .map(|t| SnapshotEntry {
                    name: t.name.clone(),
                    progress: i64::from(t.progress),
                    icon: t.icon.clone(),
                })
                .collect(),
        }
    }

    /// Render-ready view of the board.
    pub fn view(&self) -> BoardView {
        BoardView {
            tasks: self
                .tasks
                .iter()
                .map(|t| TaskView {
                    name: t.name.clone(),
                    icon: t.icon.clone(),
                    progress: t.progress,
                    bar: render_bar(t.progress),
                    band: ProgressBand::of(t.progress),
                })
                .collect(),
            overall_percent: self.overall_percent(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TaskView {
    pub name: String,
    pub icon: String,
    pub progress: u8,
    pub bar: String,
    pub band: ProgressBand,
}

#[derive(Debug, Serialize)]
pub struct BoardView {
    pub tasks: Vec<TaskView>,
    pub overall_percent: u32,
}
