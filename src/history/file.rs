//! JSON-file history provider.

use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};

use super::{HistoryProvider, Snapshot};

/// History stored as a JSON array of snapshots at `path`.
///
/// A missing file reads as an empty history. Appends rewrite the whole file via
/// a temp file and rename; the mutex serializes appends within one process.
#[derive(Debug)]
pub struct FileHistory {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileHistory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    fn load(&self) -> Result<Vec<Snapshot>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let contents = std::fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read history at {}", self.path.display()))?;
        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse history at {}", self.path.display()))
    }
}

impl HistoryProvider for FileHistory {
    fn append(&self, snapshot: &Snapshot) -> Result<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|e| anyhow!("history lock poisoned: {e}"))?;

        let mut entries = self.load()?;
        entries.push(snapshot.clone());

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }

        let tmp_path = self.path.with_extension("tmp");
        let json = serde_json::to_string_pretty(&entries)?;
        std::fs::write(&tmp_path, json)
            .with_context(|| format!("failed to write {}", tmp_path.display()))?;
        std::fs::rename(&tmp_path, &self.path).context("failed to rename temp history file")?;

        tracing::debug!(path = %self.path.display(), entries = entries.len(), "history appended");
        Ok(())
    }

    fn read(&self) -> Result<Vec<Snapshot>> {
        self.load()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::SnapshotEntry;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn snapshot(day: u32) -> Snapshot {
        Snapshot {
            date: NaiveDate::from_ymd_opt(2024, 6, day).unwrap(),
            data: vec![SnapshotEntry {
                name: "Meditate daily".into(),
                progress: 5,
                icon: "🧘".into(),
            }],
        }
    }

    #[test]
    fn missing_file_reads_empty() {
        let tmp = TempDir::new().unwrap();
        let history = FileHistory::new(tmp.path().join("history.json"));
        assert!(history.read().unwrap().is_empty());
    }

    #[test]
    fn append_persists_across_instances() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("history.json");

        let history = FileHistory::new(&path);
        history.append(&snapshot(1)).unwrap();
        history.append(&snapshot(2)).unwrap();

        let reopened = FileHistory::new(&path);
        assert_eq!(reopened.read().unwrap(), vec![snapshot(1), snapshot(2)]);
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("history.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(FileHistory::new(&path).read().is_err());
    }
}
