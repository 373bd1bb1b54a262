//! Write and read paths for the append-only sample table.
//!
//! [`append_batch`] writes one save inside a transaction so concurrent readers see
//! either the whole batch or none of it. [`query_after`] returns the rows a
//! summary needs. The [`SampleStore`] trait is the seam the summary call sites
//! depend on; `rusqlite::Connection` implements it.

use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use serde::Serialize;

use super::summary::{summarize, window_start};
use super::types::{
    decode_timestamp, encode_timestamp, AggregateResult, Sample, StoredSample, TaskScore,
};

/// Result returned from [`append_batch`].
#[derive(Debug, Serialize)]
pub struct BatchReceipt {
    /// UUID v7 shared by every row of the batch.
    pub batch_id: String,
    pub date: DateTime<Utc>,
    pub inserted: usize,
}

/// Append one sample per entry, all sharing `date` and a fresh batch id.
pub fn append_batch(
    conn: &mut Connection,
    entries: &[TaskScore],
    date: DateTime<Utc>,
) -> Result<BatchReceipt> {
    let batch_id = uuid::Uuid::now_v7().to_string();
    let recorded_at = encode_timestamp(&date);

    let tx = conn.transaction()?;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO progress_samples (id, batch_id, task, progress, recorded_at) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;
        for entry in entries {
            let id = uuid::Uuid::now_v7().to_string();
            stmt.execute(params![id, batch_id, entry.task, entry.progress, recorded_at])?;
        }
    }
    tx.commit()?;

    tracing::debug!(batch_id = %batch_id, inserted = entries.len(), "appended progress batch");

    Ok(BatchReceipt {
        batch_id,
        date,
        inserted: entries.len(),
    })
}

/// All samples with `date >= cutoff`, in insertion order.
pub fn query_after(conn: &Connection, cutoff: DateTime<Utc>) -> Result<Vec<Sample>> {
    let mut stmt = conn.prepare(
        "SELECT task, progress, recorded_at FROM progress_samples \
         WHERE recorded_at >= ?1 ORDER BY rowid",
    )?;
    let samples = stmt
        .query_map(params![encode_timestamp(&cutoff)], |row| {
            Ok(Sample {
                task: row.get(0)?,
                progress: row.get(1)?,
                date: timestamp_column(row, 2)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(samples)
}

/// Every stored row, oldest first. Used by `habitus export`.
pub fn all_samples(conn: &Connection) -> Result<Vec<StoredSample>> {
    let mut stmt = conn.prepare(
        "SELECT id, batch_id, task, progress, recorded_at FROM progress_samples ORDER BY rowid",
    )?;
    let rows = stmt
        .query_map([], |row| {
            Ok(StoredSample {
                id: row.get(0)?,
                batch_id: row.get(1)?,
                sample: Sample {
                    task: row.get(2)?,
                    progress: row.get(3)?,
                    date: timestamp_column(row, 4)?,
                },
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// A malformed `recorded_at` surfaces as a conversion error rather than being skipped.
fn timestamp_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    decode_timestamp(&raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Storage capability consumed by the summary path.
pub trait SampleStore {
    /// Atomically append one sample per entry, all dated `date`.
    fn append(&mut self, entries: &[TaskScore], date: DateTime<Utc>) -> Result<BatchReceipt>;

    /// Samples dated at or after `cutoff`.
    fn query_after(&self, cutoff: DateTime<Utc>) -> Result<Vec<Sample>>;
}

impl SampleStore for Connection {
    fn append(&mut self, entries: &[TaskScore], date: DateTime<Utc>) -> Result<BatchReceipt> {
        append_batch(self, entries, date)
    }

    fn query_after(&self, cutoff: DateTime<Utc>) -> Result<Vec<Sample>> {
        query_after(self, cutoff)
    }
}

/// Fetch the window from `store` and aggregate it.
pub fn summarize_store<S: SampleStore + ?Sized>(
    store: &S,
    window_days: u32,
    now: DateTime<Utc>,
) -> Result<Vec<AggregateResult>> {
    let cutoff = window_start(window_days, now)?;
    let samples = store.query_after(cutoff)?;
    Ok(summarize(&samples, window_days, now)?)
}
