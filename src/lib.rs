//! Personal habit tracking: daily progress snapshots, windowed summaries, and a
//! local LLM coach.
//!
//! Users score each habit from 0 to 10, save the scores as a batch, and ask for
//! per-habit averages over the last N days. A chat endpoint forwards questions to
//! a locally hosted model together with the recent saved history.
//!
//! | Data | Where | Read by |
//! |------|-------|---------|
//! | Samples `(task, progress, date)` | SQLite `progress_samples` | `/api/summary` |
//! | Snapshots `{date, data}` | JSON history file | chat context, `/api/history/summary` |
//!
//! The two stores are written together by a board save but are never reconciled.
//! The SQLite store is authoritative for summaries.
//!
//! # Modules
//!
//! - [`progress`] — Sample types, the append-only store, windowed aggregation, the task board
//! - [`history`] — Snapshot history behind the [`history::HistoryProvider`] trait
//! - [`assistant`] — Prompt construction and the text-generation client
//! - [`api`] — axum handlers and router
//! - [`config`] — Configuration loading from TOML files and environment variables
//! - [`db`] — SQLite initialization, schema, migrations, and health checks

pub mod api;
pub mod assistant;
pub mod config;
pub mod db;
pub mod history;
pub mod progress;
pub mod server;
