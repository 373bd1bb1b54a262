//! Progress tracking core: sample types, the append-only store, windowed
//! aggregation, and the in-memory task board.

pub mod board;
pub mod store;
pub mod summary;
pub mod types;
