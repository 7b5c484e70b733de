//! fieldgraph History
//!
//! Undo/redo over graph snapshots.
//!
//! Responsibilities:
//! - Record committed snapshots in order
//! - Move a cursor back and forth for undo/redo
//! - Drop the oldest snapshots past a retention limit
//! - Compute entity-level diffs between snapshots for sync consumers

mod diff;
mod error;
mod history;

pub use diff::{diff, Diff};
pub use error::{HistoryError, HistoryResult};
pub use history::{History, DEFAULT_MAX_DEPTH};
