//! History error types.

use thiserror::Error;

/// History errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistoryError {
    /// The cursor is at the oldest retained snapshot.
    #[error("nothing to undo")]
    NothingToUndo,

    /// The cursor is at the newest snapshot.
    #[error("nothing to redo")]
    NothingToRedo,
}

/// Result type for history operations.
pub type HistoryResult<T> = Result<T, HistoryError>;
