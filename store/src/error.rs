//! Store error types.

use fieldgraph_history::HistoryError;
use fieldgraph_mutation::MutationError;
use thiserror::Error;

/// Store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The mutation was rejected; nothing was published.
    #[error(transparent)]
    Mutation(#[from] MutationError),

    /// Undo or redo had nowhere to go.
    #[error(transparent)]
    History(#[from] HistoryError),

    /// A thread panicked while holding a store lock.
    #[error("store lock poisoned: {lock}")]
    Poisoned { lock: &'static str },
}

impl StoreError {
    pub fn poisoned(lock: &'static str) -> Self {
        Self::Poisoned { lock }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Import errors.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The document is not structurally valid.
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A record failed validation while being added.
    #[error("record {index}: {source}")]
    Record {
        index: usize,
        #[source]
        source: MutationError,
    },
}

impl ImportError {
    pub fn record(index: usize, source: impl Into<MutationError>) -> Self {
        Self::Record {
            index,
            source: source.into(),
        }
    }

    /// The mutation failure behind a record error.
    pub fn mutation(&self) -> Option<&MutationError> {
        match self {
            Self::Record { source, .. } => Some(source),
            Self::Parse(_) => None,
        }
    }
}

/// Result type for import operations.
pub type ImportResult<T> = Result<T, ImportError>;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid store config: {0}")]
    Parse(#[from] toml::de::Error),
}
