//! Common error types for fieldgraph.

use crate::EntityRef;
use thiserror::Error;

/// Errors raised while constructing or validating a single entity value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntityError {
    /// A required field is missing or holds an invalid value.
    #[error("malformed entity: missing or invalid field `{field}`")]
    Malformed { field: String },

    /// A type tag did not name one of the entity kinds.
    #[error("unknown entity type: {tag:?}")]
    UnknownKind { tag: String },
}

impl EntityError {
    pub fn malformed(field: impl Into<String>) -> Self {
        Self::Malformed {
            field: field.into(),
        }
    }

    pub fn unknown_kind(tag: impl Into<String>) -> Self {
        Self::UnknownKind { tag: tag.into() }
    }
}

/// Result type for entity construction.
pub type EntityResult<T> = Result<T, EntityError>;

/// Errors that can occur during graph lookups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// Entity not found.
    #[error("entity not found: {0}")]
    NotFound(EntityRef),
}

/// Result type for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;
