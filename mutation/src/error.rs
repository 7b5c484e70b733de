//! Mutation error types.

use std::fmt;

use fieldgraph_core::{EntityError, EntityRef};
use thiserror::Error;

/// Result type for mutation operations.
pub type MutationResult<T> = Result<T, MutationError>;

/// Errors that can occur during validation or mutation.
///
/// Every failure leaves the input graph untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MutationError {
    #[error("invalid entity type: {tag:?}")]
    InvalidEntityType { tag: String },

    #[error("duplicate id: {0}")]
    DuplicateId(EntityRef),

    #[error("unknown id: {0}")]
    UnknownId(EntityRef),

    #[error("version conflict on {target}: expected version {expected}, got {found}")]
    VersionConflict {
        target: EntityRef,
        expected: u64,
        found: u64,
    },

    #[error("dangling reference: {0}")]
    DanglingReference(EntityRef),

    #[error("{target} is in use by {}", join_refs(.referencing))]
    EntityInUse {
        target: EntityRef,
        referencing: Vec<EntityRef>,
    },

    #[error("malformed entity: missing or invalid field `{field}`")]
    MalformedEntity { field: String },
}

impl MutationError {
    pub fn invalid_entity_type(tag: impl Into<String>) -> Self {
        Self::InvalidEntityType { tag: tag.into() }
    }

    pub fn version_conflict(target: EntityRef, expected: u64, found: u64) -> Self {
        Self::VersionConflict {
            target,
            expected,
            found,
        }
    }

    /// `referencing` is reported sorted.
    pub fn entity_in_use(target: EntityRef, mut referencing: Vec<EntityRef>) -> Self {
        referencing.sort();
        referencing.dedup();
        Self::EntityInUse {
            target,
            referencing,
        }
    }

    pub fn malformed_entity(field: impl Into<String>) -> Self {
        Self::MalformedEntity {
            field: field.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidEntityType { .. } => ErrorKind::InvalidEntityType,
            Self::DuplicateId(_) => ErrorKind::DuplicateId,
            Self::UnknownId(_) => ErrorKind::UnknownId,
            Self::VersionConflict { .. } => ErrorKind::VersionConflict,
            Self::DanglingReference(_) => ErrorKind::DanglingReference,
            Self::EntityInUse { .. } => ErrorKind::EntityInUse,
            Self::MalformedEntity { .. } => ErrorKind::MalformedEntity,
        }
    }
}

impl From<EntityError> for MutationError {
    fn from(e: EntityError) -> Self {
        match e {
            EntityError::Malformed { field } => Self::MalformedEntity { field },
            EntityError::UnknownKind { tag } => Self::InvalidEntityType { tag },
        }
    }
}

/// The category of a [`MutationError`], without its detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidEntityType,
    DuplicateId,
    UnknownId,
    VersionConflict,
    DanglingReference,
    EntityInUse,
    MalformedEntity,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidEntityType => "InvalidEntityType",
            ErrorKind::DuplicateId => "DuplicateId",
            ErrorKind::UnknownId => "UnknownId",
            ErrorKind::VersionConflict => "VersionConflict",
            ErrorKind::DanglingReference => "DanglingReference",
            ErrorKind::EntityInUse => "EntityInUse",
            ErrorKind::MalformedEntity => "MalformedEntity",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn join_refs(refs: &[EntityRef]) -> String {
    refs.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
