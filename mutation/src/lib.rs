//! fieldgraph Mutation
//!
//! Derive new graph snapshots from mutation intents (Add/Replace/Remove).
//!
//! Responsibilities:
//! - Validate operations against the current snapshot
//! - Keep every committed snapshot referentially intact
//! - Apply the configured removal policy
//!
//! # Module Structure
//!
//! - `executor` - Main Mutator that coordinates operations
//! - `ops/` - Individual operation implementations (add, replace, remove)
//! - `validation` - Shared integrity rules used by every operation
//! - `operation` - The mutation intents
//! - `policy` - Tombstone vs purge removal
//! - `error` - Error types for mutation failures

mod error;
mod executor;
mod operation;
mod ops;
mod policy;
mod validation;

pub use error::{ErrorKind, MutationError, MutationResult};
pub use executor::Mutator;
pub use operation::Operation;
pub use policy::RemovalPolicy;
pub use validation::{validate, validate_with};
