//! fieldgraph Core Types
//!
//! This crate provides the foundational types used throughout fieldgraph:
//! - Identity types (EntityId, EntityKind, EntityRef)
//! - Tag mappings (the Tags map and the `tags!` macro)
//! - Entity structures (Point, Way, Observation and the closed Entity union)
//! - Common error types

mod entity;
mod error;
mod id;
mod observation;
mod tags;

pub use entity::*;
pub use error::*;
pub use id::*;
pub use observation::*;
pub use tags::*;
