//! fieldgraph Graph Storage
//!
//! This crate provides immutable, structurally shared graph snapshots:
//! - Entity storage keyed by kind and id
//! - Parent-way index: find the ways that include a point
//! - Parent-observation index: find the observations anchored to a point or way

mod graph;
mod index;
mod layered;

pub use graph::*;
pub use index::ParentIndex;
pub use layered::LayeredMap;
