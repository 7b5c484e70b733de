//! fieldgraph Store
//!
//! The single committer that publishes graph snapshots, plus the import and
//! export surfaces used by the persistence/sync layer.
//!
//! Responsibilities:
//! - Serialize writers through one lane and publish each result atomically
//! - Record every commit in the history for undo/redo
//! - Build an initial graph from stored records
//! - Hand whole snapshots back out for serialization

mod config;
mod error;
mod export;
mod import;
mod store;

pub use config::StoreConfig;
pub use error::{ConfigError, ImportError, ImportResult, StoreError, StoreResult};
pub use export::{export_json, snapshot_entities};
pub use import::{load_graph, load_graph_json, load_graph_with};
pub use store::GraphStore;
