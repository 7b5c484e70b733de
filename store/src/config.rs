//! Store configuration.

use fieldgraph_graph::DEFAULT_COMPACTION_THRESHOLD;
use fieldgraph_history::DEFAULT_MAX_DEPTH;
use fieldgraph_mutation::RemovalPolicy;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Settings for a [`GraphStore`](crate::GraphStore).
///
/// ```toml
/// removal_policy = "purge"
/// history_depth = 50
/// compaction_threshold = 16
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// What Remove does with an unreferenced entity.
    pub removal_policy: RemovalPolicy,
    /// Undo steps retained; 0 keeps everything.
    pub history_depth: usize,
    /// Storage layers a snapshot may stack before it is flattened.
    pub compaction_threshold: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            removal_policy: RemovalPolicy::default(),
            history_depth: DEFAULT_MAX_DEPTH,
            compaction_threshold: DEFAULT_COMPACTION_THRESHOLD,
        }
    }
}

impl StoreConfig {
    /// Parse a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }
}
