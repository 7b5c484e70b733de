use serde::{Deserialize, Serialize};

/// What Remove does to an entity that nothing references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemovalPolicy {
    /// Store a final, invisible version. The entity stays retrievable by ref
    /// for history replay and sync.
    #[default]
    Tombstone,
    /// Delete the entity from the snapshot.
    Purge,
}

impl RemovalPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            RemovalPolicy::Tombstone => "tombstone",
            RemovalPolicy::Purge => "purge",
        }
    }
}
