//! Parent indexes for efficient back-reference lookups.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use fieldgraph_core::EntityId;

use crate::layered::LayeredMap;

static EMPTY: BTreeSet<EntityId> = BTreeSet::new();

/// Parent index: referenced key -> Set<referencing entity id>
///
/// Sets are shared between graph snapshots; a key touched by a mutation gets a
/// fresh copy of its set, untouched keys keep pointing at the old one.
#[derive(Debug, Clone)]
pub struct ParentIndex<K> {
    index: LayeredMap<K, Arc<BTreeSet<EntityId>>>,
}

impl<K: Ord + Clone> Default for ParentIndex<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord + Clone> ParentIndex<K> {
    pub fn new() -> Self {
        Self {
            index: LayeredMap::new(),
        }
    }

    /// Parents of `key`; empty when nothing references it.
    pub fn get(&self, key: &K) -> &BTreeSet<EntityId> {
        self.index.get(key).map_or(&EMPTY, |set| &**set)
    }

    /// Number of keys with at least one parent.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Derive an index with links dropped and added.
    ///
    /// Removals are applied before additions. Keys whose set becomes empty are
    /// removed from the index.
    pub fn update(
        &self,
        removed: impl IntoIterator<Item = (K, EntityId)>,
        added: impl IntoIterator<Item = (K, EntityId)>,
        max_depth: usize,
    ) -> Self {
        let mut touched: BTreeMap<K, BTreeSet<EntityId>> = BTreeMap::new();

        for (key, parent) in removed {
            let set = touched
                .entry(key)
                .or_insert_with_key(|k| self.get(k).clone());
            set.remove(&parent);
        }
        for (key, parent) in added {
            let set = touched
                .entry(key)
                .or_insert_with_key(|k| self.get(k).clone());
            set.insert(parent);
        }

        if touched.is_empty() {
            return self.clone();
        }

        let changes = touched.into_iter().map(|(key, set)| {
            let slot = if set.is_empty() {
                None
            } else {
                Some(Arc::new(set))
            };
            (key, slot)
        });

        Self {
            index: self.index.apply(changes, max_depth),
        }
    }

    /// Iterate `(key, parents)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &BTreeSet<EntityId>)> + '_ {
        self.index.iter().map(|(k, set)| (k, &**set))
    }
}

impl<K: Ord + Clone> PartialEq for ParentIndex<K> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}
