//! Copy-on-write layered map.
//!
//! A `LayeredMap` is a persistent ordered map built from a chain of immutable
//! layers. Each derived map pushes one new layer holding only the keys that
//! changed (`None` marks a removal) and shares every older layer with the map
//! it was derived from, so no existing map is ever mutated.
//!
//! To keep lookups short, a new layer is merged into its parent whenever the
//! parent is not at least twice its size, and the chain is flattened once it
//! grows past a depth limit. Each entry is therefore copied O(log n) times over
//! its lifetime, and a lookup visits O(log n) layers.

use std::cmp::Ordering;
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::iter::Peekable;
use std::sync::Arc;

#[derive(Debug)]
struct Layer<K, V> {
    entries: BTreeMap<K, Option<V>>,
    parent: Option<Arc<Layer<K, V>>>,
    depth: usize,
}

impl<K, V> Layer<K, V> {
    fn base(entries: BTreeMap<K, Option<V>>) -> Self {
        Self {
            entries,
            parent: None,
            depth: 0,
        }
    }
}

/// Persistent ordered map with structural sharing between versions.
#[derive(Debug)]
pub struct LayeredMap<K, V> {
    top: Arc<Layer<K, V>>,
    len: usize,
}

impl<K, V> Clone for LayeredMap<K, V> {
    fn clone(&self) -> Self {
        Self {
            top: Arc::clone(&self.top),
            len: self.len,
        }
    }
}

impl<K: Ord + Clone, V: Clone> Default for LayeredMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord + Clone, V: Clone> LayeredMap<K, V> {
    /// Create an empty map.
    pub fn new() -> Self {
        Self {
            top: Arc::new(Layer::base(BTreeMap::new())),
            len: 0,
        }
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of layers a lookup may visit.
    pub fn depth(&self) -> usize {
        self.top.depth + 1
    }

    /// Look up a key, newest layer first.
    pub fn get(&self, key: &K) -> Option<&V> {
        let mut layer: &Layer<K, V> = &self.top;
        loop {
            if let Some(slot) = layer.entries.get(key) {
                return slot.as_ref();
            }
            match &layer.parent {
                Some(parent) => layer = parent,
                None => return None,
            }
        }
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Derive a new map with a batch of changes applied.
    ///
    /// `Some(value)` inserts or overwrites, `None` removes. Later changes to the
    /// same key win. `max_depth` bounds the layer chain; once exceeded the
    /// whole map is flattened into a single layer.
    pub fn apply<I>(&self, changes: I, max_depth: usize) -> Self
    where
        I: IntoIterator<Item = (K, Option<V>)>,
    {
        let changes: BTreeMap<K, Option<V>> = changes.into_iter().collect();
        if changes.is_empty() {
            return self.clone();
        }

        let mut len = self.len;
        for (key, slot) in &changes {
            match (self.contains_key(key), slot.is_some()) {
                (false, true) => len += 1,
                (true, false) => len -= 1,
                _ => {}
            }
        }

        let mut entries = changes;
        let mut parent = Some(Arc::clone(&self.top));

        // Fold the new layer into parents that are not much larger than it.
        while let Some(p) = parent.clone() {
            if p.entries.len() > 2 * entries.len() {
                break;
            }
            let mut merged = p.entries.clone();
            merged.extend(entries);
            entries = merged;
            parent = p.parent.clone();
        }

        if parent.is_none() {
            entries.retain(|_, slot| slot.is_some());
        }

        let depth = parent.as_ref().map_or(0, |p| p.depth + 1);
        let next = Self {
            top: Arc::new(Layer {
                entries,
                parent,
                depth,
            }),
            len,
        };

        if depth >= max_depth.max(1) {
            next.flatten()
        } else {
            next
        }
    }

    /// Collapse every layer into a single base layer.
    pub fn flatten(&self) -> Self {
        let entries = self
            .iter()
            .map(|(k, v)| (k.clone(), Some(v.clone())))
            .collect();
        Self {
            top: Arc::new(Layer::base(entries)),
            len: self.len,
        }
    }

    /// Iterate live entries in key order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        let mut heads = Vec::with_capacity(self.depth());
        let mut layer: Option<&Layer<K, V>> = Some(&self.top);
        while let Some(l) = layer {
            heads.push(l.entries.iter().peekable());
            layer = l.parent.as_deref();
        }
        Iter { heads }
    }

    /// Iterate live keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.iter().map(|(k, _)| k)
    }
}

impl<K: Ord + Clone, V: Clone + PartialEq> PartialEq for LayeredMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

/// Merged iterator over all layers of a [`LayeredMap`].
///
/// Heads are ordered newest layer first, so on equal keys the first head wins.
pub struct Iter<'a, K, V> {
    heads: Vec<Peekable<btree_map::Iter<'a, K, Option<V>>>>,
}

impl<'a, K: Ord, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let mut winner: Option<(usize, &'a K)> = None;
            for (i, head) in self.heads.iter_mut().enumerate() {
                if let Some((key, _)) = head.peek() {
                    let key: &'a K = *key;
                    match winner {
                        Some((_, best)) if key.cmp(best) != Ordering::Less => {}
                        _ => winner = Some((i, key)),
                    }
                }
            }
            let (index, key) = winner?;

            let mut value = None;
            for (i, head) in self.heads.iter_mut().enumerate() {
                if matches!(head.peek(), Some((k, _)) if *k == key) {
                    if let Some((_, slot)) = head.next() {
                        if i == index {
                            value = slot.as_ref();
                        }
                    }
                }
            }

            if let Some(v) = value {
                return Some((key, v));
            }
        }
    }
}
