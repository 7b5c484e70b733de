//! Immutable entity graph snapshots.

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use fieldgraph_core::{
    Entity, EntityId, EntityKind, EntityRef, GraphError, GraphResult, Observation, Point, Way,
};
use log::trace;

use crate::index::ParentIndex;
use crate::layered::LayeredMap;

/// Default number of storage layers a snapshot may stack before it is flattened.
pub const DEFAULT_COMPACTION_THRESHOLD: usize = 32;

/// Selects which entities [`Graph::all_entities`] yields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntityFilter {
    /// Only yield entities of this kind.
    pub kind: Option<EntityKind>,
    /// Also yield tombstones.
    pub include_hidden: bool,
}

impl EntityFilter {
    /// Every live entity.
    pub fn live() -> Self {
        Self::default()
    }

    /// Every entity, tombstones included.
    pub fn everything() -> Self {
        Self {
            kind: None,
            include_hidden: true,
        }
    }

    /// Live entities of one kind.
    pub fn of_kind(kind: EntityKind) -> Self {
        Self {
            kind: Some(kind),
            include_hidden: false,
        }
    }

    pub fn with_hidden(mut self) -> Self {
        self.include_hidden = true;
        self
    }

    pub fn matches(&self, entity: &Entity) -> bool {
        (self.include_hidden || entity.is_visible())
            && self.kind.map_or(true, |kind| entity.kind() == kind)
    }
}

/// One immutable version of the entity graph.
///
/// A `Graph` maps entity refs to entities and keeps two derived indexes:
/// - `parent_ways`: point id -> ids of live ways that include the point
/// - `parent_observations`: point/way ref -> ids of live observations anchored to it
///
/// Tombstoned entities stay retrievable through [`Graph::get`]. Their links
/// are kept apart in the hidden indexes, so they never count as parents but
/// still pin what they reference. Purged refs are remembered as retired
/// together with their last version.
///
/// Deriving a new graph ([`Graph::put`], [`Graph::purge`]) never modifies
/// `self`; unchanged entries and index sets are shared.
#[derive(Debug, Clone)]
pub struct Graph {
    /// Entity storage
    entities: LayeredMap<EntityRef, Arc<Entity>>,
    /// Point id -> Set<Way id>
    parent_ways: ParentIndex<EntityId>,
    /// Point/Way ref -> Set<Observation id>
    parent_observations: ParentIndex<EntityRef>,
    /// Point id -> Set<tombstoned Way id>
    hidden_ways: ParentIndex<EntityId>,
    /// Point/Way ref -> Set<tombstoned Observation id>
    hidden_observations: ParentIndex<EntityRef>,
    /// Purged ref -> last stored version
    retired: LayeredMap<EntityRef, u64>,
    /// Bumped on every derived snapshot
    generation: u64,
    /// Layer depth limit handed to storage
    compaction_threshold: usize,
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl Graph {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self::with_compaction_threshold(DEFAULT_COMPACTION_THRESHOLD)
    }

    /// Create an empty graph whose storage flattens after `threshold` layers.
    pub fn with_compaction_threshold(threshold: usize) -> Self {
        Self {
            entities: LayeredMap::new(),
            parent_ways: ParentIndex::new(),
            parent_observations: ParentIndex::new(),
            hidden_ways: ParentIndex::new(),
            hidden_observations: ParentIndex::new(),
            retired: LayeredMap::new(),
            generation: 0,
            compaction_threshold: threshold.max(1),
        }
    }

    // ==================== Lookups ====================

    /// Get an entity by ref. Tombstones are returned too.
    pub fn get(&self, key: &EntityRef) -> GraphResult<&Entity> {
        self.entities
            .get(key)
            .map(|entity| entity.as_ref())
            .ok_or_else(|| GraphError::NotFound(key.clone()))
    }

    /// Get the shared handle of an entity.
    pub fn get_shared(&self, key: &EntityRef) -> Option<Arc<Entity>> {
        self.entities.get(key).cloned()
    }

    /// Returns true if the ref resolves, tombstones included.
    pub fn has(&self, key: &EntityRef) -> bool {
        self.entities.contains_key(key)
    }

    /// Returns true if the ref resolves to a visible entity.
    pub fn is_live(&self, key: &EntityRef) -> bool {
        self.entities
            .get(key)
            .is_some_and(|entity| entity.is_visible())
    }

    /// Returns true if the ref was purged. A retired ref is never stored again
    /// by a validated mutation.
    pub fn is_retired(&self, key: &EntityRef) -> bool {
        self.retired.contains_key(key)
    }

    /// Version the ref had when it was purged.
    pub fn retired_version(&self, key: &EntityRef) -> Option<u64> {
        self.retired.get(key).copied()
    }

    pub fn point(&self, id: &EntityId) -> Option<&Point> {
        self.lookup(EntityRef::point(id.clone()))
            .and_then(Entity::as_point)
    }

    pub fn way(&self, id: &EntityId) -> Option<&Way> {
        self.lookup(EntityRef::way(id.clone()))
            .and_then(Entity::as_way)
    }

    pub fn observation(&self, id: &EntityId) -> Option<&Observation> {
        self.lookup(EntityRef::observation(id.clone()))
            .and_then(Entity::as_observation)
    }

    fn lookup(&self, key: EntityRef) -> Option<&Entity> {
        self.entities.get(&key).map(|entity| entity.as_ref())
    }

    /// Resolve a way's node list to points, in path order.
    pub fn way_points(&self, way_id: &EntityId) -> GraphResult<Vec<&Point>> {
        let way = self
            .way(way_id)
            .ok_or_else(|| GraphError::NotFound(EntityRef::way(way_id.clone())))?;
        way.nodes()
            .iter()
            .map(|id| {
                self.point(id)
                    .ok_or_else(|| GraphError::NotFound(EntityRef::point(id.clone())))
            })
            .collect()
    }

    // ==================== Index Queries ====================

    /// Ids of live ways that include the point.
    pub fn parent_ways_of(&self, point_id: &EntityId) -> &BTreeSet<EntityId> {
        self.parent_ways.get(point_id)
    }

    /// Ids of live observations anchored to the point or way.
    pub fn parent_observations_of(&self, key: &EntityRef) -> &BTreeSet<EntityId> {
        self.parent_observations.get(key)
    }

    /// Every live entity that references `key`, ordered by kind then id.
    pub fn referrers_of(&self, key: &EntityRef) -> Vec<EntityRef> {
        let ways: Vec<EntityId> = match key.kind {
            EntityKind::Point => self.parent_ways_of(&key.id).iter().cloned().collect(),
            _ => Vec::new(),
        };
        ways.into_iter()
            .map(EntityRef::way)
            .chain(
                self.parent_observations_of(key)
                    .iter()
                    .cloned()
                    .map(EntityRef::observation),
            )
            .collect()
    }

    /// Every tombstoned entity that references `key`, ordered by kind then id.
    pub fn hidden_referrers_of(&self, key: &EntityRef) -> Vec<EntityRef> {
        let ways: Vec<EntityId> = match key.kind {
            EntityKind::Point => self.hidden_ways.get(&key.id).iter().cloned().collect(),
            _ => Vec::new(),
        };
        ways.into_iter()
            .map(EntityRef::way)
            .chain(
                self.hidden_observations
                    .get(key)
                    .iter()
                    .cloned()
                    .map(EntityRef::observation),
            )
            .collect()
    }

    /// Every `(point id, way ids)` entry of the parent-way index.
    pub fn parent_way_entries(&self) -> impl Iterator<Item = (&EntityId, &BTreeSet<EntityId>)> + '_ {
        self.parent_ways.iter()
    }

    /// Every `(ref, observation ids)` entry of the parent-observation index.
    pub fn parent_observation_entries(
        &self,
    ) -> impl Iterator<Item = (&EntityRef, &BTreeSet<EntityId>)> + '_ {
        self.parent_observations.iter()
    }

    /// Every `(point id, tombstoned way ids)` entry.
    pub fn hidden_way_entries(&self) -> impl Iterator<Item = (&EntityId, &BTreeSet<EntityId>)> + '_ {
        self.hidden_ways.iter()
    }

    /// Every `(ref, tombstoned observation ids)` entry.
    pub fn hidden_observation_entries(
        &self,
    ) -> impl Iterator<Item = (&EntityRef, &BTreeSet<EntityId>)> + '_ {
        self.hidden_observations.iter()
    }

    // ==================== Iteration ====================

    /// Entities matching `filter`, ordered by kind then id.
    ///
    /// The iterator is lazy and borrows the snapshot; calling this again
    /// yields the same sequence.
    pub fn all_entities(&self, filter: EntityFilter) -> impl Iterator<Item = &Entity> + '_ {
        self.entities
            .iter()
            .map(|(_, entity)| entity.as_ref())
            .filter(move |entity| filter.matches(entity))
    }

    /// Every live entity.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.all_entities(EntityFilter::live())
    }

    // ==================== Statistics ====================

    /// Number of stored entities, tombstones included.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Count of snapshots derived since the empty graph.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn compaction_threshold(&self) -> usize {
        self.compaction_threshold
    }

    /// Number of storage layers a lookup may visit.
    pub fn storage_depth(&self) -> usize {
        self.entities.depth()
    }

    // ==================== Derivation ====================

    /// Derive a graph with `entity` stored under its ref.
    ///
    /// Inserts or overwrites without any validation and keeps every index
    /// exact: links of the previous value are diffed against the new value's,
    /// so only touched keys change. Storing under a retired ref clears it.
    pub fn put(&self, entity: Entity) -> Graph {
        let key = entity.entity_ref();
        let next = self.relink(&key, self.lookup(key.clone()), Some(&entity));

        let retired = if next.retired.contains_key(&key) {
            next.retired.apply([(key.clone(), None)], self.compaction_threshold)
        } else {
            next.retired.clone()
        };
        Graph {
            entities: next
                .entities
                .apply([(key, Some(Arc::new(entity)))], self.compaction_threshold),
            retired,
            ..next
        }
    }

    /// Derive a graph with the entity under `key` deleted outright and its
    /// ref retired.
    ///
    /// Links the entity held are dropped from the indexes. Links *to* the
    /// entity are left alone; callers check them first.
    pub fn purge(&self, key: &EntityRef) -> Graph {
        let Some(stored) = self.lookup(key.clone()) else {
            return self.clone();
        };
        let version = stored.version();

        let next = self.relink(key, Some(stored), None);
        Graph {
            entities: next
                .entities
                .apply([(key.clone(), None)], self.compaction_threshold),
            retired: next
                .retired
                .apply([(key.clone(), Some(version))], self.compaction_threshold),
            ..next
        }
    }

    fn relink(&self, owner: &EntityRef, previous: Option<&Entity>, current: Option<&Entity>) -> Graph {
        let (live_before, hidden_before) = split_references(previous);
        let (live_after, hidden_after) = split_references(current);

        let (unlinked, linked) = link_changes(owner, &live_before, &live_after, "");
        let (hidden_unlinked, hidden_linked) =
            link_changes(owner, &hidden_before, &hidden_after, "hidden ");

        let mut next = self.clone();
        next.generation += 1;
        let depth = self.compaction_threshold;
        match owner.kind {
            EntityKind::Point => {}
            EntityKind::Way => {
                next.parent_ways = self.parent_ways.update(
                    way_links(owner, unlinked),
                    way_links(owner, linked),
                    depth,
                );
                next.hidden_ways = self.hidden_ways.update(
                    way_links(owner, hidden_unlinked),
                    way_links(owner, hidden_linked),
                    depth,
                );
            }
            EntityKind::Observation => {
                next.parent_observations = self.parent_observations.update(
                    observation_links(owner, unlinked),
                    observation_links(owner, linked),
                    depth,
                );
                next.hidden_observations = self.hidden_observations.update(
                    observation_links(owner, hidden_unlinked),
                    observation_links(owner, hidden_linked),
                    depth,
                );
            }
        }
        next
    }
}

/// References of an entity split by where they are indexed: live entities
/// feed the parent indexes, tombstones the hidden ones.
fn split_references(entity: Option<&Entity>) -> (Vec<EntityRef>, Vec<EntityRef>) {
    match entity {
        Some(entity) if entity.is_visible() => (entity.references(), Vec::new()),
        Some(entity) => (Vec::new(), entity.references()),
        None => (Vec::new(), Vec::new()),
    }
}

/// Distinct refs dropped and gained between two reference lists, in sequence
/// order.
fn link_changes<'r>(
    owner: &EntityRef,
    previous: &'r [EntityRef],
    current: &'r [EntityRef],
    label: &str,
) -> (Vec<&'r EntityRef>, Vec<&'r EntityRef>) {
    let before: HashSet<&EntityRef> = previous.iter().collect();
    let after: HashSet<&EntityRef> = current.iter().collect();

    let mut seen = HashSet::new();
    let dropped: Vec<&EntityRef> = previous
        .iter()
        .filter(|r| !after.contains(r) && seen.insert(*r))
        .collect();
    let mut seen = HashSet::new();
    let gained: Vec<&EntityRef> = current
        .iter()
        .filter(|r| !before.contains(r) && seen.insert(*r))
        .collect();

    for r in &dropped {
        trace!("{label}unlink {owner} -> {r}");
    }
    for r in &gained {
        trace!("{label}link {owner} -> {r}");
    }
    (dropped, gained)
}

fn way_links(owner: &EntityRef, refs: Vec<&EntityRef>) -> Vec<(EntityId, EntityId)> {
    refs.into_iter()
        .filter(|r| r.is_point())
        .map(|r| (r.id.clone(), owner.id.clone()))
        .collect()
}

fn observation_links(owner: &EntityRef, refs: Vec<&EntityRef>) -> Vec<(EntityRef, EntityId)> {
    refs.into_iter()
        .map(|r| (r.clone(), owner.id.clone()))
        .collect()
}

/// Structural equality: same entities, same indexes and same retired refs.
/// The generation counter and storage layout are not compared.
impl PartialEq for Graph {
    fn eq(&self, other: &Self) -> bool {
        self.entities == other.entities
            && self.parent_ways == other.parent_ways
            && self.parent_observations == other.parent_observations
            && self.hidden_ways == other.hidden_ways
            && self.hidden_observations == other.hidden_observations
            && self.retired == other.retired
    }
}
