//! Entity structures for fieldgraph.
//!
//! Points and ways are the geometric entities; observations (see
//! `observation.rs`) are user-authored records anchored to them. All three are
//! immutable values: every edit returns a new value whose `version` is one
//! greater than the original's, leaving the original untouched so that old
//! graph snapshots can keep holding it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::tags::check_tags;
use crate::{EntityError, EntityId, EntityKind, EntityRef, EntityResult, Observation, Tags};

pub(crate) fn first_version() -> u64 {
    1
}

pub(crate) fn visible_by_default() -> bool {
    true
}

/// A WGS84 coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    /// Create a coordinate, rejecting non-finite or out-of-range values.
    pub fn new(lat: f64, lon: f64) -> EntityResult<Self> {
        let location = Self { lat, lon };
        location.check()?;
        Ok(location)
    }

    pub(crate) fn check(&self) -> EntityResult<()> {
        if !self.lat.is_finite() || !(-90.0..=90.0).contains(&self.lat) {
            return Err(EntityError::malformed("lat"));
        }
        if !self.lon.is_finite() || !(-180.0..=180.0).contains(&self.lon) {
            return Err(EntityError::malformed("lon"));
        }
        Ok(())
    }
}

/// A single geographic coordinate entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    id: EntityId,
    #[serde(default = "first_version")]
    version: u64,
    lat: f64,
    lon: f64,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    tags: Tags,
    #[serde(default = "visible_by_default")]
    visible: bool,
}

impl Point {
    /// Create a new point at version 1.
    pub fn new(id: EntityId, lat: f64, lon: f64) -> EntityResult<Self> {
        let location = LatLon::new(lat, lon)?;
        Ok(Self {
            id,
            version: first_version(),
            lat: location.lat,
            lon: location.lon,
            tags: Tags::new(),
            visible: true,
        })
    }

    /// Set the tags while building a point.
    pub fn with_tags(mut self, tags: Tags) -> EntityResult<Self> {
        check_tags(&tags).map_err(EntityError::malformed)?;
        self.tags = tags;
        Ok(self)
    }

    /// Set the version while building a point (e.g. when loading stored data).
    pub fn with_version(mut self, version: u64) -> Self {
        self.version = version;
        self
    }

    pub fn id(&self) -> &EntityId {
        &self.id
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }

    pub fn location(&self) -> LatLon {
        LatLon {
            lat: self.lat,
            lon: self.lon,
        }
    }

    pub fn tags(&self) -> &Tags {
        &self.tags
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// A copy moved to a new coordinate.
    pub fn relocate(&self, lat: f64, lon: f64) -> EntityResult<Self> {
        let location = LatLon::new(lat, lon)?;
        let mut next = self.successor();
        next.lat = location.lat;
        next.lon = location.lon;
        Ok(next)
    }

    /// A copy with its tags replaced.
    pub fn retag(&self, tags: Tags) -> EntityResult<Self> {
        check_tags(&tags).map_err(EntityError::malformed)?;
        let mut next = self.successor();
        next.tags = tags;
        Ok(next)
    }

    /// Check the required fields.
    pub fn validate(&self) -> EntityResult<()> {
        check_version(self.version)?;
        self.location().check()?;
        check_tags(&self.tags).map_err(EntityError::malformed)
    }

    fn successor(&self) -> Self {
        let mut next = self.clone();
        next.version += 1;
        next
    }
}

/// An ordered sequence of points forming a line or an area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Way {
    id: EntityId,
    #[serde(default = "first_version")]
    version: u64,
    nodes: Vec<EntityId>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    tags: Tags,
    #[serde(default = "visible_by_default")]
    visible: bool,
}

impl Way {
    /// Create a new way at version 1. The node list must not be empty.
    pub fn new(id: EntityId, nodes: Vec<EntityId>) -> EntityResult<Self> {
        if nodes.is_empty() {
            return Err(EntityError::malformed("nodes"));
        }
        Ok(Self {
            id,
            version: first_version(),
            nodes,
            tags: Tags::new(),
            visible: true,
        })
    }

    /// Set the tags while building a way.
    pub fn with_tags(mut self, tags: Tags) -> EntityResult<Self> {
        check_tags(&tags).map_err(EntityError::malformed)?;
        self.tags = tags;
        Ok(self)
    }

    /// Set the version while building a way.
    pub fn with_version(mut self, version: u64) -> Self {
        self.version = version;
        self
    }

    pub fn id(&self) -> &EntityId {
        &self.id
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Point ids in path order.
    pub fn nodes(&self) -> &[EntityId] {
        &self.nodes
    }

    pub fn tags(&self) -> &Tags {
        &self.tags
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Returns true if this way includes the given point.
    pub fn contains(&self, point: &EntityId) -> bool {
        self.nodes.contains(point)
    }

    /// Returns true if the way is a closed ring (an area outline).
    pub fn is_closed(&self) -> bool {
        self.nodes.len() >= 4 && self.nodes.first() == self.nodes.last()
    }

    /// A copy following a different node list.
    pub fn renode(&self, nodes: Vec<EntityId>) -> EntityResult<Self> {
        if nodes.is_empty() {
            return Err(EntityError::malformed("nodes"));
        }
        let mut next = self.successor();
        next.nodes = nodes;
        Ok(next)
    }

    /// A copy with its tags replaced.
    pub fn retag(&self, tags: Tags) -> EntityResult<Self> {
        check_tags(&tags).map_err(EntityError::malformed)?;
        let mut next = self.successor();
        next.tags = tags;
        Ok(next)
    }

    /// Check the required fields.
    pub fn validate(&self) -> EntityResult<()> {
        check_version(self.version)?;
        if self.nodes.is_empty() {
            return Err(EntityError::malformed("nodes"));
        }
        check_tags(&self.tags).map_err(EntityError::malformed)
    }

    fn successor(&self) -> Self {
        let mut next = self.clone();
        next.version += 1;
        next
    }
}

pub(crate) fn check_version(version: u64) -> EntityResult<()> {
    if version == 0 {
        return Err(EntityError::malformed("version"));
    }
    Ok(())
}

/// Any entity a graph can hold.
///
/// The union is closed: code that needs per-kind behaviour matches on it
/// exhaustively instead of probing types at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Entity {
    Point(Point),
    Way(Way),
    Observation(Observation),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Point(_) => EntityKind::Point,
            Entity::Way(_) => EntityKind::Way,
            Entity::Observation(_) => EntityKind::Observation,
        }
    }

    pub fn id(&self) -> &EntityId {
        match self {
            Entity::Point(p) => p.id(),
            Entity::Way(w) => w.id(),
            Entity::Observation(o) => o.id(),
        }
    }

    pub fn version(&self) -> u64 {
        match self {
            Entity::Point(p) => p.version(),
            Entity::Way(w) => w.version(),
            Entity::Observation(o) => o.version(),
        }
    }

    /// The kind-qualified key this entity is stored under.
    pub fn entity_ref(&self) -> EntityRef {
        EntityRef::new(self.kind(), self.id().clone())
    }

    /// Returns false for tombstones.
    pub fn is_visible(&self) -> bool {
        match self {
            Entity::Point(p) => p.is_visible(),
            Entity::Way(w) => w.is_visible(),
            Entity::Observation(o) => o.is_visible(),
        }
    }

    pub fn tags(&self) -> &Tags {
        match self {
            Entity::Point(p) => p.tags(),
            Entity::Way(w) => w.tags(),
            Entity::Observation(o) => o.tags(),
        }
    }

    /// Entities this one references, in sequence order.
    ///
    /// A way yields its points in path order (repeats included, e.g. the
    /// closing point of a ring); an observation yields its point anchor, then
    /// its way anchor.
    pub fn references(&self) -> Vec<EntityRef> {
        match self {
            Entity::Point(_) => Vec::new(),
            Entity::Way(w) => w.nodes().iter().cloned().map(EntityRef::point).collect(),
            Entity::Observation(o) => o.references(),
        }
    }

    /// Check the required fields of the wrapped entity.
    pub fn validate(&self) -> EntityResult<()> {
        match self {
            Entity::Point(p) => p.validate(),
            Entity::Way(w) => w.validate(),
            Entity::Observation(o) => o.validate(),
        }
    }

    /// A copy marked deleted, one version later.
    pub fn tombstone(&self) -> Self {
        self.with_visibility(false)
    }

    /// A copy of a tombstone brought back, one version later.
    pub fn restore(&self) -> Self {
        self.with_visibility(true)
    }

    fn with_visibility(&self, visible: bool) -> Self {
        match self {
            Entity::Point(p) => {
                let mut next = p.successor();
                next.visible = visible;
                Entity::Point(next)
            }
            Entity::Way(w) => {
                let mut next = w.successor();
                next.visible = visible;
                Entity::Way(next)
            }
            Entity::Observation(o) => Entity::Observation(o.with_visibility(visible)),
        }
    }

    pub fn as_point(&self) -> Option<&Point> {
        match self {
            Entity::Point(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_way(&self) -> Option<&Way> {
        match self {
            Entity::Way(w) => Some(w),
            _ => None,
        }
    }

    pub fn as_observation(&self) -> Option<&Observation> {
        match self {
            Entity::Observation(o) => Some(o),
            _ => None,
        }
    }
}

impl From<Point> for Entity {
    fn from(point: Point) -> Self {
        Entity::Point(point)
    }
}

impl From<Way> for Entity {
    fn from(way: Way) -> Self {
        Entity::Way(way)
    }
}

impl From<Observation> for Entity {
    fn from(observation: Observation) -> Self {
        Entity::Observation(observation)
    }
}
