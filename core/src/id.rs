//! Identity types for fieldgraph entities.
//!
//! Entity ids are strings that are:
//! - Stable across devices (they travel with synced data)
//! - Never reused for a different entity
//! - Namespaced per kind inside a graph (see [`EntityRef`])

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};

use crate::{EntityError, EntityResult};

/// Longest id accepted by [`EntityId::new`].
pub const MAX_ID_LEN: usize = 128;

fn id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9_.:\-]+$").expect("id pattern compiles"))
}

/// Unique identifier of an entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntityId(String);

impl EntityId {
    /// Create an id from a raw string, rejecting empty or ill-formed values.
    pub fn new(raw: impl Into<String>) -> EntityResult<Self> {
        let raw = raw.into();
        if raw.is_empty() || raw.len() > MAX_ID_LEN || !id_pattern().is_match(&raw) {
            return Err(EntityError::malformed("id"));
        }
        Ok(Self(raw))
    }

    /// Generate a fresh random id.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    /// Get the raw string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for EntityId {
    type Error = EntityError;

    fn try_from(raw: String) -> EntityResult<Self> {
        Self::new(raw)
    }
}

impl TryFrom<&str> for EntityId {
    type Error = EntityError;

    fn try_from(raw: &str) -> EntityResult<Self> {
        Self::new(raw)
    }
}

impl From<EntityId> for String {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

impl AsRef<str> for EntityId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The three kinds of entity a graph can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Point,
    Way,
    Observation,
}

impl EntityKind {
    /// All kinds, in dependency order (referenced kinds first).
    pub const ALL: [EntityKind; 3] = [EntityKind::Point, EntityKind::Way, EntityKind::Observation];

    /// Parse a type tag such as `"point"`.
    pub fn parse(tag: &str) -> EntityResult<Self> {
        match tag {
            "point" => Ok(EntityKind::Point),
            "way" => Ok(EntityKind::Way),
            "observation" => Ok(EntityKind::Observation),
            other => Err(EntityError::unknown_kind(other)),
        }
    }

    /// The canonical type tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Point => "point",
            EntityKind::Way => "way",
            EntityKind::Observation => "observation",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = EntityError;

    fn from_str(s: &str) -> EntityResult<Self> {
        Self::parse(s)
    }
}

/// A kind-qualified entity id.
///
/// Graphs key entities by `EntityRef`, so ids only need to be unique within
/// their kind. Ordering is by kind first, then id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityRef {
    pub kind: EntityKind,
    pub id: EntityId,
}

impl EntityRef {
    pub fn new(kind: EntityKind, id: EntityId) -> Self {
        Self { kind, id }
    }

    pub fn point(id: EntityId) -> Self {
        Self::new(EntityKind::Point, id)
    }

    pub fn way(id: EntityId) -> Self {
        Self::new(EntityKind::Way, id)
    }

    pub fn observation(id: EntityId) -> Self {
        Self::new(EntityKind::Observation, id)
    }

    /// Returns true if this refers to a point.
    pub fn is_point(&self) -> bool {
        self.kind == EntityKind::Point
    }

    /// Returns true if this refers to a way.
    pub fn is_way(&self) -> bool {
        self.kind == EntityKind::Way
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind, self.id)
    }
}
