//! Shorthand constructors for test data.
//!
//! These panic on invalid input; they are for literals in tests.

use fieldgraph_core::{Entity, EntityId, EntityRef, Observation, Point, Way};
use fieldgraph_mutation::Operation;

pub fn id(raw: &str) -> EntityId {
    EntityId::new(raw).expect("valid test id")
}

pub fn point(raw: &str, lat: f64, lon: f64) -> Entity {
    Point::new(id(raw), lat, lon).expect("valid test point").into()
}

/// A point at an explicit version, as sent by an editor replacing it.
pub fn point_v(raw: &str, version: u64, lat: f64, lon: f64) -> Entity {
    Point::new(id(raw), lat, lon)
        .expect("valid test point")
        .with_version(version)
        .into()
}

pub fn way(raw: &str, nodes: &[&str]) -> Entity {
    Way::new(id(raw), nodes.iter().map(|n| id(n)).collect())
        .expect("valid test way")
        .into()
}

pub fn way_v(raw: &str, version: u64, nodes: &[&str]) -> Entity {
    Way::new(id(raw), nodes.iter().map(|n| id(n)).collect())
        .expect("valid test way")
        .with_version(version)
        .into()
}

/// An observation anchored to an optional point and way.
pub fn observation(raw: &str, point: Option<&str>, way: Option<&str>) -> Entity {
    let mut obs = Observation::new(id(raw));
    if let Some(p) = point {
        obs = obs.at_point(id(p));
    }
    if let Some(w) = way {
        obs = obs.on_way(id(w));
    }
    obs.into()
}

pub fn point_ref(raw: &str) -> EntityRef {
    EntityRef::point(id(raw))
}

pub fn way_ref(raw: &str) -> EntityRef {
    EntityRef::way(id(raw))
}

pub fn observation_ref(raw: &str) -> EntityRef {
    EntityRef::observation(id(raw))
}

pub fn add(entity: Entity) -> Operation {
    Operation::Add(entity)
}

pub fn replace(entity: Entity) -> Operation {
    Operation::Replace(entity)
}

pub fn remove(target: EntityRef) -> Operation {
    Operation::Remove(target)
}
