//! Integrity rules shared by every mutation.
//!
//! `validate` inspects a graph and an operation and never derives anything.
//! An operation that passes can be applied with the graph's raw `put`/`purge`
//! primitives and the result keeps every invariant:
//! - live ways and observations only reference live entities
//! - tombstoned ways and observations only reference stored entities
//! - parent indexes only hold live referrers
//! - versions advance by exactly one per stored change
//! - an id is never added twice, tombstoned and purged ids included

use fieldgraph_core::{Entity, EntityRef};
use fieldgraph_graph::Graph;

use crate::error::{MutationError, MutationResult};
use crate::operation::Operation;
use crate::policy::RemovalPolicy;

/// Check `op` against `graph`, removing with the default policy.
pub fn validate(graph: &Graph, op: &Operation) -> MutationResult<()> {
    validate_with(graph, op, RemovalPolicy::default())
}

/// Check `op` against `graph` for a mutator removing under `policy`.
pub fn validate_with(graph: &Graph, op: &Operation, policy: RemovalPolicy) -> MutationResult<()> {
    match op {
        Operation::Add(entity) => validate_add(graph, entity),
        Operation::Replace(entity) => validate_replace(graph, entity),
        Operation::Remove(target) => validate_remove(graph, target, policy).map(|_| ()),
    }
}

pub(crate) fn validate_add(graph: &Graph, entity: &Entity) -> MutationResult<()> {
    entity.validate()?;

    let key = entity.entity_ref();
    if graph.has(&key) || graph.is_retired(&key) {
        return Err(MutationError::DuplicateId(key));
    }

    check_references(graph, entity)
}

pub(crate) fn validate_replace(graph: &Graph, entity: &Entity) -> MutationResult<()> {
    entity.validate()?;

    let key = entity.entity_ref();
    let stored = graph
        .get(&key)
        .map_err(|_| MutationError::UnknownId(key.clone()))?;

    let expected = stored.version() + 1;
    if entity.version() != expected {
        return Err(MutationError::version_conflict(
            key,
            expected,
            entity.version(),
        ));
    }

    check_references(graph, entity)?;

    // Hiding an entity through Replace is a removal and gets the same guard.
    if stored.is_visible() && !entity.is_visible() {
        check_unreferenced(graph, &key)?;
    }
    Ok(())
}

/// Returns the live entity that Remove would delete.
///
/// A purge also has to leave tombstones that still name the target intact.
pub(crate) fn validate_remove<'g>(
    graph: &'g Graph,
    target: &EntityRef,
    policy: RemovalPolicy,
) -> MutationResult<&'g Entity> {
    let stored = match graph.get(target) {
        Ok(entity) if entity.is_visible() => entity,
        _ => return Err(MutationError::UnknownId(target.clone())),
    };

    check_unreferenced(graph, target)?;
    if policy == RemovalPolicy::Purge {
        let hidden = graph.hidden_referrers_of(target);
        if !hidden.is_empty() {
            return Err(MutationError::entity_in_use(target.clone(), hidden));
        }
    }
    Ok(stored)
}

/// References of a live entity must resolve to live entities, those of a
/// tombstone to stored ones. The first failure in sequence order is reported.
fn check_references(graph: &Graph, entity: &Entity) -> MutationResult<()> {
    let resolves = |r: &EntityRef| {
        if entity.is_visible() {
            graph.is_live(r)
        } else {
            graph.has(r)
        }
    };
    match entity {
        Entity::Point(_) => Ok(()),
        Entity::Way(_) | Entity::Observation(_) => entity
            .references()
            .into_iter()
            .find(|r| !resolves(r))
            .map_or(Ok(()), |missing| {
                Err(MutationError::DanglingReference(missing))
            }),
    }
}

fn check_unreferenced(graph: &Graph, target: &EntityRef) -> MutationResult<()> {
    let referencing = graph.referrers_of(target);
    if referencing.is_empty() {
        Ok(())
    } else {
        Err(MutationError::entity_in_use(target.clone(), referencing))
    }
}
