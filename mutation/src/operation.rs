//! Mutation intents.

use fieldgraph_core::{Entity, EntityId, EntityKind, EntityRef};

use crate::error::MutationResult;

/// A single requested change to a graph.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Insert an entity under a new id.
    Add(Entity),
    /// Store the next version of an existing entity.
    Replace(Entity),
    /// Delete an entity.
    Remove(EntityRef),
}

impl Operation {
    /// Build a Remove from an untyped kind tag and id, as received from
    /// string-typed callers.
    pub fn remove_by_tag(kind: &str, id: &str) -> MutationResult<Self> {
        let kind = EntityKind::parse(kind)?;
        let id = EntityId::new(id)?;
        Ok(Operation::Remove(EntityRef::new(kind, id)))
    }

    /// The ref the operation acts on.
    pub fn target(&self) -> EntityRef {
        match self {
            Operation::Add(entity) | Operation::Replace(entity) => entity.entity_ref(),
            Operation::Remove(target) => target.clone(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Operation::Add(_) => "add",
            Operation::Replace(_) => "replace",
            Operation::Remove(_) => "remove",
        }
    }
}
