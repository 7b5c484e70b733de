//! Mutator - coordinates mutation operations.
//!
//! The mutator delegates to specialized operation modules in `ops/`:
//! - `ops/add.rs` - ADD (new id)
//! - `ops/replace.rs` - REPLACE (next version)
//! - `ops/remove.rs` - REMOVE (tombstone or purge)
//!
//! Every method is a pure function of its inputs: the input graph is never
//! modified and the same call always yields an equal result.

use fieldgraph_core::{Entity, EntityRef};
use fieldgraph_graph::Graph;

use crate::error::MutationResult;
use crate::operation::Operation;
use crate::ops;
use crate::policy::RemovalPolicy;
use crate::validation::validate_with;

/// Graph mutator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Mutator {
    policy: RemovalPolicy,
}

impl Mutator {
    /// Create a mutator that removes entities according to `policy`.
    pub fn new(policy: RemovalPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> RemovalPolicy {
        self.policy
    }

    /// Insert an entity under a new id.
    pub fn add(&self, graph: &Graph, entity: Entity) -> MutationResult<Graph> {
        ops::execute_add(graph, entity)
    }

    /// Store the next version of an existing entity.
    pub fn replace(&self, graph: &Graph, entity: Entity) -> MutationResult<Graph> {
        ops::execute_replace(graph, entity)
    }

    /// Remove an entity that no live entity references.
    pub fn remove(&self, graph: &Graph, target: &EntityRef) -> MutationResult<Graph> {
        ops::execute_remove(graph, target, self.policy)
    }

    /// Dispatch a single operation.
    pub fn apply(&self, graph: &Graph, op: Operation) -> MutationResult<Graph> {
        match op {
            Operation::Add(entity) => self.add(graph, entity),
            Operation::Replace(entity) => self.replace(graph, entity),
            Operation::Remove(target) => self.remove(graph, &target),
        }
    }

    /// Check `op` the way [`Mutator::apply`] would, without deriving a graph.
    pub fn validate(&self, graph: &Graph, op: &Operation) -> MutationResult<()> {
        validate_with(graph, op, self.policy)
    }

    /// Apply operations in order, all or nothing.
    ///
    /// Each operation is validated against the graph produced by the previous
    /// one. The first failure is returned and no intermediate graph escapes.
    pub fn apply_all<I>(&self, graph: &Graph, ops: I) -> MutationResult<Graph>
    where
        I: IntoIterator<Item = Operation>,
    {
        ops.into_iter()
            .try_fold(graph.clone(), |current, op| self.apply(&current, op))
    }
}
