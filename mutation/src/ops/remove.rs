//! REMOVE operation - tombstones or purges an unreferenced entity.

use fieldgraph_core::EntityRef;
use fieldgraph_graph::Graph;
use log::debug;

use crate::error::MutationResult;
use crate::policy::RemovalPolicy;
use crate::validation::validate_remove;

/// Execute a Remove under `policy`.
pub fn execute_remove(
    graph: &Graph,
    target: &EntityRef,
    policy: RemovalPolicy,
) -> MutationResult<Graph> {
    let stored = validate_remove(graph, target, policy)?;

    let next = match policy {
        RemovalPolicy::Tombstone => graph.put(stored.tombstone()),
        RemovalPolicy::Purge => graph.purge(target),
    };
    debug!(
        "remove {target} ({}) -> generation {}",
        policy.as_str(),
        next.generation()
    );
    Ok(next)
}
