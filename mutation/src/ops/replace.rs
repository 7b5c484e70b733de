//! REPLACE operation - stores the next version of an entity.

use fieldgraph_core::Entity;
use fieldgraph_graph::Graph;
use log::debug;

use crate::error::MutationResult;
use crate::validation::validate_replace;

/// Execute a Replace. Index links are diffed between the stored and the new
/// version by [`Graph::put`].
pub fn execute_replace(graph: &Graph, entity: Entity) -> MutationResult<Graph> {
    validate_replace(graph, &entity)?;

    let key = entity.entity_ref();
    let version = entity.version();
    let next = graph.put(entity);
    debug!("replace {key} v{version} -> generation {}", next.generation());
    Ok(next)
}
