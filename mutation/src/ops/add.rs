//! ADD operation - inserts an entity under a new id.

use fieldgraph_core::Entity;
use fieldgraph_graph::Graph;
use log::debug;

use crate::error::MutationResult;
use crate::validation::validate_add;

/// Execute an Add.
pub fn execute_add(graph: &Graph, entity: Entity) -> MutationResult<Graph> {
    validate_add(graph, &entity)?;

    let key = entity.entity_ref();
    let next = graph.put(entity);
    debug!("add {key} -> generation {}", next.generation());
    Ok(next)
}
