//! Hand snapshots to the persistence/sync layer.

use fieldgraph_core::Entity;
use fieldgraph_graph::{EntityFilter, Graph};
use log::info;
use serde::Serialize;

#[derive(Serialize)]
struct DocumentRef<'a> {
    entities: Vec<&'a Entity>,
}

/// Every entity in (kind, id) order, tombstones included so that sync sees
/// deletions.
pub fn snapshot_entities(graph: &Graph) -> Vec<Entity> {
    graph
        .all_entities(EntityFilter::everything())
        .cloned()
        .collect()
}

/// Serialize a snapshot in the document shape [`load_graph_json`] reads.
///
/// [`load_graph_json`]: crate::load_graph_json
pub fn export_json(graph: &Graph) -> serde_json::Result<Vec<u8>> {
    let document = DocumentRef {
        entities: graph.all_entities(EntityFilter::everything()).collect(),
    };
    let bytes = serde_json::to_vec_pretty(&document)?;
    info!(
        "exported {} entities ({} bytes)",
        document.entities.len(),
        bytes.len()
    );
    Ok(bytes)
}
