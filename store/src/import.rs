//! Build a graph from stored records.

use fieldgraph_core::{Entity, EntityKind};
use fieldgraph_graph::{Graph, DEFAULT_COMPACTION_THRESHOLD};
use fieldgraph_mutation::Mutator;
use log::info;
use serde::Deserialize;

use crate::error::{ImportError, ImportResult};

/// On-disk document shape: `{ "entities": [ { "type": "point", ... } ] }`.
#[derive(Debug, Deserialize)]
struct Document {
    entities: Vec<serde_json::Value>,
}

/// Fold Add over `records` in dependency order: points, then ways, then
/// observations, keeping input order within a kind.
///
/// The first failing record is reported with its position in `records`.
/// Tombstoned records are added as tombstones; what they reference must be
/// stored too.
pub fn load_graph<I>(records: I) -> ImportResult<Graph>
where
    I: IntoIterator<Item = Entity>,
{
    load_graph_with(records, DEFAULT_COMPACTION_THRESHOLD)
}

/// Like [`load_graph`], with an explicit storage compaction threshold.
pub fn load_graph_with<I>(records: I, compaction_threshold: usize) -> ImportResult<Graph>
where
    I: IntoIterator<Item = Entity>,
{
    let mut ordered: Vec<(usize, Entity)> = records.into_iter().enumerate().collect();
    ordered.sort_by_key(|(_, entity)| entity.kind());

    let mutator = Mutator::default();
    let mut graph = Graph::with_compaction_threshold(compaction_threshold);
    for (index, entity) in ordered {
        graph = mutator
            .add(&graph, entity)
            .map_err(|e| ImportError::record(index, e))?;
    }

    info!(
        "imported {} entities ({} live)",
        graph.len(),
        graph.entities().count()
    );
    Ok(graph)
}

/// Parse a JSON document and load it with [`load_graph`].
///
/// A record whose `type` is not an entity kind fails with
/// `InvalidEntityType`; any other structural problem is a parse error.
pub fn load_graph_json(bytes: &[u8]) -> ImportResult<Graph> {
    let document: Document = serde_json::from_slice(bytes)?;

    let mut records = Vec::with_capacity(document.entities.len());
    for (index, value) in document.entities.into_iter().enumerate() {
        if let Some(tag) = value.get("type").and_then(serde_json::Value::as_str) {
            EntityKind::parse(tag).map_err(|e| ImportError::record(index, e))?;
        }
        let entity: Entity = serde_json::from_value(value)?;
        entity
            .validate()
            .map_err(|e| ImportError::record(index, e))?;
        records.push(entity);
    }

    load_graph(records)
}
