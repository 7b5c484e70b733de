//! Single-committer graph store.

use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use fieldgraph_graph::Graph;
use fieldgraph_history::History;
use fieldgraph_mutation::{Mutator, Operation};
use log::{debug, warn};

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};

/// The writer lane: everything a commit touches besides the published pointer.
#[derive(Debug)]
struct Writer {
    history: History,
    mutator: Mutator,
}

/// Publishes graph snapshots to concurrent readers.
///
/// Writers serialize through one lane. Each accepted mutation is recorded in
/// the history and then published with a single pointer swap, so a reader
/// calling [`GraphStore::snapshot`] always gets a complete, valid graph.
/// Lock order is writer lane, then published pointer.
#[derive(Debug)]
pub struct GraphStore {
    published: RwLock<Arc<Graph>>,
    writer: Mutex<Writer>,
    config: StoreConfig,
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}

impl GraphStore {
    /// Create a store holding an empty graph.
    pub fn new(config: StoreConfig) -> Self {
        let graph = Graph::with_compaction_threshold(config.compaction_threshold);
        Self::with_graph(graph, config)
    }

    /// Create a store whose first snapshot is `graph`, e.g. one produced by
    /// [`load_graph`](crate::load_graph).
    pub fn with_graph(graph: impl Into<Arc<Graph>>, config: StoreConfig) -> Self {
        let graph = graph.into();
        Self {
            published: RwLock::new(Arc::clone(&graph)),
            writer: Mutex::new(Writer {
                history: History::with_max_depth(graph, config.history_depth),
                mutator: Mutator::new(config.removal_policy),
            }),
            config,
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// The currently published snapshot.
    pub fn snapshot(&self) -> StoreResult<Arc<Graph>> {
        let published = self
            .published
            .read()
            .map_err(|_| StoreError::poisoned("published"))?;
        Ok(Arc::clone(&*published))
    }

    /// Apply one operation, commit and publish the result.
    pub fn apply(&self, op: Operation) -> StoreResult<Arc<Graph>> {
        self.commit(None, |mutator, graph| mutator.apply(graph, op))
    }

    /// Like [`GraphStore::apply`], labelling the history entry.
    pub fn apply_labeled(&self, op: Operation, label: &str) -> StoreResult<Arc<Graph>> {
        self.commit(Some(label), |mutator, graph| mutator.apply(graph, op))
    }

    /// Apply a batch as one history step. Nothing is published unless every
    /// operation succeeds.
    pub fn apply_all<I>(&self, ops: I) -> StoreResult<Arc<Graph>>
    where
        I: IntoIterator<Item = Operation>,
    {
        self.commit(None, |mutator, graph| mutator.apply_all(graph, ops))
    }

    /// Revert to the previous snapshot and publish it.
    pub fn undo(&self) -> StoreResult<Arc<Graph>> {
        let mut writer = self.lock_writer()?;
        let graph = writer.history.undo()?;
        self.publish(&graph)?;
        debug!("undo -> generation {}", graph.generation());
        Ok(graph)
    }

    /// Reapply the next snapshot and publish it.
    pub fn redo(&self) -> StoreResult<Arc<Graph>> {
        let mut writer = self.lock_writer()?;
        let graph = writer.history.redo()?;
        self.publish(&graph)?;
        debug!("redo -> generation {}", graph.generation());
        Ok(graph)
    }

    pub fn can_undo(&self) -> StoreResult<bool> {
        Ok(self.lock_writer()?.history.can_undo())
    }

    pub fn can_redo(&self) -> StoreResult<bool> {
        Ok(self.lock_writer()?.history.can_redo())
    }

    fn commit<F>(&self, label: Option<&str>, mutate: F) -> StoreResult<Arc<Graph>>
    where
        F: FnOnce(&Mutator, &Graph) -> fieldgraph_mutation::MutationResult<Graph>,
    {
        let mut writer = self.lock_writer()?;
        let current = writer.history.current();

        let next = match mutate(&writer.mutator, &*current) {
            Ok(next) => next,
            Err(e) => {
                warn!("mutation rejected: {e}");
                return Err(e.into());
            }
        };

        // Nothing was derived (an empty batch): keep history as it is.
        if next.generation() == current.generation() {
            debug!("nothing to commit");
            return Ok(current);
        }

        let next = match label {
            Some(label) => writer.history.commit_labeled(next, label),
            None => writer.history.commit(next),
        };
        self.publish(&next)?;
        Ok(next)
    }

    fn publish(&self, graph: &Arc<Graph>) -> StoreResult<()> {
        let mut published = self
            .published
            .write()
            .map_err(|_| StoreError::poisoned("published"))?;
        *published = Arc::clone(graph);
        Ok(())
    }

    fn lock_writer(&self) -> StoreResult<MutexGuard<'_, Writer>> {
        self.writer
            .lock()
            .map_err(|_| StoreError::poisoned("writer"))
    }
}
