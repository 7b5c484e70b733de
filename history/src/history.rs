//! Snapshot stack with an undo/redo cursor.

use std::collections::VecDeque;
use std::sync::Arc;

use fieldgraph_graph::Graph;
use log::info;

use crate::diff::Diff;
use crate::error::{HistoryError, HistoryResult};

/// Default number of undo steps retained.
pub const DEFAULT_MAX_DEPTH: usize = 100;

/// A recorded snapshot.
#[derive(Debug, Clone)]
struct Entry {
    graph: Arc<Graph>,
    label: Option<String>,
}

/// Ordered graph snapshots with a cursor.
///
/// Snapshots are shared: a reader holding an `Arc<Graph>` handed out by the
/// history keeps it alive after the history drops it.
#[derive(Debug, Clone)]
pub struct History {
    /// Oldest first; never empty.
    entries: VecDeque<Entry>,
    /// Index of the current snapshot.
    cursor: usize,
    /// Undo steps retained; 0 keeps everything.
    max_depth: usize,
}

impl History {
    /// Create a history whose only snapshot is `initial`.
    pub fn new(initial: impl Into<Arc<Graph>>) -> Self {
        Self::with_max_depth(initial, DEFAULT_MAX_DEPTH)
    }

    /// Create a history that retains at most `max_depth` undo steps.
    pub fn with_max_depth(initial: impl Into<Arc<Graph>>, max_depth: usize) -> Self {
        let mut entries = VecDeque::new();
        entries.push_back(Entry {
            graph: initial.into(),
            label: None,
        });
        Self {
            entries,
            cursor: 0,
            max_depth,
        }
    }

    /// Push a snapshot after the cursor, discarding the redo tail.
    pub fn commit(&mut self, graph: impl Into<Arc<Graph>>) -> Arc<Graph> {
        self.push(graph.into(), None)
    }

    /// Like [`History::commit`], with a label describing the edit.
    pub fn commit_labeled(
        &mut self,
        graph: impl Into<Arc<Graph>>,
        label: impl Into<String>,
    ) -> Arc<Graph> {
        self.push(graph.into(), Some(label.into()))
    }

    fn push(&mut self, graph: Arc<Graph>, label: Option<String>) -> Arc<Graph> {
        self.entries.truncate(self.cursor + 1);
        self.entries.push_back(Entry {
            graph: Arc::clone(&graph),
            label,
        });
        self.cursor = self.entries.len() - 1;

        if self.max_depth > 0 && self.entries.len() > self.max_depth + 1 {
            let excess = self.entries.len() - (self.max_depth + 1);
            self.entries.drain(..excess);
            self.cursor -= excess;
            info!("history truncated: dropped {excess} oldest snapshot(s)");
        }
        graph
    }

    /// Step back one snapshot and return it.
    pub fn undo(&mut self) -> HistoryResult<Arc<Graph>> {
        if !self.can_undo() {
            return Err(HistoryError::NothingToUndo);
        }
        self.cursor -= 1;
        Ok(self.current())
    }

    /// Step forward one snapshot and return it.
    pub fn redo(&mut self) -> HistoryResult<Arc<Graph>> {
        if !self.can_redo() {
            return Err(HistoryError::NothingToRedo);
        }
        self.cursor += 1;
        Ok(self.current())
    }

    /// The snapshot at the cursor.
    pub fn current(&self) -> Arc<Graph> {
        Arc::clone(&self.entries[self.cursor].graph)
    }

    /// Label of the commit that produced the current snapshot.
    pub fn current_label(&self) -> Option<&str> {
        self.entries[self.cursor].label.as_deref()
    }

    /// Label of the edit the next undo reverts.
    pub fn undo_label(&self) -> Option<&str> {
        if self.can_undo() {
            self.current_label()
        } else {
            None
        }
    }

    /// Label of the edit the next redo reapplies.
    pub fn redo_label(&self) -> Option<&str> {
        self.entries
            .get(self.cursor + 1)
            .and_then(|entry| entry.label.as_deref())
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// Number of retained snapshots.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// What the next undo would change, seen from the current snapshot.
    pub fn undo_diff(&self) -> Option<Diff> {
        let previous = self.entries.get(self.cursor.checked_sub(1)?)?;
        Some(Diff::between(&self.entries[self.cursor].graph, &previous.graph))
    }
}
