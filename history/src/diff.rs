//! Entity-level differences between two snapshots.

use std::cmp::Ordering;
use std::iter::Peekable;

use fieldgraph_core::{Entity, EntityRef};
use fieldgraph_graph::{EntityFilter, Graph};

/// Refs whose live state differs between two snapshots, each in (kind, id)
/// order.
///
/// Liveness decides the bucket: an entity that became live (new, or a
/// restored tombstone) is `created`; one that stopped being live (tombstoned
/// or purged) is `deleted`; one live on both sides with a different value is
/// `modified`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diff {
    pub created: Vec<EntityRef>,
    pub modified: Vec<EntityRef>,
    pub deleted: Vec<EntityRef>,
}

impl Diff {
    /// Compare `from` with `to`.
    ///
    /// Entries shared between the snapshots are skipped by pointer, so the
    /// cost follows the size of both snapshots but values are only compared
    /// where storage diverged.
    pub fn between(from: &Graph, to: &Graph) -> Self {
        let mut diff = Diff::default();
        let mut left = from.all_entities(EntityFilter::everything()).peekable();
        let mut right = to.all_entities(EntityFilter::everything()).peekable();

        while let Some(step) = merge_step(&mut left, &mut right) {
            match step {
                Step::Removed(old) => {
                    if old.is_visible() {
                        diff.deleted.push(old.entity_ref());
                    }
                }
                Step::Added(new) => {
                    if new.is_visible() {
                        diff.created.push(new.entity_ref());
                    }
                }
                Step::Both(old, new) => {
                    if std::ptr::eq(old, new) {
                        continue;
                    }
                    match (old.is_visible(), new.is_visible()) {
                        (true, false) => diff.deleted.push(new.entity_ref()),
                        (false, true) => diff.created.push(new.entity_ref()),
                        (true, true) if old != new => diff.modified.push(new.entity_ref()),
                        _ => {}
                    }
                }
            }
        }
        diff
    }

    pub fn is_empty(&self) -> bool {
        self.created.is_empty() && self.modified.is_empty() && self.deleted.is_empty()
    }

    /// Total number of changed refs.
    pub fn len(&self) -> usize {
        self.created.len() + self.modified.len() + self.deleted.len()
    }
}

/// Compare two snapshots. See [`Diff::between`].
pub fn diff(from: &Graph, to: &Graph) -> Diff {
    Diff::between(from, to)
}

enum Step<'a> {
    Removed(&'a Entity),
    Added(&'a Entity),
    Both(&'a Entity, &'a Entity),
}

/// Pop the next key from two (kind, id)-ordered entity streams.
fn merge_step<'a, L, R>(left: &mut Peekable<L>, right: &mut Peekable<R>) -> Option<Step<'a>>
where
    L: Iterator<Item = &'a Entity>,
    R: Iterator<Item = &'a Entity>,
{
    let order = match (left.peek(), right.peek()) {
        (None, None) => return None,
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (Some(l), Some(r)) => l.entity_ref().cmp(&r.entity_ref()),
    };
    match order {
        Ordering::Less => left.next().map(Step::Removed),
        Ordering::Greater => right.next().map(Step::Added),
        Ordering::Equal => left.next().zip(right.next()).map(|(l, r)| Step::Both(l, r)),
    }
}
