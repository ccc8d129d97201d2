//! Lazy traversal of a learning order chain
//!
//! Live courses and frozen snapshots share one traversal. Each exposes its
//! chain through [`ChainSource`]: where the walk starts and which item follows
//! a given one.

use std::collections::HashSet;

use crate::model::FrozenSnapshot;
use crate::ops::Store;

/// Read access to a chain's start pointer and successor map
pub trait ChainSource<'a>: Copy {
    /// Target of the start edge, if the chain has one
    fn start(&self) -> Option<&'a str>;

    /// Item following `item_id`, if any
    fn next(&self, item_id: &str) -> Option<&'a str>;
}

/// Chain of a live course
#[derive(Debug, Clone, Copy)]
pub struct LiveChain<'a> {
    store: &'a Store,
    course_id: &'a str,
}

impl<'a> LiveChain<'a> {
    pub fn new(store: &'a Store, course_id: &'a str) -> Self {
        Self { store, course_id }
    }
}

impl<'a> ChainSource<'a> for LiveChain<'a> {
    fn start(&self) -> Option<&'a str> {
        self.store
            .start_edge(self.course_id)
            .map(|e| e.to_item_id.as_str())
    }

    fn next(&self, item_id: &str) -> Option<&'a str> {
        self.store.next_item(item_id)
    }
}

/// Chain frozen inside a snapshot
#[derive(Debug, Clone, Copy)]
pub struct SnapshotChain<'a> {
    snapshot: &'a FrozenSnapshot,
}

impl<'a> SnapshotChain<'a> {
    pub fn new(snapshot: &'a FrozenSnapshot) -> Self {
        Self { snapshot }
    }
}

impl<'a> ChainSource<'a> for SnapshotChain<'a> {
    fn start(&self) -> Option<&'a str> {
        self.snapshot.start_target()
    }

    fn next(&self, item_id: &str) -> Option<&'a str> {
        self.snapshot.next_after(item_id)
    }
}

/// Item ids in learning order, produced on demand
///
/// Follows successors from the start target until an item has none. The
/// sequence is finite even over a corrupted chain: an item already yielded
/// ends the walk. Call [`OrderedSequence::restart`] to walk again from the start.
///
/// Borrows the underlying store or snapshot, so the chain cannot change
/// while a sequence is alive.
#[derive(Debug, Clone)]
pub struct OrderedSequence<'a, S: ChainSource<'a>> {
    source: S,
    first: Option<&'a str>,
    current: Option<&'a str>,
    visited: HashSet<&'a str>,
}

impl<'a, S: ChainSource<'a>> OrderedSequence<'a, S> {
    pub fn new(source: S) -> Self {
        let first = source.start();
        Self {
            source,
            first,
            current: first,
            visited: HashSet::new(),
        }
    }

    /// Rewind to the start target
    pub fn restart(&mut self) {
        self.current = self.first;
        self.visited.clear();
    }

    pub fn first(&self) -> Option<&'a str> {
        self.first
    }
}

impl<'a, S: ChainSource<'a>> Iterator for OrderedSequence<'a, S> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current.take()?;
        if !self.visited.insert(id) {
            return None;
        }
        self.current = self.source.next(id);
        Some(id)
    }
}
