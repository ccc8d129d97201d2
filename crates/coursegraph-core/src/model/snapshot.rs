//! Immutable snapshot records
//!
//! A snapshot is written once, as a whole, by the snapshot engine. Nothing in
//! this module hands out mutable access to snapshot contents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::item::ItemKind;

/// Header record of a frozen copy of one course
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub id: String,
    pub source_course_id: String,

    /// Course version the copy was taken from
    pub source_version: u64,

    pub created_at: DateTime<Utc>,
    pub item_count: usize,

    /// Sum of the estimated durations of every referenced learning object, in minutes
    pub estimated_duration_minutes: u64,
}

/// Copy of an item, scoped to a snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotItem {
    pub id: String,
    pub snapshot_id: String,
    pub name: String,
    pub kind: ItemKind,
    /// Parent snapshot item
    pub parent_id: Option<String>,
    pub depth: u32,
    pub sort_order: i64,
}

/// Copy of a learning order edge, scoped to a snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotEdge {
    pub id: String,
    pub snapshot_id: String,
    pub from_item_id: Option<String>,
    pub to_item_id: String,
}

impl SnapshotEdge {
    pub fn is_start(&self) -> bool {
        self.from_item_id.is_none()
    }
}

/// A snapshot together with its items and edges
///
/// Items are kept in parent-first order (depth, then sort order).
#[derive(Debug, Clone, PartialEq)]
pub struct FrozenSnapshot {
    snapshot: Snapshot,
    items: Vec<SnapshotItem>,
    edges: Vec<SnapshotEdge>,
    start_target: Option<String>,
    next: HashMap<String, String>,
    /// Item id -> index into `items`
    positions: HashMap<String, usize>,
}

impl FrozenSnapshot {
    /// Assemble a frozen snapshot from its rows
    ///
    /// Used by the snapshot engine after a complete copy and by persistence
    /// layers when reading a snapshot back.
    pub fn from_parts(
        snapshot: Snapshot,
        mut items: Vec<SnapshotItem>,
        edges: Vec<SnapshotEdge>,
    ) -> Self {
        items.sort_by(|a, b| {
            (a.depth, a.sort_order, &a.id).cmp(&(b.depth, b.sort_order, &b.id))
        });
        let positions = items
            .iter()
            .enumerate()
            .map(|(index, item)| (item.id.clone(), index))
            .collect();

        let mut start_target = None;
        let mut next = HashMap::new();
        for edge in &edges {
            match &edge.from_item_id {
                None => start_target = Some(edge.to_item_id.clone()),
                Some(from) => {
                    next.insert(from.clone(), edge.to_item_id.clone());
                }
            }
        }

        Self {
            snapshot,
            items,
            edges,
            start_target,
            next,
            positions,
        }
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn id(&self) -> &str {
        &self.snapshot.id
    }

    pub fn items(&self) -> &[SnapshotItem] {
        &self.items
    }

    pub fn edges(&self) -> &[SnapshotEdge] {
        &self.edges
    }

    pub fn get_item(&self, item_id: &str) -> Option<&SnapshotItem> {
        self.positions.get(item_id).map(|&index| &self.items[index])
    }

    /// Children of a snapshot item (or the roots, for `None`) in sibling order
    pub fn children(&self, parent_id: Option<&str>) -> Vec<&SnapshotItem> {
        let mut children: Vec<&SnapshotItem> = self
            .items
            .iter()
            .filter(|i| i.parent_id.as_deref() == parent_id)
            .collect();
        children.sort_by(|a, b| (a.sort_order, &a.id).cmp(&(b.sort_order, &b.id)));
        children
    }

    pub fn start_target(&self) -> Option<&str> {
        self.start_target.as_deref()
    }

    pub fn next_after(&self, item_id: &str) -> Option<&str> {
        self.next.get(item_id).map(String::as_str)
    }

    pub fn contains_item(&self, item_id: &str) -> bool {
        self.positions.contains_key(item_id)
    }
}
