use std::collections::HashMap;

use crate::config::GraphConfig;
use crate::errors::{CourseGraphError, Result};
use crate::model::{Course, Edge, FrozenSnapshot, Item, Snapshot};

/// In-memory arena for courses, items, edges and snapshots
///
/// Items and edges are keyed by stable identifiers. Structural relations are
/// indices next to the arena rather than references inside entities:
/// - `children`: parent item id → child item ids
/// - `roots`: course id → root item ids
/// - `outgoing` / `incoming`: item id → id of the edge leaving / entering it
/// - `starts`: course id → id of the course's start edge
///
/// Not thread-safe. Callers serialize access per course (see the engine crate).
#[derive(Debug, Clone, Default)]
pub struct Store {
    pub(crate) config: GraphConfig,
    pub(crate) courses: HashMap<String, Course>,
    pub(crate) items: HashMap<String, Item>,
    pub(crate) children: HashMap<String, Vec<String>>,
    pub(crate) roots: HashMap<String, Vec<String>>,
    pub(crate) edges: HashMap<String, Edge>,
    pub(crate) outgoing: HashMap<String, String>,
    pub(crate) incoming: HashMap<String, String>,
    pub(crate) starts: HashMap<String, String>,
    pub(crate) snapshots: HashMap<String, FrozenSnapshot>,
    /// Snapshot item id → owning snapshot id
    pub(crate) snapshot_items: HashMap<String, String>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: GraphConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    // ----- courses -----

    /// Register a course
    ///
    /// # Errors
    ///
    /// Returns `CourseAlreadyExists` if the id is taken, or `SnapshotImmutable`
    /// if it names a snapshot.
    pub fn insert_course(&mut self, course: Course) -> Result<()> {
        self.guard_not_snapshot(&course.id)?;
        if self.courses.contains_key(&course.id) {
            return Err(CourseGraphError::CourseAlreadyExists {
                course_id: course.id,
            });
        }
        self.courses.insert(course.id.clone(), course);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `CourseNotFound` if the course is not registered.
    pub fn get_course(&self, course_id: &str) -> Result<&Course> {
        self.courses
            .get(course_id)
            .ok_or_else(|| CourseGraphError::CourseNotFound {
                course_id: course_id.to_string(),
            })
    }

    /// Resolve a course that is about to be mutated
    ///
    /// # Errors
    ///
    /// Returns `SnapshotImmutable` if the id names a snapshot, otherwise
    /// `CourseNotFound` if the course is not registered.
    pub fn live_course(&self, course_id: &str) -> Result<&Course> {
        self.guard_not_snapshot(course_id)?;
        self.get_course(course_id)
    }

    /// Bump the version of a course after a successful mutation
    pub(crate) fn touch_course(&mut self, course_id: &str) {
        if let Some(course) = self.courses.get_mut(course_id) {
            course.bump_version();
        }
    }

    // ----- items -----

    /// # Errors
    ///
    /// Returns `ItemNotFound` if no live item has this id.
    pub fn get_item(&self, item_id: &str) -> Result<&Item> {
        self.items
            .get(item_id)
            .ok_or_else(|| CourseGraphError::ItemNotFound {
                item_id: item_id.to_string(),
            })
    }

    /// Resolve an item that is about to be mutated or linked
    ///
    /// # Errors
    ///
    /// Returns `SnapshotImmutable` if the id names a snapshot item, otherwise
    /// `ItemNotFound` if the item does not exist.
    pub fn live_item(&self, item_id: &str) -> Result<&Item> {
        self.guard_not_snapshot(item_id)?;
        self.get_item(item_id)
    }

    pub(crate) fn get_item_mut(&mut self, item_id: &str) -> Result<&mut Item> {
        self.items
            .get_mut(item_id)
            .ok_or_else(|| CourseGraphError::ItemNotFound {
                item_id: item_id.to_string(),
            })
    }

    /// All items of a course, in no particular order
    pub fn items_in_course(&self, course_id: &str) -> Vec<&Item> {
        self.items
            .values()
            .filter(|i| i.course_id == course_id)
            .collect()
    }

    /// All items of a course with every parent before its children
    /// (depth ascending, then sort order, then id)
    pub fn items_parent_first(&self, course_id: &str) -> Vec<&Item> {
        let mut items = self.items_in_course(course_id);
        items.sort_by(|a, b| (a.depth, a.sort_order, &a.id).cmp(&(b.depth, b.sort_order, &b.id)));
        items
    }

    /// Child ids of a parent (or the roots of a course, for `None`) in sibling order
    pub fn child_ids(&self, course_id: &str, parent_id: Option<&str>) -> Vec<&str> {
        let ids = match parent_id {
            Some(pid) => self.children.get(pid),
            None => self.roots.get(course_id),
        };
        let mut siblings: Vec<&Item> = ids
            .map(|ids| ids.iter().filter_map(|id| self.items.get(id)).collect())
            .unwrap_or_default();
        siblings.sort_by(|a, b| (a.sort_order, &a.id).cmp(&(b.sort_order, &b.id)));
        siblings.into_iter().map(|i| i.id.as_str()).collect()
    }

    pub fn child_count(&self, item_id: &str) -> usize {
        self.children.get(item_id).map_or(0, Vec::len)
    }

    /// Insert an item and index it under its parent (or as a course root)
    ///
    /// This is a raw write used by the tree operations and by hydration;
    /// it does not validate depth or parent kind.
    pub fn insert_item(&mut self, item: Item) {
        if let Some(previous) = self.items.remove(&item.id) {
            self.unindex_item(&previous);
        }
        self.index_item(&item);
        self.items.insert(item.id.clone(), item);
    }

    /// Remove an item and its index entries, returning it
    pub(crate) fn remove_item(&mut self, item_id: &str) -> Option<Item> {
        let item = self.items.remove(item_id)?;
        self.unindex_item(&item);
        self.children.remove(item_id);
        Some(item)
    }

    /// Move an item under a new parent in the index and on the item itself
    pub(crate) fn reparent_item(
        &mut self,
        item_id: &str,
        new_parent_id: Option<String>,
    ) -> Result<()> {
        let item = self.get_item(item_id)?.clone();
        self.unindex_item(&item);
        let item = self.get_item_mut(item_id)?;
        item.parent_id = new_parent_id;
        let item = item.clone();
        self.index_item(&item);
        Ok(())
    }

    fn index_item(&mut self, item: &Item) {
        let bucket = match &item.parent_id {
            Some(pid) => self.children.entry(pid.clone()).or_default(),
            None => self.roots.entry(item.course_id.clone()).or_default(),
        };
        if !bucket.contains(&item.id) {
            bucket.push(item.id.clone());
        }
    }

    fn unindex_item(&mut self, item: &Item) {
        let bucket = match &item.parent_id {
            Some(pid) => self.children.get_mut(pid),
            None => self.roots.get_mut(&item.course_id),
        };
        if let Some(bucket) = bucket {
            bucket.retain(|id| id != &item.id);
        }
    }

    // ----- edges -----

    /// # Errors
    ///
    /// Returns `Internal` if no edge has this id.
    pub fn get_edge(&self, edge_id: &str) -> Result<&Edge> {
        self.edges
            .get(edge_id)
            .ok_or_else(|| CourseGraphError::Internal {
                message: format!("Edge not found: {}", edge_id),
            })
    }

    /// All edges of a course, start edge first, then by id
    pub fn edges_in_course(&self, course_id: &str) -> Vec<&Edge> {
        let mut edges: Vec<&Edge> = self
            .edges
            .values()
            .filter(|e| e.course_id == course_id)
            .collect();
        edges.sort_by(|a, b| (!a.is_start(), &a.id).cmp(&(!b.is_start(), &b.id)));
        edges
    }

    pub fn start_edge(&self, course_id: &str) -> Option<&Edge> {
        self.starts.get(course_id).and_then(|id| self.edges.get(id))
    }

    pub fn outgoing_edge(&self, item_id: &str) -> Option<&Edge> {
        self.outgoing.get(item_id).and_then(|id| self.edges.get(id))
    }

    pub fn incoming_edge(&self, item_id: &str) -> Option<&Edge> {
        self.incoming.get(item_id).and_then(|id| self.edges.get(id))
    }

    /// Next item along the learning order
    pub fn next_item(&self, item_id: &str) -> Option<&str> {
        self.outgoing_edge(item_id).map(|e| e.to_item_id.as_str())
    }

    /// Insert an edge and index its endpoints
    ///
    /// Raw write; validation lives in the chain operations.
    pub fn insert_edge(&mut self, edge: Edge) {
        match &edge.from_item_id {
            Some(from) => {
                self.outgoing.insert(from.clone(), edge.id.clone());
            }
            None => {
                self.starts.insert(edge.course_id.clone(), edge.id.clone());
            }
        }
        self.incoming.insert(edge.to_item_id.clone(), edge.id.clone());
        self.edges.insert(edge.id.clone(), edge);
    }

    pub(crate) fn remove_edge(&mut self, edge_id: &str) -> Option<Edge> {
        let edge = self.edges.remove(edge_id)?;
        let points_here = |slot: Option<&String>| slot.map(String::as_str) == Some(edge_id);
        match &edge.from_item_id {
            Some(from) => {
                if points_here(self.outgoing.get(from)) {
                    self.outgoing.remove(from);
                }
            }
            None => {
                if points_here(self.starts.get(&edge.course_id)) {
                    self.starts.remove(&edge.course_id);
                }
            }
        }
        if points_here(self.incoming.get(&edge.to_item_id)) {
            self.incoming.remove(&edge.to_item_id);
        }
        Some(edge)
    }

    // ----- snapshots -----

    /// Store a frozen snapshot
    ///
    /// # Errors
    ///
    /// Returns `SnapshotImmutable` if a snapshot with this id already exists.
    pub fn insert_snapshot(&mut self, frozen: FrozenSnapshot) -> Result<()> {
        if self.snapshots.contains_key(frozen.id()) {
            return Err(CourseGraphError::SnapshotImmutable {
                entity_id: frozen.id().to_string(),
            });
        }
        for item in frozen.items() {
            self.snapshot_items
                .insert(item.id.clone(), frozen.id().to_string());
        }
        self.snapshots.insert(frozen.id().to_string(), frozen);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `SnapshotNotFound` if no snapshot has this id.
    pub fn get_snapshot(&self, snapshot_id: &str) -> Result<&FrozenSnapshot> {
        self.snapshots
            .get(snapshot_id)
            .ok_or_else(|| CourseGraphError::SnapshotNotFound {
                snapshot_id: snapshot_id.to_string(),
            })
    }

    /// Snapshot headers taken from a course, oldest first
    pub fn snapshots_of_course(&self, course_id: &str) -> Vec<&Snapshot> {
        let mut snapshots: Vec<&Snapshot> = self
            .snapshots
            .values()
            .map(FrozenSnapshot::snapshot)
            .filter(|s| s.source_course_id == course_id)
            .collect();
        snapshots.sort_by(|a, b| (a.created_at, &a.id).cmp(&(b.created_at, &b.id)));
        snapshots
    }

    /// Reject ids that belong to a snapshot or a snapshot item
    ///
    /// # Errors
    ///
    /// Returns `SnapshotImmutable` if the id names any snapshot entity.
    pub fn guard_not_snapshot(&self, id: &str) -> Result<()> {
        if self.snapshots.contains_key(id) || self.snapshot_items.contains_key(id) {
            return Err(CourseGraphError::SnapshotImmutable {
                entity_id: id.to_string(),
            });
        }
        Ok(())
    }
}
