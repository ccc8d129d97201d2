use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::store::Store;
use crate::errors::{CourseGraphError, Result};
use crate::model::Edge;
use crate::rules::walk_reaches;
use crate::traversal::{preorder_leaves, LiveChain, OrderedSequence};

/// How much of a course's leaves the learning order covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainStatus {
    /// Items reachable from the start edge
    pub sequence_len: usize,
    /// Leaves in the content tree
    pub leaf_count: usize,
    /// True when the chain visits every leaf
    pub is_complete: bool,
}

/// Create or replace the start edge of a course's learning order
///
/// # Arguments
/// * `store` - Mutable reference to the Store
/// * `course_id` - Course whose chain starts at the item
/// * `item_id` - First leaf learners visit
///
/// # Errors
/// * `CourseNotFound` - If the course doesn't exist
/// * `TargetItemRequired` - If no item is given, or it is not a leaf of this course
/// * `DuplicateEdge` - If the item already has an incoming edge from another item
/// * `SnapshotImmutable` - If either id names a snapshot entity
pub fn set_start(store: &mut Store, course_id: &str, item_id: Option<&str>) -> Result<Edge> {
    store.live_course(course_id)?;

    let target_required = |reason: String| CourseGraphError::TargetItemRequired {
        course_id: course_id.to_string(),
        reason,
    };

    let item_id = item_id.ok_or_else(|| target_required("no item given".to_string()))?;
    store.guard_not_snapshot(item_id)?;
    let item = store
        .items
        .get(item_id)
        .filter(|i| i.course_id == course_id)
        .ok_or_else(|| target_required(format!("item {} is not in this course", item_id)))?;
    if !item.is_leaf() {
        return Err(target_required(format!("item {} is a folder", item_id)));
    }

    if store.incoming_edge(item_id).is_some_and(|e| !e.is_start()) {
        return Err(CourseGraphError::DuplicateEdge {
            item_id: item_id.to_string(),
            side: "incoming".to_string(),
        });
    }

    if let Some(previous) = store.start_edge(course_id).map(|e| e.id.clone()) {
        store.remove_edge(&previous);
    }

    let edge = Edge::new(
        Uuid::now_v7().to_string(),
        course_id.to_string(),
        None,
        item_id.to_string(),
    );
    store.insert_edge(edge.clone());
    store.touch_course(course_id);

    Ok(edge)
}

/// Link two leaves so that `to_item_id` follows `from_item_id`
///
/// The loop check runs first: it simulates the new edge by following the
/// existing successors of `to_item_id` and fails if they lead back to
/// `from_item_id`.
///
/// # Errors
/// * `CannotReferenceSelf` - If both ids are equal
/// * `ItemNotFound` - If either item doesn't exist
/// * `CourseMismatch` - If the items belong to different courses
/// * `FolderCannotBeInLearningOrder` - If either item is a folder
/// * `CircularReference` - If the edge would close a loop
/// * `DuplicateEdge` - If `from` already has a successor or `to` already has a predecessor
pub fn connect(store: &mut Store, from_item_id: &str, to_item_id: &str) -> Result<Edge> {
    if from_item_id == to_item_id {
        return Err(CourseGraphError::CannotReferenceSelf {
            item_id: from_item_id.to_string(),
        });
    }

    let from = store.live_item(from_item_id)?;
    let to = store.live_item(to_item_id)?;
    let course_id = from.course_id.clone();

    if to.course_id != course_id {
        return Err(CourseGraphError::CourseMismatch {
            item_id: to_item_id.to_string(),
            expected_course_id: course_id,
            actual_course_id: to.course_id.clone(),
        });
    }

    for item in [from, to] {
        if item.is_folder() {
            return Err(CourseGraphError::FolderCannotBeInLearningOrder {
                item_id: item.id.clone(),
            });
        }
    }

    if walk_reaches(to_item_id, from_item_id, |id| store.next_item(id)) {
        return Err(CourseGraphError::CircularReference {
            item_id: from_item_id.to_string(),
            target_id: to_item_id.to_string(),
        });
    }

    if store.outgoing_edge(from_item_id).is_some() {
        return Err(CourseGraphError::DuplicateEdge {
            item_id: from_item_id.to_string(),
            side: "outgoing".to_string(),
        });
    }
    if store.incoming_edge(to_item_id).is_some() {
        return Err(CourseGraphError::DuplicateEdge {
            item_id: to_item_id.to_string(),
            side: "incoming".to_string(),
        });
    }

    let edge = Edge::new(
        Uuid::now_v7().to_string(),
        course_id.clone(),
        Some(from_item_id.to_string()),
        to_item_id.to_string(),
    );
    store.insert_edge(edge.clone());
    store.touch_course(&course_id);

    Ok(edge)
}

/// Remove every edge that starts or ends at an item
///
/// # Returns
/// Number of edges removed (0, 1 or 2)
///
/// # Errors
/// * `ItemNotFound` - If the item doesn't exist
pub fn disconnect(store: &mut Store, item_id: &str) -> Result<usize> {
    let course_id = store.live_item(item_id)?.course_id.clone();

    let removed = super::tree_ops::remove_touching_edges(store, item_id);
    if removed > 0 {
        store.touch_course(&course_id);
    }

    Ok(removed)
}

/// Replace a course's learning order with one following the content tree
///
/// Leaves are taken in pre-order (siblings by sort order): start → first
/// leaf → … → last leaf. A course without leaves ends up with no chain.
///
/// # Returns
/// Number of edges created, including the start edge
///
/// # Errors
/// * `CourseNotFound` - If the course doesn't exist
pub fn auto_generate(store: &mut Store, course_id: &str) -> Result<usize> {
    store.live_course(course_id)?;

    let leaves: Vec<String> = preorder_leaves(store, course_id)
        .into_iter()
        .map(|i| i.id.clone())
        .collect();

    let existing: Vec<String> = store
        .edges_in_course(course_id)
        .into_iter()
        .map(|e| e.id.clone())
        .collect();
    for edge_id in existing {
        store.remove_edge(&edge_id);
    }

    let mut previous: Option<String> = None;
    for leaf_id in &leaves {
        store.insert_edge(Edge::new(
            Uuid::now_v7().to_string(),
            course_id.to_string(),
            previous.take(),
            leaf_id.clone(),
        ));
        previous = Some(leaf_id.clone());
    }
    store.touch_course(course_id);

    Ok(leaves.len())
}

/// Item ids of a course in learning order
///
/// Lazily follows edges from the start target. A chain that stops before
/// visiting every leaf yields only the reachable prefix; compare against
/// [`chain_status`] to detect an incomplete chain.
///
/// # Errors
/// * `CourseNotFound` - If the course doesn't exist
/// * `StartPointRequired` - If the course has no start edge
pub fn resolve_ordered_sequence<'a>(
    store: &'a Store,
    course_id: &'a str,
) -> Result<OrderedSequence<'a, LiveChain<'a>>> {
    store.get_course(course_id)?;
    if store.start_edge(course_id).is_none() {
        return Err(CourseGraphError::StartPointRequired {
            owner_id: course_id.to_string(),
        });
    }
    Ok(OrderedSequence::new(LiveChain::new(store, course_id)))
}

/// Compare the learning order against the course's leaves
///
/// # Errors
/// * `CourseNotFound` - If the course doesn't exist
pub fn chain_status(store: &Store, course_id: &str) -> Result<ChainStatus> {
    store.get_course(course_id)?;

    let leaf_count = preorder_leaves(store, course_id).len();
    let sequence_len = OrderedSequence::new(LiveChain::new(store, course_id)).count();

    Ok(ChainStatus {
        sequence_len,
        leaf_count,
        is_complete: sequence_len == leaf_count,
    })
}

/// All edges of a course, start edge first
///
/// # Errors
/// * `CourseNotFound` - If the course doesn't exist
pub fn list_edges<'a>(store: &'a Store, course_id: &str) -> Result<Vec<&'a Edge>> {
    store.get_course(course_id)?;
    Ok(store.edges_in_course(course_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ItemKind;
    use crate::ops::tree_ops::{create_course, create_item};

    fn leaves(store: &mut Store, names: &[&str]) -> Vec<String> {
        let mut ids = Vec::new();
        for name in names {
            let kind = ItemKind::leaf(format!("lo-{}", name));
            ids.push(create_item(store, "c1", name.to_string(), None, kind).unwrap().id);
        }
        ids
    }

    fn setup() -> Store {
        let mut store = Store::new();
        create_course(&mut store, "c1".into(), "Course".into()).unwrap();
        store
    }

    #[test]
    fn test_set_start_replaces_previous() {
        let mut store = setup();
        let ids = leaves(&mut store, &["A", "B"]);

        set_start(&mut store, "c1", Some(ids[0].as_str())).unwrap();
        set_start(&mut store, "c1", Some(ids[1].as_str())).unwrap();

        assert_eq!(store.edges_in_course("c1").len(), 1);
        assert_eq!(store.start_edge("c1").unwrap().to_item_id, ids[1]);
    }

    #[test]
    fn test_set_start_requires_target() {
        let mut store = setup();
        assert!(matches!(
            set_start(&mut store, "c1", None),
            Err(CourseGraphError::TargetItemRequired { .. })
        ));
        assert!(matches!(
            set_start(&mut store, "c1", Some("ghost")),
            Err(CourseGraphError::TargetItemRequired { .. })
        ));
    }

    #[test]
    fn test_connect_self_rejected() {
        let mut store = setup();
        let ids = leaves(&mut store, &["A"]);
        assert!(matches!(
            connect(&mut store, &ids[0], &ids[0]),
            Err(CourseGraphError::CannotReferenceSelf { .. })
        ));
    }

    #[test]
    fn test_disconnect_counts_edges() {
        let mut store = setup();
        let ids = leaves(&mut store, &["A", "B", "C"]);
        auto_generate(&mut store, "c1").unwrap();

        assert_eq!(disconnect(&mut store, &ids[1]).unwrap(), 2);
        assert_eq!(disconnect(&mut store, &ids[1]).unwrap(), 0);
        assert_eq!(store.edges_in_course("c1").len(), 1);
    }

    #[test]
    fn test_chain_status_reports_prefix() {
        let mut store = setup();
        let ids = leaves(&mut store, &["A", "B", "C"]);
        set_start(&mut store, "c1", Some(ids[0].as_str())).unwrap();
        connect(&mut store, &ids[0], &ids[1]).unwrap();

        let status = chain_status(&store, "c1").unwrap();
        assert_eq!(status.sequence_len, 2);
        assert_eq!(status.leaf_count, 3);
        assert!(!status.is_complete);
    }
}
