use chrono::Utc;
use std::collections::HashMap;
use uuid::Uuid;

use super::store::Store;
use crate::catalog::LearningObjectCatalog;
use crate::errors::{CourseGraphError, Result};
use crate::model::{FrozenSnapshot, Snapshot, SnapshotEdge, SnapshotItem};
use crate::traversal::{OrderedSequence, SnapshotChain};

/// Freeze a course's content tree and learning order into a new snapshot
///
/// Steps:
/// 1. Load the course's items parent-first (depth, then sort order) and its edges
/// 2. Copy items, recording old id → new snapshot item id in a remap table
/// 3. Copy edges, translating both endpoints through the remap table
/// 4. Total the item count and the estimated duration of every referenced
///    learning object (objects unknown to the catalog count as zero)
///
/// The copy is assembled off to the side and stored in one step at the end,
/// so a failure at any point leaves no snapshot behind. An empty course
/// yields a snapshot with zero items.
///
/// # Arguments
/// * `store` - Mutable reference to the Store
/// * `course_id` - Course to freeze
/// * `catalog` - Duration lookup for learning objects
///
/// # Errors
/// * `CourseNotFound` - If the course doesn't exist
/// * `SnapshotImmutable` - If the id names a snapshot rather than a course
/// * `Internal` - If an item's parent or an edge endpoint is missing from the copy
pub fn create_snapshot(
    store: &mut Store,
    course_id: &str,
    catalog: &dyn LearningObjectCatalog,
) -> Result<Snapshot> {
    let frozen = freeze_course(store, course_id, catalog)?;
    let snapshot = frozen.snapshot().clone();
    store.insert_snapshot(frozen)?;
    Ok(snapshot)
}

/// Build the frozen copy of a course without storing it
///
/// Persistence layers use this to write the copy in their own transaction.
///
/// # Errors
/// Same as [`create_snapshot`].
pub fn freeze_course(
    store: &Store,
    course_id: &str,
    catalog: &dyn LearningObjectCatalog,
) -> Result<FrozenSnapshot> {
    let course = store.live_course(course_id)?;
    let snapshot_id = Uuid::now_v7().to_string();

    let mut remap: HashMap<&str, String> = HashMap::new();
    let mut items = Vec::new();
    let mut duration: u64 = 0;

    for item in store.items_parent_first(course_id) {
        let parent_id = match &item.parent_id {
            Some(pid) => Some(remapped(&remap, pid)?),
            None => None,
        };
        let new_id = Uuid::now_v7().to_string();
        remap.insert(item.id.as_str(), new_id.clone());

        if let Some(lo_id) = item.kind.learning_object_id() {
            let minutes = catalog.estimated_duration_minutes(lo_id).unwrap_or(0);
            duration = duration.saturating_add(minutes);
        }

        items.push(SnapshotItem {
            id: new_id,
            snapshot_id: snapshot_id.clone(),
            name: item.name.clone(),
            kind: item.kind.clone(),
            parent_id,
            depth: item.depth,
            sort_order: item.sort_order,
        });
    }

    let mut edges = Vec::new();
    for edge in store.edges_in_course(course_id) {
        let from_item_id = match &edge.from_item_id {
            Some(from) => Some(remapped(&remap, from)?),
            None => None,
        };
        edges.push(SnapshotEdge {
            id: Uuid::now_v7().to_string(),
            snapshot_id: snapshot_id.clone(),
            from_item_id,
            to_item_id: remapped(&remap, &edge.to_item_id)?,
        });
    }

    let snapshot = Snapshot {
        id: snapshot_id,
        source_course_id: course_id.to_string(),
        source_version: course.version,
        created_at: Utc::now(),
        item_count: items.len(),
        estimated_duration_minutes: duration,
    };

    Ok(FrozenSnapshot::from_parts(snapshot, items, edges))
}

fn remapped(remap: &HashMap<&str, String>, live_id: &str) -> Result<String> {
    remap
        .get(live_id)
        .cloned()
        .ok_or_else(|| CourseGraphError::Internal {
            message: format!("Item {} referenced before it was copied", live_id),
        })
}

/// # Errors
/// * `SnapshotNotFound` - If no snapshot has this id
pub fn get_snapshot<'a>(store: &'a Store, snapshot_id: &str) -> Result<&'a FrozenSnapshot> {
    store.get_snapshot(snapshot_id)
}

/// Snapshot item ids in learning order
///
/// Same traversal as the live course's ordered sequence, over the frozen edges.
///
/// # Errors
/// * `SnapshotNotFound` - If no snapshot has this id
/// * `StartPointRequired` - If the snapshot was taken from a course without a start edge
pub fn get_snapshot_ordered_sequence<'a>(
    store: &'a Store,
    snapshot_id: &str,
) -> Result<OrderedSequence<'a, SnapshotChain<'a>>> {
    let frozen = store.get_snapshot(snapshot_id)?;
    snapshot_sequence(frozen)
}

/// Ordered sequence over an already loaded snapshot
///
/// # Errors
/// * `StartPointRequired` - If the snapshot has no start edge
pub fn snapshot_sequence(
    frozen: &FrozenSnapshot,
) -> Result<OrderedSequence<'_, SnapshotChain<'_>>> {
    if frozen.start_target().is_none() {
        return Err(CourseGraphError::StartPointRequired {
            owner_id: frozen.id().to_string(),
        });
    }
    Ok(OrderedSequence::new(SnapshotChain::new(frozen)))
}

/// Snapshots taken from a course, oldest first
///
/// # Errors
/// * `CourseNotFound` - If the course doesn't exist
pub fn list_snapshots<'a>(store: &'a Store, course_id: &str) -> Result<Vec<&'a Snapshot>> {
    store.get_course(course_id)?;
    Ok(store.snapshots_of_course(course_id))
}
