use crate::errors::{CourseGraphError, Result};
use crate::ops::Store;

use super::invariants;

/// Validate one course's tree and learning order
///
/// Runs every invariant check and returns the first violation found:
///
/// 1. Parent references resolve to a folder of the same course
/// 2. No item is its own ancestor
/// 3. Stored depths match tree positions and stay within the configured maximum
/// 4. Edge endpoints exist, are distinct leaves of the same course
/// 5. At most one start edge, no branching, no loops
///
/// Operations keep these invariants on their own. The engine runs this after
/// applying a command and before committing, as a guard against rows edited
/// outside the graph operations.
///
/// # Errors
///
/// Returns `CourseNotFound` for an unknown course, otherwise the domain error
/// matching the first violation. For exhaustive reporting, call the
/// individual finders in [`invariants`] directly.
pub fn validate_course(store: &Store, course_id: &str) -> Result<()> {
    store.get_course(course_id)?;

    if let Some((_, parent_id)) = invariants::find_orphans(store, course_id).first() {
        return Err(CourseGraphError::InvalidParent {
            parent_id: parent_id.clone(),
            reason: "parent does not exist in this course".to_string(),
        });
    }

    if let Some((_, parent_id)) = invariants::find_leaf_parents(store, course_id).first() {
        return Err(CourseGraphError::InvalidParent {
            parent_id: parent_id.clone(),
            reason: "parent is a leaf".to_string(),
        });
    }

    if let Some(item_id) = invariants::find_tree_cycles(store, course_id).first() {
        return Err(CourseGraphError::CircularReference {
            item_id: item_id.clone(),
            target_id: item_id.clone(),
        });
    }

    if let Some((_, depth)) = invariants::find_items_beyond_max_depth(store, course_id).first() {
        return Err(CourseGraphError::MaxDepthExceeded {
            depth: *depth,
            max_depth: store.config().max_depth,
        });
    }

    if let Some((item_id, stored, expected)) =
        invariants::find_depth_mismatches(store, course_id).first()
    {
        return Err(CourseGraphError::Internal {
            message: format!(
                "Item {} has depth {} but its position implies {}",
                item_id, stored, expected
            ),
        });
    }

    if let Some((_, item_id)) = invariants::find_dangling_edges(store, course_id).first() {
        return Err(CourseGraphError::ItemNotFound {
            item_id: item_id.clone(),
        });
    }

    if let Some(edge_id) = invariants::find_self_edges(store, course_id).first() {
        let edge = store.get_edge(edge_id)?;
        return Err(CourseGraphError::CannotReferenceSelf {
            item_id: edge.to_item_id.clone(),
        });
    }

    if let Some((_, item_id, actual)) =
        invariants::find_cross_course_edges(store, course_id).first()
    {
        return Err(CourseGraphError::CourseMismatch {
            item_id: item_id.clone(),
            expected_course_id: course_id.to_string(),
            actual_course_id: actual.clone(),
        });
    }

    if let Some((_, item_id)) = invariants::find_folder_endpoints(store, course_id).first() {
        return Err(CourseGraphError::FolderCannotBeInLearningOrder {
            item_id: item_id.clone(),
        });
    }

    if invariants::count_start_edges(store, course_id) > 1 {
        return Err(CourseGraphError::DuplicateEdge {
            item_id: course_id.to_string(),
            side: "start".to_string(),
        });
    }

    if let Some((item_id, side)) = invariants::find_branching(store, course_id).first() {
        return Err(CourseGraphError::DuplicateEdge {
            item_id: item_id.clone(),
            side: side.to_string(),
        });
    }

    if let Some(item_id) = invariants::find_chain_cycles(store, course_id).first() {
        return Err(CourseGraphError::CircularReference {
            item_id: item_id.clone(),
            target_id: item_id.clone(),
        });
    }

    Ok(())
}
