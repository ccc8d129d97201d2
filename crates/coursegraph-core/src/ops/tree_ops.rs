use chrono::Utc;
use std::collections::VecDeque;
use uuid::Uuid;

use super::store::Store;
use crate::errors::{CourseGraphError, Result};
use crate::model::{Course, Item, ItemKind};
use crate::rules::{check_depth, walk_reaches};

/// Register a course so items can be created in it
///
/// # Errors
/// * `InvalidName` - If the title is blank or too long
/// * `CourseAlreadyExists` - If the id is taken
pub fn create_course(store: &mut Store, course_id: String, title: String) -> Result<Course> {
    store.config().check_name(&title)?;

    let course = Course::new(course_id, title);
    store.insert_course(course.clone())?;

    Ok(course)
}

/// Create a new item in a course's content tree
///
/// Generates a UUID v7 id. The item is appended after its current siblings
/// and its depth is derived from the parent (0 for a root item).
///
/// # Arguments
/// * `store` - Mutable reference to the Store
/// * `course_id` - Owning course
/// * `name` - Display name (must not be blank)
/// * `parent_id` - Optional parent folder (None = root item)
/// * `kind` - Folder, or leaf with its learning object reference
///
/// # Returns
/// A copy of the created item
///
/// # Errors
/// * `CourseNotFound` - If the course doesn't exist
/// * `InvalidName` - If the name is blank or too long
/// * `InvalidParent` - If the parent doesn't exist in the same course or is a leaf
/// * `MaxDepthExceeded` - If the item would sit below the maximum depth
/// * `SnapshotImmutable` - If the course or parent id names a snapshot entity
/// * `SortOrderExhausted` - If a sibling already holds `i64::MAX`
pub fn create_item(
    store: &mut Store,
    course_id: &str,
    name: String,
    parent_id: Option<&str>,
    kind: ItemKind,
) -> Result<Item> {
    store.live_course(course_id)?;
    store.config().check_name(&name)?;

    let depth = match parent_id {
        Some(pid) => resolve_parent(store, course_id, pid)?.depth + 1,
        None => 0,
    };
    check_depth(depth, store.config().max_depth)?;

    let mut item = Item::new(
        Uuid::now_v7().to_string(),
        course_id.to_string(),
        name,
        kind,
    );
    item.parent_id = parent_id.map(str::to_string);
    item.depth = depth;
    item.sort_order = next_sort_order(store, course_id, parent_id)?;

    store.insert_item(item.clone());
    store.touch_course(course_id);

    Ok(item)
}

/// Move an item (and its subtree) under a new parent
///
/// Depths of the item and every descendant are recomputed breadth-first and
/// checked before anything is written. When the parent changes, the item is
/// appended after its new siblings; moving to the current parent is a no-op
/// apart from the version bump.
///
/// # Arguments
/// * `store` - Mutable reference to the Store
/// * `item_id` - Item to move
/// * `new_parent_id` - Optional new parent folder (None = make root)
///
/// # Errors
/// * `ItemNotFound` - If the item doesn't exist
/// * `CircularReference` - If the new parent is the item itself or one of its descendants
/// * `InvalidParent` - If the new parent doesn't exist in the same course or is a leaf
/// * `MaxDepthExceeded` - If any item of the moved subtree would exceed the maximum depth
/// * `SortOrderExhausted` - If a new sibling already holds `i64::MAX`
pub fn move_item(store: &mut Store, item_id: &str, new_parent_id: Option<&str>) -> Result<Item> {
    let item = store.live_item(item_id)?;
    let course_id = item.course_id.clone();
    let old_parent_id = item.parent_id.clone();

    let base_depth = match new_parent_id {
        Some(pid) => {
            if pid == item_id {
                return Err(CourseGraphError::CircularReference {
                    item_id: item_id.to_string(),
                    target_id: pid.to_string(),
                });
            }
            store.guard_not_snapshot(pid)?;
            let parent = store
                .items
                .get(pid)
                .filter(|p| p.course_id == course_id)
                .ok_or_else(|| CourseGraphError::InvalidParent {
                    parent_id: pid.to_string(),
                    reason: "parent does not exist in this course".to_string(),
                })?;

            // Walk ancestors of the new parent up to the root
            let reaches_item = walk_reaches(pid, item_id, |id| {
                store.items.get(id).and_then(|i| i.parent_id.as_deref())
            });
            if reaches_item {
                return Err(CourseGraphError::CircularReference {
                    item_id: item_id.to_string(),
                    target_id: pid.to_string(),
                });
            }

            if parent.is_leaf() {
                return Err(CourseGraphError::InvalidParent {
                    parent_id: pid.to_string(),
                    reason: "parent is a leaf".to_string(),
                });
            }
            parent.depth + 1
        }
        None => 0,
    };

    // Recompute depths breadth-first, validate all before writing any
    let max_depth = store.config().max_depth;
    let mut new_depths: Vec<(String, u32)> = Vec::new();
    let mut queue = VecDeque::from([(item_id.to_string(), base_depth)]);
    while let Some((id, depth)) = queue.pop_front() {
        check_depth(depth, max_depth)?;
        for child in store.child_ids(&course_id, Some(&id)) {
            queue.push_back((child.to_string(), depth + 1));
        }
        new_depths.push((id, depth));
    }

    let parent_changed = old_parent_id.as_deref() != new_parent_id;
    if parent_changed {
        let sort_order = next_sort_order(store, &course_id, new_parent_id)?;
        store.reparent_item(item_id, new_parent_id.map(str::to_string))?;
        store.get_item_mut(item_id)?.sort_order = sort_order;
    }

    let now = Utc::now();
    for (id, depth) in new_depths {
        let item = store.get_item_mut(&id)?;
        item.depth = depth;
        item.updated_at = now;
    }
    store.touch_course(&course_id);

    Ok(store.get_item(item_id)?.clone())
}

/// Change an item's display name
///
/// # Errors
/// * `ItemNotFound` - If the item doesn't exist
/// * `InvalidName` - If the name is blank or too long
pub fn rename_item(store: &mut Store, item_id: &str, name: String) -> Result<Item> {
    let course_id = store.live_item(item_id)?.course_id.clone();
    store.config().check_name(&name)?;

    let item = store.get_item_mut(item_id)?;
    item.name = name;
    item.updated_at = Utc::now();
    let item = item.clone();
    store.touch_course(&course_id);

    Ok(item)
}

/// Set an item's position among its siblings
///
/// Siblings with equal sort order are ordered by id.
///
/// # Errors
/// * `ItemNotFound` - If the item doesn't exist
pub fn reorder_item(store: &mut Store, item_id: &str, sort_order: i64) -> Result<Item> {
    let course_id = store.live_item(item_id)?.course_id.clone();

    let item = store.get_item_mut(item_id)?;
    item.sort_order = sort_order;
    item.updated_at = Utc::now();
    let item = item.clone();
    store.touch_course(&course_id);

    Ok(item)
}

/// Delete a leaf or an empty folder
///
/// Also removes any learning order edge that starts or ends at the item. The
/// remaining chain is not re-linked; a chain broken this way resolves to the
/// prefix before the gap.
///
/// # Errors
/// * `ItemNotFound` - If the item doesn't exist
/// * `FolderNotEmpty` - If the item is a folder with children
pub fn delete_item(store: &mut Store, item_id: &str) -> Result<()> {
    let item = store.live_item(item_id)?;
    let course_id = item.course_id.clone();

    let child_count = store.child_count(item_id);
    if item.is_folder() && child_count > 0 {
        return Err(CourseGraphError::FolderNotEmpty {
            item_id: item_id.to_string(),
            child_count,
        });
    }

    remove_touching_edges(store, item_id);
    store.remove_item(item_id);
    store.touch_course(&course_id);

    Ok(())
}

/// Delete an item together with its whole subtree
///
/// Removes every edge touching any deleted item.
///
/// # Returns
/// Number of items removed
///
/// # Errors
/// * `ItemNotFound` - If the item doesn't exist
pub fn delete_item_cascade(store: &mut Store, item_id: &str) -> Result<usize> {
    let course_id = store.live_item(item_id)?.course_id.clone();

    let mut doomed = vec![item_id.to_string()];
    doomed.extend(subtree_ids(store, &course_id, item_id));

    // Children before parents, so no index entry outlives its parent
    for id in doomed.iter().rev() {
        remove_touching_edges(store, id);
        store.remove_item(id);
    }
    store.touch_course(&course_id);

    Ok(doomed.len())
}

/// Direct children of an item in sibling order
///
/// # Errors
/// * `ItemNotFound` - If the item doesn't exist
pub fn list_children<'a>(store: &'a Store, item_id: &str) -> Result<Vec<&'a Item>> {
    let item = store.get_item(item_id)?;
    Ok(store
        .child_ids(&item.course_id, Some(item_id))
        .into_iter()
        .filter_map(|id| store.items.get(id))
        .collect())
}

/// Root items of a course in sibling order
///
/// # Errors
/// * `CourseNotFound` - If the course doesn't exist
pub fn list_root_items<'a>(store: &'a Store, course_id: &str) -> Result<Vec<&'a Item>> {
    store.get_course(course_id)?;
    Ok(store
        .child_ids(course_id, None)
        .into_iter()
        .filter_map(|id| store.items.get(id))
        .collect())
}

/// All descendants of an item, breadth-first, excluding the item itself
///
/// # Errors
/// * `ItemNotFound` - If the item doesn't exist
pub fn list_descendants<'a>(store: &'a Store, item_id: &str) -> Result<Vec<&'a Item>> {
    let item = store.get_item(item_id)?;
    Ok(subtree_ids(store, &item.course_id, item_id)
        .into_iter()
        .filter_map(|id| store.items.get(&id))
        .collect())
}

/// Depth of an item, computed by walking its ancestors
///
/// Matches the stored `depth` field whenever the tree is consistent.
///
/// # Errors
/// * `ItemNotFound` - If the item or one of its ancestors doesn't exist
/// * `CircularReference` - If the ancestor chain loops
pub fn compute_depth(store: &Store, item_id: &str) -> Result<u32> {
    let mut depth = 0u32;
    let mut current = store.get_item(item_id)?;

    while let Some(parent_id) = current.parent_id.as_deref() {
        if parent_id == item_id {
            return Err(CourseGraphError::CircularReference {
                item_id: item_id.to_string(),
                target_id: parent_id.to_string(),
            });
        }
        current = store.get_item(parent_id)?;
        depth += 1;
        if depth as usize > store.items.len() {
            return Err(CourseGraphError::CircularReference {
                item_id: item_id.to_string(),
                target_id: parent_id.to_string(),
            });
        }
    }

    Ok(depth)
}

// ===== helpers =====

fn resolve_parent<'a>(store: &'a Store, course_id: &str, parent_id: &str) -> Result<&'a Item> {
    store.guard_not_snapshot(parent_id)?;
    let parent = store
        .items
        .get(parent_id)
        .filter(|p| p.course_id == course_id)
        .ok_or_else(|| CourseGraphError::InvalidParent {
            parent_id: parent_id.to_string(),
            reason: "parent does not exist in this course".to_string(),
        })?;
    if parent.is_leaf() {
        return Err(CourseGraphError::InvalidParent {
            parent_id: parent_id.to_string(),
            reason: "parent is a leaf".to_string(),
        });
    }
    Ok(parent)
}

fn next_sort_order(store: &Store, course_id: &str, parent_id: Option<&str>) -> Result<i64> {
    let max = store
        .child_ids(course_id, parent_id)
        .into_iter()
        .filter_map(|id| store.items.get(id))
        .map(|i| i.sort_order)
        .max();

    match max {
        None => Ok(0),
        Some(max) => max
            .checked_add(1)
            .ok_or_else(|| CourseGraphError::SortOrderExhausted {
                course_id: course_id.to_string(),
                parent: parent_id.unwrap_or("course root").to_string(),
            }),
    }
}

/// Descendant ids of an item, breadth-first
fn subtree_ids(store: &Store, course_id: &str, item_id: &str) -> Vec<String> {
    let mut ids = Vec::new();
    let mut queue = VecDeque::from([item_id.to_string()]);

    while let Some(id) = queue.pop_front() {
        for child in store.child_ids(course_id, Some(&id)) {
            ids.push(child.to_string());
            queue.push_back(child.to_string());
        }
    }

    ids
}

pub(crate) fn remove_touching_edges(store: &mut Store, item_id: &str) -> usize {
    let mut edge_ids: Vec<String> = Vec::new();
    if let Some(edge) = store.outgoing_edge(item_id) {
        edge_ids.push(edge.id.clone());
    }
    if let Some(edge) = store.incoming_edge(item_id) {
        edge_ids.push(edge.id.clone());
    }

    edge_ids
        .iter()
        .filter(|id| store.remove_edge(id).is_some())
        .count()
}
