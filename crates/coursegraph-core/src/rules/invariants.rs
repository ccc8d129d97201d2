use std::collections::{BTreeMap, HashSet};

use crate::model::Edge;
use crate::ops::Store;

use super::graph::walk_reaches;

/// Check if an item's ancestor chain loops back on itself
pub fn has_tree_cycle(store: &Store, item_id: &str) -> bool {
    let mut visited = HashSet::new();
    let mut current = Some(item_id);

    while let Some(id) = current {
        if !visited.insert(id) {
            return true;
        }
        current = store.items.get(id).and_then(|i| i.parent_id.as_deref());
    }

    false
}

/// Items whose parent does not exist or belongs to another course
///
/// Returns list of (item_id, parent_id) tuples
pub fn find_orphans(store: &Store, course_id: &str) -> Vec<(String, String)> {
    let mut orphans = Vec::new();

    for item in store.items_in_course(course_id) {
        if let Some(ref parent_id) = item.parent_id {
            match store.items.get(parent_id) {
                Some(parent) if parent.course_id == item.course_id => {}
                _ => orphans.push((item.id.clone(), parent_id.clone())),
            }
        }
    }

    orphans.sort();
    orphans
}

/// Items whose parent is a leaf
///
/// Returns list of (item_id, parent_id) tuples
pub fn find_leaf_parents(store: &Store, course_id: &str) -> Vec<(String, String)> {
    let mut violations = Vec::new();

    for item in store.items_in_course(course_id) {
        if let Some(parent) = item.parent_id.as_ref().and_then(|p| store.items.get(p)) {
            if parent.is_leaf() {
                violations.push((item.id.clone(), parent.id.clone()));
            }
        }
    }

    violations.sort();
    violations
}

/// Items whose ancestor chain contains themselves
pub fn find_tree_cycles(store: &Store, course_id: &str) -> Vec<String> {
    let mut cycles: Vec<String> = store
        .items_in_course(course_id)
        .into_iter()
        .filter(|i| has_tree_cycle(store, &i.id))
        .map(|i| i.id.clone())
        .collect();
    cycles.sort();
    cycles
}

/// Items whose stored depth disagrees with their position in the tree
///
/// Skips items with a missing parent (reported by `find_orphans`).
///
/// Returns list of (item_id, stored_depth, expected_depth) tuples
pub fn find_depth_mismatches(store: &Store, course_id: &str) -> Vec<(String, u32, u32)> {
    let mut mismatches = Vec::new();

    for item in store.items_in_course(course_id) {
        let expected = match &item.parent_id {
            None => 0,
            Some(pid) => match store.items.get(pid) {
                Some(parent) => parent.depth + 1,
                None => continue,
            },
        };
        if item.depth != expected {
            mismatches.push((item.id.clone(), item.depth, expected));
        }
    }

    mismatches.sort();
    mismatches
}

/// Items deeper than the store's configured maximum
pub fn find_items_beyond_max_depth(store: &Store, course_id: &str) -> Vec<(String, u32)> {
    let max_depth = store.config().max_depth;
    let mut violations: Vec<(String, u32)> = store
        .items_in_course(course_id)
        .into_iter()
        .filter(|i| i.depth > max_depth)
        .map(|i| (i.id.clone(), i.depth))
        .collect();
    violations.sort();
    violations
}

fn course_edges<'a>(store: &'a Store, course_id: &str) -> Vec<&'a Edge> {
    store.edges_in_course(course_id)
}

/// Edges with an endpoint that does not exist
///
/// Returns list of (edge_id, missing_item_id) tuples
pub fn find_dangling_edges(store: &Store, course_id: &str) -> Vec<(String, String)> {
    let mut dangling = Vec::new();

    for edge in course_edges(store, course_id) {
        let endpoints = edge.from_item_id.iter().chain(std::iter::once(&edge.to_item_id));
        for item_id in endpoints {
            if !store.items.contains_key(item_id) {
                dangling.push((edge.id.clone(), item_id.clone()));
            }
        }
    }

    dangling
}

/// Edges whose endpoints are the same item
pub fn find_self_edges(store: &Store, course_id: &str) -> Vec<String> {
    course_edges(store, course_id)
        .into_iter()
        .filter(|e| e.from_item_id.as_deref() == Some(e.to_item_id.as_str()))
        .map(|e| e.id.clone())
        .collect()
}

/// Edges touching a folder
///
/// Returns list of (edge_id, folder_id) tuples
pub fn find_folder_endpoints(store: &Store, course_id: &str) -> Vec<(String, String)> {
    let mut violations = Vec::new();

    for edge in course_edges(store, course_id) {
        let endpoints = edge.from_item_id.iter().chain(std::iter::once(&edge.to_item_id));
        for item_id in endpoints {
            if store.items.get(item_id).is_some_and(|i| i.is_folder()) {
                violations.push((edge.id.clone(), item_id.clone()));
            }
        }
    }

    violations
}

/// Edges with an endpoint in another course
///
/// Returns list of (edge_id, item_id, item_course_id) tuples
pub fn find_cross_course_edges(store: &Store, course_id: &str) -> Vec<(String, String, String)> {
    let mut violations = Vec::new();

    for edge in course_edges(store, course_id) {
        let endpoints = edge.from_item_id.iter().chain(std::iter::once(&edge.to_item_id));
        for item_id in endpoints {
            if let Some(item) = store.items.get(item_id) {
                if item.course_id != edge.course_id {
                    violations.push((edge.id.clone(), item.id.clone(), item.course_id.clone()));
                }
            }
        }
    }

    violations
}

/// Items that appear as `from` or `to` in more than one edge
///
/// Counts raw edges rather than the store's endpoint indices, which hold one
/// slot per item and cannot show duplicates. A start edge counts as incoming.
///
/// Returns list of (item_id, side) tuples where side is "outgoing" or "incoming"
pub fn find_branching(store: &Store, course_id: &str) -> Vec<(String, &'static str)> {
    let mut outgoing: BTreeMap<&str, usize> = BTreeMap::new();
    let mut incoming: BTreeMap<&str, usize> = BTreeMap::new();

    for edge in course_edges(store, course_id) {
        if let Some(from) = &edge.from_item_id {
            *outgoing.entry(from.as_str()).or_default() += 1;
        }
        *incoming.entry(edge.to_item_id.as_str()).or_default() += 1;
    }

    let mut violations = Vec::new();
    for (item_id, count) in outgoing {
        if count > 1 {
            violations.push((item_id.to_string(), "outgoing"));
        }
    }
    for (item_id, count) in incoming {
        if count > 1 {
            violations.push((item_id.to_string(), "incoming"));
        }
    }
    violations
}

/// Number of start edges recorded for the course
pub fn count_start_edges(store: &Store, course_id: &str) -> usize {
    course_edges(store, course_id)
        .into_iter()
        .filter(|e| e.is_start())
        .count()
}

/// Items that sit on a loop of the learning order
pub fn find_chain_cycles(store: &Store, course_id: &str) -> Vec<String> {
    let mut on_cycle = Vec::new();

    for edge in course_edges(store, course_id) {
        let Some(from) = edge.from_item_id.as_deref() else {
            continue;
        };
        if walk_reaches(edge.to_item_id.as_str(), from, |id| store.next_item(id)) {
            on_cycle.push(from.to_string());
        }
    }

    on_cycle.sort();
    on_cycle
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Course, Item, ItemKind};

    fn raw_item(id: &str, parent: Option<&str>, depth: u32, kind: ItemKind) -> Item {
        let mut item = Item::new(id.to_string(), "c1".to_string(), id.to_string(), kind);
        item.parent_id = parent.map(str::to_string);
        item.depth = depth;
        item
    }

    fn store() -> Store {
        let mut store = Store::new();
        store
            .insert_course(Course::new("c1".into(), "Course".into()))
            .unwrap();
        store
    }

    #[test]
    fn test_detects_orphan_and_leaf_parent() {
        let mut store = store();
        store.insert_item(raw_item("l", None, 0, ItemKind::leaf("lo")));
        store.insert_item(raw_item("x", Some("l"), 1, ItemKind::leaf("lo")));
        store.insert_item(raw_item("y", Some("ghost"), 1, ItemKind::Folder));

        assert_eq!(find_orphans(&store, "c1"), vec![("y".to_string(), "ghost".to_string())]);
        assert_eq!(find_leaf_parents(&store, "c1"), vec![("x".to_string(), "l".to_string())]);
    }

    #[test]
    fn test_detects_tree_cycle() {
        let mut store = store();
        store.insert_item(raw_item("a", Some("b"), 1, ItemKind::Folder));
        store.insert_item(raw_item("b", Some("a"), 1, ItemKind::Folder));

        assert_eq!(find_tree_cycles(&store, "c1"), vec!["a", "b"]);
    }

    #[test]
    fn test_detects_depth_mismatch() {
        let mut store = store();
        store.insert_item(raw_item("f", None, 0, ItemKind::Folder));
        store.insert_item(raw_item("l", Some("f"), 3, ItemKind::leaf("lo")));

        assert_eq!(find_depth_mismatches(&store, "c1"), vec![("l".to_string(), 3, 1)]);
    }

    #[test]
    fn test_detects_chain_problems() {
        let mut store = store();
        store.insert_item(raw_item("f", None, 0, ItemKind::Folder));
        store.insert_item(raw_item("a", Some("f"), 1, ItemKind::leaf("lo")));
        store.insert_item(raw_item("b", Some("f"), 1, ItemKind::leaf("lo")));
        store.insert_edge(Edge::new("e1".into(), "c1".into(), Some("a".into()), "b".into()));
        store.insert_edge(Edge::new("e2".into(), "c1".into(), Some("b".into()), "a".into()));
        store.insert_edge(Edge::new("e3".into(), "c1".into(), None, "f".into()));

        assert_eq!(find_chain_cycles(&store, "c1"), vec!["a", "b"]);
        assert_eq!(find_folder_endpoints(&store, "c1"), vec![("e3".to_string(), "f".to_string())]);
        assert_eq!(count_start_edges(&store, "c1"), 1);
    }

    #[test]
    fn test_detects_branching() {
        let mut store = store();
        store.insert_item(raw_item("a", None, 0, ItemKind::leaf("lo")));
        store.insert_item(raw_item("b", None, 0, ItemKind::leaf("lo")));
        store.insert_item(raw_item("c", None, 0, ItemKind::leaf("lo")));
        store.insert_edge(Edge::new("e1".into(), "c1".into(), Some("a".into()), "c".into()));
        store.insert_edge(Edge::new("e2".into(), "c1".into(), Some("b".into()), "c".into()));

        assert_eq!(find_branching(&store, "c1"), vec![("c".to_string(), "incoming")]);
    }
}
