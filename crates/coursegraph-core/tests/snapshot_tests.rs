mod common;

use common::{folder, leaf, store_with_course, COURSE};
use coursegraph_core::ops::{chain_ops, snapshot_ops, tree_ops};
use coursegraph_core::{CourseGraphError, NoDurationCatalog, StaticDurationCatalog, Store};

/// Module 1 / Lesson 1, Lesson 2 with an auto-generated chain
fn module_course() -> (Store, String, String, String) {
    let mut store = store_with_course();
    let module = folder(&mut store, "Module 1", None);
    let l1 = leaf(&mut store, "Lesson 1", Some(module.as_str()));
    let l2 = leaf(&mut store, "Lesson 2", Some(module.as_str()));
    chain_ops::auto_generate(&mut store, COURSE).unwrap();
    (store, module, l1, l2)
}

fn snapshot_names(store: &Store, snapshot_id: &str) -> Vec<String> {
    let frozen = snapshot_ops::get_snapshot(store, snapshot_id).unwrap();
    snapshot_ops::get_snapshot_ordered_sequence(store, snapshot_id)
        .unwrap()
        .map(|id| frozen.get_item(id).unwrap().name.clone())
        .collect()
}

#[test]
fn test_snapshot_of_module_with_two_lessons() {
    let (mut store, ..) = module_course();

    let snapshot = snapshot_ops::create_snapshot(&mut store, COURSE, &NoDurationCatalog).unwrap();
    let frozen = snapshot_ops::get_snapshot(&store, &snapshot.id).unwrap();

    let mut item_names: Vec<&str> = frozen.items().iter().map(|i| i.name.as_str()).collect();
    item_names.sort();
    assert_eq!(item_names, vec!["Lesson 1", "Lesson 2", "Module 1"]);
    assert_eq!(frozen.edges().len(), 2);
    assert_eq!(frozen.edges().iter().filter(|e| e.is_start()).count(), 1);
    assert_eq!(snapshot_names(&store, &snapshot.id), vec!["Lesson 1", "Lesson 2"]);
}

#[test]
fn test_snapshot_items_are_remapped() {
    let (mut store, module, l1, l2) = module_course();

    let snapshot = snapshot_ops::create_snapshot(&mut store, COURSE, &NoDurationCatalog).unwrap();
    let frozen = snapshot_ops::get_snapshot(&store, &snapshot.id).unwrap();

    for item in frozen.items() {
        assert_ne!(item.id, module);
        assert_ne!(item.id, l1);
        assert_ne!(item.id, l2);
        assert_eq!(item.snapshot_id, snapshot.id);
        if let Some(parent) = &item.parent_id {
            let parent = frozen.get_item(parent).unwrap();
            assert_eq!(parent.depth + 1, item.depth);
        }
    }
    for edge in frozen.edges() {
        assert!(frozen.contains_item(&edge.to_item_id));
        if let Some(from) = &edge.from_item_id {
            assert!(frozen.contains_item(from));
        }
    }

    let lesson = frozen.items().iter().find(|i| i.name == "Lesson 1").unwrap();
    assert_eq!(lesson.kind.learning_object_id(), Some("lo-lesson-1"));
}

#[test]
fn test_snapshot_isolated_from_live_edits() {
    let (mut store, _module, l1, l2) = module_course();
    let snapshot = snapshot_ops::create_snapshot(&mut store, COURSE, &NoDurationCatalog).unwrap();
    let before = snapshot_names(&store, &snapshot.id);

    tree_ops::delete_item(&mut store, &l1).unwrap();
    tree_ops::rename_item(&mut store, &l2, "Renamed".to_string()).unwrap();
    chain_ops::auto_generate(&mut store, COURSE).unwrap();

    assert_eq!(snapshot_names(&store, &snapshot.id), before);
}

#[test]
fn test_snapshot_sequence_matches_live_sequence() {
    let mut store = store_with_course();
    let m = folder(&mut store, "M", None);
    for name in ["A", "B", "C", "D"] {
        leaf(&mut store, name, Some(m.as_str()));
    }
    chain_ops::auto_generate(&mut store, COURSE).unwrap();

    let live: Vec<String> = chain_ops::resolve_ordered_sequence(&store, COURSE)
        .unwrap()
        .map(|id| store.get_item(id).unwrap().name.clone())
        .collect();
    let snapshot = snapshot_ops::create_snapshot(&mut store, COURSE, &NoDurationCatalog).unwrap();

    assert_eq!(snapshot.item_count, 5);
    assert_eq!(snapshot_ops::get_snapshot(&store, &snapshot.id).unwrap().edges().len(), 4);
    assert_eq!(snapshot_names(&store, &snapshot.id), live);
}

#[test]
fn test_snapshot_duration_total() {
    let (mut store, ..) = module_course();
    let catalog: StaticDurationCatalog =
        [("lo-lesson-1", 20u64), ("lo-lesson-2", 25u64)].into_iter().collect();

    let snapshot = snapshot_ops::create_snapshot(&mut store, COURSE, &catalog).unwrap();
    assert_eq!(snapshot.estimated_duration_minutes, 45);
}

#[test]
fn test_snapshot_entities_reject_live_mutations() {
    let (mut store, ..) = module_course();
    let snapshot = snapshot_ops::create_snapshot(&mut store, COURSE, &NoDurationCatalog).unwrap();
    let frozen_item = snapshot_ops::get_snapshot(&store, &snapshot.id).unwrap().items()[1]
        .id
        .clone();

    let attempts = [
        tree_ops::rename_item(&mut store, &frozen_item, "X".to_string()).map(|_| ()),
        tree_ops::delete_item(&mut store, &frozen_item),
        tree_ops::move_item(&mut store, &frozen_item, None).map(|_| ()),
        chain_ops::disconnect(&mut store, &frozen_item).map(|_| ()),
        chain_ops::auto_generate(&mut store, &snapshot.id).map(|_| ()),
    ];
    for attempt in attempts {
        assert!(matches!(attempt, Err(CourseGraphError::SnapshotImmutable { .. })));
    }
}

#[test]
fn test_unknown_snapshot() {
    let store = store_with_course();
    assert!(matches!(
        snapshot_ops::get_snapshot_ordered_sequence(&store, "nope"),
        Err(CourseGraphError::SnapshotNotFound { .. })
    ));
}

#[test]
fn test_list_snapshots_per_course() {
    let (mut store, ..) = module_course();
    let first = snapshot_ops::create_snapshot(&mut store, COURSE, &NoDurationCatalog).unwrap();
    let second = snapshot_ops::create_snapshot(&mut store, COURSE, &NoDurationCatalog).unwrap();

    let ids: Vec<&str> = snapshot_ops::list_snapshots(&store, COURSE)
        .unwrap()
        .iter()
        .map(|s| s.id.as_str())
        .collect();
    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&first.id.as_str()));
    assert!(ids.contains(&second.id.as_str()));
    assert_ne!(first.id, second.id);
}
