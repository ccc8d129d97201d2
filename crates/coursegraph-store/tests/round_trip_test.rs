// Live course graphs survive a write to SQLite and a hydration back

mod common;

use common::{sample_course, save_course, setup_db, tenant, COURSE};
use coursegraph_core::ops::{chain_ops, tree_ops};
use coursegraph_core::rules::validate_course;
use coursegraph_core::{CourseGraphError, ExErrorKind, GraphConfig, LearningObjectCatalog};
use coursegraph_store::repo::hydration::load_course;
use coursegraph_store::repo::SqliteRepo;
use coursegraph_store::SqliteDurationCatalog;

#[test]
fn test_round_trip_preserves_tree_and_order() {
    let (_dir, mut conn) = setup_db();
    let scope = tenant("acme");
    let (store, leaves) = sample_course();

    save_course(&mut conn, &scope, &store);
    let loaded = load_course(&conn, &scope, COURSE, &GraphConfig::default()).unwrap();

    validate_course(&loaded, COURSE).unwrap();
    assert_eq!(loaded.items_in_course(COURSE).len(), 4);
    for (original, reloaded) in store
        .items_parent_first(COURSE)
        .into_iter()
        .zip(loaded.items_parent_first(COURSE))
    {
        assert_eq!(original.id, reloaded.id);
        assert_eq!(original.parent_id, reloaded.parent_id);
        assert_eq!(original.depth, reloaded.depth);
        assert_eq!(original.kind, reloaded.kind);
    }

    let sequence: Vec<&str> = chain_ops::resolve_ordered_sequence(&loaded, COURSE)
        .unwrap()
        .collect();
    let expected: Vec<&str> = leaves.iter().map(String::as_str).collect();
    assert_eq!(sequence, expected);

    assert_eq!(
        loaded.get_course(COURSE).unwrap().version,
        store.get_course(COURSE).unwrap().version
    );
}

#[test]
fn test_replace_reflects_moves_and_deletes() {
    let (_dir, mut conn) = setup_db();
    let scope = tenant("acme");
    let (mut store, leaves) = sample_course();
    save_course(&mut conn, &scope, &store);

    tree_ops::move_item(&mut store, &leaves[2], None).unwrap();
    tree_ops::delete_item(&mut store, &leaves[1]).unwrap();
    save_course(&mut conn, &scope, &store);

    let loaded = load_course(&conn, &scope, COURSE, &GraphConfig::default()).unwrap();
    assert_eq!(loaded.items_in_course(COURSE).len(), 3);
    assert!(loaded.get_item(&leaves[2]).unwrap().is_root());
    assert!(loaded.get_item(&leaves[1]).is_err());

    // The deleted item took both of its edges along
    let sequence: Vec<&str> = chain_ops::resolve_ordered_sequence(&loaded, COURSE)
        .unwrap()
        .collect();
    assert_eq!(sequence, vec![leaves[0].as_str()]);
}

#[test]
fn test_courses_are_invisible_to_other_tenants() {
    let (_dir, mut conn) = setup_db();
    let acme = tenant("acme");
    let globex = tenant("globex");
    let (store, leaves) = sample_course();
    save_course(&mut conn, &acme, &store);

    let err = load_course(&conn, &globex, COURSE, &GraphConfig::default()).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::NotFound);
    assert!(SqliteRepo::item_course_id(&conn, &globex, &leaves[0]).unwrap().is_none());
    assert_eq!(
        SqliteRepo::item_course_id(&conn, &acme, &leaves[0]).unwrap().as_deref(),
        Some(COURSE)
    );
    assert!(SqliteRepo::list_courses(&conn, &globex).unwrap().is_empty());
}

#[test]
fn test_second_start_edge_is_rejected_by_schema() {
    let (_dir, mut conn) = setup_db();
    let scope = tenant("acme");
    let (store, leaves) = sample_course();
    save_course(&mut conn, &scope, &store);

    let result = conn.execute(
        "INSERT INTO edges (id, tenant_id, course_id, from_item_id, to_item_id, created_at)
         VALUES ('extra', 'acme', ?1, NULL, ?2, 0)",
        [COURSE, leaves[1].as_str()],
    );
    assert!(result.is_err());
}

#[test]
fn test_duration_catalog_covers_referenced_objects() {
    let (_dir, mut conn) = setup_db();
    let scope = tenant("acme");
    let (store, _) = sample_course();
    save_course(&mut conn, &scope, &store);

    SqliteRepo::upsert_learning_object(&conn, &scope, "lo-a", "Intro video", 10).unwrap();
    SqliteRepo::upsert_learning_object(&conn, &scope, "lo-b", "Quiz", 5).unwrap();
    SqliteRepo::upsert_learning_object(&conn, &scope, "lo-b", "Quiz", 7).unwrap();
    SqliteRepo::upsert_learning_object(&conn, &scope, "lo-unused", "Spare", 99).unwrap();

    let catalog = SqliteDurationCatalog::load(&conn, &scope, COURSE).unwrap();
    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog.estimated_duration_minutes("lo-a"), Some(10));
    assert_eq!(catalog.estimated_duration_minutes("lo-b"), Some(7));
    assert_eq!(catalog.estimated_duration_minutes("lo-c"), None);
}

#[test]
fn test_hydrated_store_enforces_given_limits() {
    let (_dir, mut conn) = setup_db();
    let scope = tenant("acme");
    let (store, leaves) = sample_course();
    save_course(&mut conn, &scope, &store);

    let config = GraphConfig::from_toml_str("max_name_len = 4").unwrap();
    let mut loaded = load_course(&conn, &scope, COURSE, &config).unwrap();
    assert_eq!(loaded.config(), &config);

    let err = tree_ops::rename_item(&mut loaded, &leaves[0], "Too long".to_string()).unwrap_err();
    assert!(matches!(err, CourseGraphError::InvalidName { .. }));
}
