use coursegraph_core::logging_facility::init_test_capture;
use coursegraph_core::{
    apply, Command, CommandResult, CourseGraphError, ItemKind, NoDurationCatalog, Store,
};

fn create_course(store: &mut Store, course_id: &str) {
    apply(
        store,
        Command::CourseCreate {
            course_id: course_id.to_string(),
            title: "Logged".to_string(),
        },
        &NoDurationCatalog,
    )
    .unwrap();
}

#[test]
fn test_apply_logs_start_and_end() {
    let capture = init_test_capture();
    let mut store = Store::new();
    create_course(&mut store, "log-course-1");

    let result = apply(
        &mut store,
        Command::ItemCreate {
            course_id: "log-course-1".to_string(),
            name: "Module".to_string(),
            parent_id: None,
            kind: ItemKind::Folder,
        },
        &NoDurationCatalog,
    )
    .unwrap();
    assert!(matches!(result, CommandResult::ItemCreated(_)));

    capture.assert_event_exists("item.create", "start");
    capture.assert_event_exists("item.create", "end");
    let end = capture
        .events_for("item.create")
        .into_iter()
        .find(|e| e.event() == Some("end"))
        .unwrap();
    assert!(end.field("duration_ms").is_some());
}

#[test]
fn test_apply_logs_error_code() {
    let capture = init_test_capture();
    let mut store = Store::new();
    create_course(&mut store, "log-course-2");

    let result = apply(
        &mut store,
        Command::ChainConnect {
            from_item_id: "ghost-a".to_string(),
            to_item_id: "ghost-a".to_string(),
        },
        &NoDurationCatalog,
    );
    assert!(matches!(result, Err(CourseGraphError::CannotReferenceSelf { .. })));

    capture.assert_event_exists("chain.connect", "end_error");
    let errors = capture.count_events(|e| {
        e.op() == Some("chain.connect")
            && e.field("err_code") == Some("ERR_CANNOT_REFERENCE_SELF")
    });
    assert!(errors >= 1);
}

#[test]
fn test_apply_snapshot_command() {
    let mut store = Store::new();
    create_course(&mut store, "log-course-3");
    for name in ["A", "B"] {
        apply(
            &mut store,
            Command::ItemCreate {
                course_id: "log-course-3".to_string(),
                name: name.to_string(),
                parent_id: None,
                kind: ItemKind::leaf(format!("lo-{}", name)),
            },
            &NoDurationCatalog,
        )
        .unwrap();
    }
    apply(
        &mut store,
        Command::ChainAutoGenerate {
            course_id: "log-course-3".to_string(),
        },
        &NoDurationCatalog,
    )
    .unwrap();

    let result = apply(
        &mut store,
        Command::SnapshotCreate {
            course_id: "log-course-3".to_string(),
        },
        &NoDurationCatalog,
    )
    .unwrap();

    match result {
        CommandResult::SnapshotCreated(snapshot) => {
            assert_eq!(snapshot.item_count, 2);
            assert_eq!(snapshot.source_course_id, "log-course-3");
        }
        other => panic!("unexpected result: {:?}", other),
    }
}
