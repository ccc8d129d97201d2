// Read-only engine queries and operation boundary logging

mod common;

use common::{create_course, leaf, ordered_course, setup, COURSE};
use coursegraph_core::logging_facility::init_test_capture;
use coursegraph_core::{Command, ExErrorKind, GraphConfig};
use coursegraph_core_types::{RequestContext, RequestId};
use coursegraph_engine::{apply_course_command, apply_engine_query, EngineQuery, EngineQueryResult};

#[test]
fn test_chain_status_reports_uncovered_leaves() {
    let (_dir, mut conn, scope) = setup();
    ordered_course(&mut conn, &scope);
    leaf(&mut conn, &scope, COURSE, "Stray", None);

    let result = apply_engine_query(
        EngineQuery::ChainStatus {
            course_id: COURSE.to_string(),
        },
        &conn,
        &scope,
        &GraphConfig::default(),
    )
    .unwrap();

    match result {
        EngineQueryResult::ChainStatus(status) => {
            assert_eq!(status.sequence_len, 3);
            assert_eq!(status.leaf_count, 4);
            assert!(!status.is_complete);
        }
        other => panic!("unexpected result {:?}", other),
    }
}

#[test]
fn test_course_sequence_without_start_fails() {
    let (_dir, mut conn, scope) = setup();
    create_course(&mut conn, &scope, COURSE);
    leaf(&mut conn, &scope, COURSE, "A", None);

    let err = apply_engine_query(
        EngineQuery::CourseSequence {
            course_id: COURSE.to_string(),
        },
        &conn,
        &scope,
        &GraphConfig::default(),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::StartPointRequired);
}

#[test]
fn test_course_get_unknown_is_not_found() {
    let (_dir, conn, scope) = setup();

    let err = apply_engine_query(
        EngineQuery::CourseGet {
            course_id: "nope".to_string(),
        },
        &conn,
        &scope,
        &GraphConfig::default(),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::NotFound);
}

#[test]
fn test_engine_commands_log_request_id() {
    let capture = init_test_capture();
    let (_dir, mut conn, scope) = setup();
    let ctx = RequestContext {
        request_id: RequestId::from_string("req-logging-1".to_string()),
        ..RequestContext::default()
    };

    apply_course_command(
        &mut conn,
        &scope,
        &GraphConfig::default(),
        &ctx,
        Command::CourseCreate {
            course_id: "logged-course".to_string(),
            title: "Logged".to_string(),
        },
        None,
    )
    .unwrap();

    let tagged = capture.count_events(|e| {
        e.op() == Some("course.create") && e.field("request_id") == Some("req-logging-1")
    });
    assert_eq!(tagged, 2, "start and end carry the request id");
}

#[test]
fn test_engine_errors_log_end_error() {
    let capture = init_test_capture();
    let (_dir, mut conn, scope) = setup();
    let ctx = RequestContext {
        request_id: RequestId::from_string("req-logging-2".to_string()),
        ..RequestContext::default()
    };

    let err = apply_course_command(
        &mut conn,
        &scope,
        &GraphConfig::default(),
        &ctx,
        Command::ChainDisconnect {
            item_id: "ghost".to_string(),
        },
        None,
    )
    .unwrap_err();
    assert_eq!(err.request_id().map(RequestId::as_str), Some("req-logging-2"));

    let errors = capture.count_events(|e| {
        e.event() == Some("end_error")
            && e.field("request_id") == Some("req-logging-2")
            && e.field("err_code").is_some()
    });
    assert_eq!(errors, 1);
}

#[test]
fn test_queries_and_commands_travel_as_json() {
    let (_dir, mut conn, scope) = setup();
    ordered_course(&mut conn, &scope);

    let query: EngineQuery =
        serde_json::from_str(r#"{"query": "chain_status", "course_id": "course-1"}"#).unwrap();
    let result = apply_engine_query(query, &conn, &scope, &GraphConfig::default()).unwrap();

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["result"], "chain_status");
    assert_eq!(json["data"]["sequence_len"], 3);
    assert_eq!(json["data"]["is_complete"], true);

    let cmd: coursegraph_engine::EngineCommand = serde_json::from_str(
        r#"{
            "type": "course",
            "command": {"type": "chain_disconnect", "item_id": "x"},
            "expected_version": 7
        }"#,
    )
    .unwrap();
    assert!(matches!(
        cmd,
        coursegraph_engine::EngineCommand::Course {
            expected_version: Some(7),
            ..
        }
    ));
}
