//! Command orchestration layer.
//!
//! Provides high-level command functions that coordinate between
//! core domain logic and persistence layer.

pub mod authoring;
pub mod engine_command;
pub mod engine_query;
pub mod snapshot;

use coursegraph_core::errors::ExError;
use coursegraph_core::CourseGraphError;
use coursegraph_core_types::RequestContext;
use coursegraph_store::errors::Result;
use coursegraph_store::repo::SqliteRepo;
use coursegraph_store::TenantScope;
use rusqlite::Connection;

/// Reject ids that name a snapshot or snapshot item
pub(crate) fn guard_not_snapshot(conn: &Connection, scope: &TenantScope, id: &str) -> Result<()> {
    if SqliteRepo::is_snapshot_entity(conn, scope, id)? {
        return Err(CourseGraphError::SnapshotImmutable {
            entity_id: id.to_string(),
        }
        .into());
    }
    Ok(())
}

/// Fail with `VersionConflict` unless the course is at the expected version
pub(crate) fn check_version(
    conn: &Connection,
    scope: &TenantScope,
    course_id: &str,
    expected: Option<u64>,
) -> Result<u64> {
    let actual = SqliteRepo::course_version(conn, scope, course_id)?;
    match expected {
        Some(expected) if expected != actual => Err(CourseGraphError::VersionConflict {
            course_id: course_id.to_string(),
            expected,
            actual,
        }
        .into()),
        _ => Ok(actual),
    }
}

/// Course owning a live item
///
/// Snapshot item ids fail with `SnapshotImmutable`, unknown ids with `NotFound`.
pub(crate) fn course_of_item(
    conn: &Connection,
    scope: &TenantScope,
    item_id: &str,
) -> Result<String> {
    if let Some(course_id) = SqliteRepo::item_course_id(conn, scope, item_id)? {
        return Ok(course_id);
    }
    guard_not_snapshot(conn, scope, item_id)?;
    Err(ExError::from(CourseGraphError::ItemNotFound {
        item_id: item_id.to_string(),
    })
    .with_op("course_of_item"))
}

/// Attach the request id to an error leaving the engine
pub(crate) fn with_request(err: ExError, ctx: &RequestContext) -> ExError {
    if err.request_id().is_some() {
        return err;
    }
    err.with_request_id(ctx.request_id.clone())
}
