//! Engine-level read-only query surface.
//!
//! `apply_engine_query` takes a shared connection and never writes.

use coursegraph_core::ops::chain_ops::{self, ChainStatus};
use coursegraph_core::{log_op_end, log_op_error, log_op_start};
use coursegraph_core::{Course, GraphConfig, Item, Snapshot, SnapshotItem};
use coursegraph_store::errors::{not_found, Result};
use coursegraph_store::repo::hydration::load_course;
use coursegraph_store::repo::SqliteRepo;
use coursegraph_store::snapshot::list_snapshots;
use coursegraph_store::TenantScope;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::commands::snapshot::{course_ordered_sequence, snapshot_ordered_sequence};

/// Read-only queries supported by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "query", rename_all = "snake_case")]
pub enum EngineQuery {
    CourseGet { course_id: String },
    CourseList,
    /// Live items in learning order.
    CourseSequence { course_id: String },
    /// How many leaves the learning order covers.
    ChainStatus { course_id: String },
    SnapshotList { course_id: String },
    /// Snapshot items in learning order.
    SnapshotSequence { snapshot_id: String },
}

impl EngineQuery {
    pub fn op_name(&self) -> &'static str {
        match self {
            EngineQuery::CourseGet { .. } => "course.get",
            EngineQuery::CourseList => "course.list",
            EngineQuery::CourseSequence { .. } => "course.sequence",
            EngineQuery::ChainStatus { .. } => "chain.status",
            EngineQuery::SnapshotList { .. } => "snapshot.list",
            EngineQuery::SnapshotSequence { .. } => "snapshot.sequence",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "result", content = "data", rename_all = "snake_case")]
pub enum EngineQueryResult {
    Course(Course),
    Courses(Vec<Course>),
    Items(Vec<Item>),
    ChainStatus(ChainStatus),
    Snapshots(Vec<Snapshot>),
    SnapshotItems(Vec<SnapshotItem>),
}

/// Run a read-only query
///
/// # Errors
///
/// Returns `NotFound` for unknown courses or snapshots, and whatever the
/// underlying traversal raises (`StartPointRequired` for chains without a start).
pub fn apply_engine_query(
    query: EngineQuery,
    conn: &Connection,
    scope: &TenantScope,
    config: &GraphConfig,
) -> Result<EngineQueryResult> {
    let op = query.op_name();
    log_op_start!(op, tenant_id = scope.tenant_id());
    let start = std::time::Instant::now();

    let result = (|| -> Result<EngineQueryResult> {
        match query {
            EngineQuery::CourseGet { course_id } => SqliteRepo::get_course(conn, scope, &course_id)?
                .map(EngineQueryResult::Course)
                .ok_or_else(|| not_found(op, &course_id, "Course")),
            EngineQuery::CourseList => {
                let courses = SqliteRepo::list_courses(conn, scope)?;
                Ok(EngineQueryResult::Courses(courses))
            }
            EngineQuery::CourseSequence { course_id } => Ok(EngineQueryResult::Items(
                course_ordered_sequence(conn, scope, config, &course_id)?,
            )),
            EngineQuery::ChainStatus { course_id } => {
                let store = load_course(conn, scope, &course_id, config)?;
                let status = chain_ops::chain_status(&store, &course_id)?;
                Ok(EngineQueryResult::ChainStatus(status))
            }
            EngineQuery::SnapshotList { course_id } => {
                SqliteRepo::course_version(conn, scope, &course_id)?;
                let snapshots = list_snapshots(conn, scope, &course_id)?;
                Ok(EngineQueryResult::Snapshots(snapshots))
            }
            EngineQuery::SnapshotSequence { snapshot_id } => Ok(EngineQueryResult::SnapshotItems(
                snapshot_ordered_sequence(conn, scope, &snapshot_id)?,
            )),
        }
    })();

    let elapsed = start.elapsed().as_millis() as u64;
    match &result {
        Ok(_) => log_op_end!(op, duration_ms = elapsed),
        Err(e) => log_op_error!(op, e.clone(), duration_ms = elapsed),
    }
    result
}
