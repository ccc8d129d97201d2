//! Snapshot creation and read-back against the database
//!
//! ## Creation pipeline (in order):
//! 1. Open a `BEGIN IMMEDIATE` transaction, so no edit lands mid-copy
//! 2. Reject snapshot ids and stale `expected_version`s (no writes)
//! 3. Hydrate the course and prefetch learning object durations
//! 4. Freeze the course in memory
//! 5. Persist header, items and edges, then commit
//!
//! A failure at any step rolls back, leaving no partial snapshot.

use std::time::Instant;

use coursegraph_core::ops::chain_ops;
use coursegraph_core::ops::snapshot_ops::{freeze_course, snapshot_sequence};
use coursegraph_core::{log_op_end, log_op_error, log_op_start};
use coursegraph_core::{GraphConfig, Item, Snapshot, SnapshotItem};
use coursegraph_core_types::RequestContext;
use coursegraph_store::errors::{from_rusqlite, Result};
use coursegraph_store::repo::hydration::load_course;
use coursegraph_store::snapshot::{load_snapshot, persist_snapshot};
use coursegraph_store::{SqliteDurationCatalog, TenantScope};
use rusqlite::{Connection, TransactionBehavior};
use serde::{Deserialize, Serialize};

use super::{check_version, guard_not_snapshot, with_request};

/// Options for snapshot creation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotOptions {
    /// Course version the caller last read. If provided and the course has
    /// moved on, creation fails with a concurrency error.
    pub expected_version: Option<u64>,
}

/// Freeze a persisted course into a new snapshot
///
/// ## Errors
///
/// - `ExErrorKind::NotFound`: the tenant has no such course
/// - `ExErrorKind::SnapshotImmutable`: the id names a snapshot entity
/// - `ExErrorKind::Concurrency`: version mismatch, or the database stayed locked
/// - `ExErrorKind::Persistence`: a snapshot row could not be written
pub fn create_snapshot(
    conn: &mut Connection,
    scope: &TenantScope,
    config: &GraphConfig,
    ctx: &RequestContext,
    course_id: &str,
    options: SnapshotOptions,
) -> Result<Snapshot> {
    let start = Instant::now();
    log_op_start!(
        "snapshot.create",
        request_id = ctx.request_id.as_str(),
        course_id = course_id
    );

    let result = (|| -> Result<Snapshot> {
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(from_rusqlite)?;

        guard_not_snapshot(&tx, scope, course_id)?;
        check_version(&tx, scope, course_id, options.expected_version)?;

        let store = load_course(&tx, scope, course_id, config)?;
        let catalog = SqliteDurationCatalog::load(&tx, scope, course_id)?;
        let frozen = freeze_course(&store, course_id, &catalog)?;

        persist_snapshot(&tx, scope, &frozen)?;
        tx.commit().map_err(from_rusqlite)?;

        Ok(frozen.snapshot().clone())
    })();

    let duration_ms = start.elapsed().as_millis() as u64;
    match result {
        Ok(snapshot) => {
            log_op_end!(
                "snapshot.create",
                duration_ms = duration_ms,
                request_id = ctx.request_id.as_str(),
                snapshot_id = snapshot.id.as_str(),
                item_count = snapshot.item_count,
                source_version = snapshot.source_version
            );
            Ok(snapshot)
        }
        Err(e) => {
            let e = with_request(e, ctx);
            log_op_error!(
                "snapshot.create",
                e.clone(),
                duration_ms = duration_ms,
                request_id = ctx.request_id.as_str()
            );
            Err(e)
        }
    }
}

/// Snapshot items in learning order
///
/// ## Errors
///
/// - `ExErrorKind::NotFound`: the tenant has no such snapshot
/// - `ExErrorKind::StartPointRequired`: the snapshot has no start edge
pub fn snapshot_ordered_sequence(
    conn: &Connection,
    scope: &TenantScope,
    snapshot_id: &str,
) -> Result<Vec<SnapshotItem>> {
    let frozen = load_snapshot(conn, scope, snapshot_id)?;
    let items = snapshot_sequence(&frozen)?
        .filter_map(|id| frozen.get_item(id).cloned())
        .collect();
    Ok(items)
}

/// Live course items in learning order
///
/// ## Errors
///
/// - `ExErrorKind::NotFound`: the tenant has no such course
/// - `ExErrorKind::StartPointRequired`: the course has no start edge
pub fn course_ordered_sequence(
    conn: &Connection,
    scope: &TenantScope,
    config: &GraphConfig,
    course_id: &str,
) -> Result<Vec<Item>> {
    let store = load_course(conn, scope, course_id, config)?;
    let items = chain_ops::resolve_ordered_sequence(&store, course_id)?
        .filter_map(|id| store.get_item(id).ok().cloned())
        .collect();
    Ok(items)
}
