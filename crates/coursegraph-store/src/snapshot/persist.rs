//! Write-once snapshot persistence

use coursegraph_core::errors::{ExError, ExErrorKind};
use coursegraph_core::FrozenSnapshot;
use rusqlite::Transaction;

use super::query::snapshot_exists;
use crate::errors::{from_rusqlite, Result};
use crate::repo::{kind_columns, to_millis};
use crate::tenant::TenantScope;

/// Insert a snapshot header with all of its items and edges.
///
/// Items are written parent first, so every `parent_id` already exists when
/// its child is inserted.
///
/// ## Errors
///
/// - `ExErrorKind::SnapshotImmutable`: a snapshot with this id already exists
/// - `ExErrorKind::Persistence`: an insert failed
pub fn persist_snapshot(
    tx: &Transaction,
    scope: &TenantScope,
    frozen: &FrozenSnapshot,
) -> Result<()> {
    let header = frozen.snapshot();

    if snapshot_exists(tx, header.id.as_str())? {
        return Err(ExError::new(ExErrorKind::SnapshotImmutable)
            .with_op("persist_snapshot")
            .with_entity_id(&header.id)
            .with_message("Snapshot already exists and cannot be rewritten"));
    }

    tx.execute(
        "INSERT INTO snapshots (id, tenant_id, source_course_id, source_version, created_at,
                                item_count, estimated_duration_minutes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        rusqlite::params![
            header.id,
            scope.tenant_id(),
            header.source_course_id,
            header.source_version as i64,
            to_millis(&header.created_at),
            header.item_count as i64,
            header.estimated_duration_minutes as i64,
        ],
    )
    .map_err(from_rusqlite)?;

    let mut insert_item = tx
        .prepare(
            "INSERT INTO snapshot_items (id, snapshot_id, name, kind, learning_object_id,
                                         parent_id, depth, sort_order)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )
        .map_err(from_rusqlite)?;
    for item in frozen.items() {
        let (kind, learning_object_id) = kind_columns(&item.kind);
        insert_item
            .execute(rusqlite::params![
                item.id,
                item.snapshot_id,
                item.name,
                kind,
                learning_object_id,
                item.parent_id,
                item.depth,
                item.sort_order,
            ])
            .map_err(from_rusqlite)?;
    }

    let mut insert_edge = tx
        .prepare(
            "INSERT INTO snapshot_edges (id, snapshot_id, from_item_id, to_item_id)
             VALUES (?1, ?2, ?3, ?4)",
        )
        .map_err(from_rusqlite)?;
    for edge in frozen.edges() {
        insert_edge
            .execute(rusqlite::params![
                edge.id,
                edge.snapshot_id,
                edge.from_item_id,
                edge.to_item_id,
            ])
            .map_err(from_rusqlite)?;
    }

    tracing::debug!(
        snapshot_id = %header.id,
        source_course_id = %header.source_course_id,
        item_count = header.item_count,
        edge_count = frozen.edges().len(),
        "Persisted snapshot"
    );

    Ok(())
}
