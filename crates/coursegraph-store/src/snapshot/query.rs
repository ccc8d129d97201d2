//! Snapshot read-back

use coursegraph_core::{FrozenSnapshot, Snapshot, SnapshotEdge, SnapshotItem};
use rusqlite::{Connection, OptionalExtension, Row};

use crate::errors::{from_rusqlite, not_found, Result};
use crate::repo::{from_millis, kind_from_columns};
use crate::tenant::TenantScope;

const HEADER_COLUMNS: &str =
    "id, source_course_id, source_version, created_at, item_count, estimated_duration_minutes";

fn header_from_row(row: &Row<'_>) -> rusqlite::Result<Snapshot> {
    let source_version: i64 = row.get(2)?;
    let item_count: i64 = row.get(4)?;
    let minutes: i64 = row.get(5)?;
    Ok(Snapshot {
        id: row.get(0)?,
        source_course_id: row.get(1)?,
        source_version: source_version as u64,
        created_at: from_millis(row.get(3)?),
        item_count: item_count as usize,
        estimated_duration_minutes: minutes as u64,
    })
}

/// True if any tenant has a snapshot with this id
///
/// Snapshot ids are globally unique, so existence is not tenant-scoped.
pub fn snapshot_exists(conn: &Connection, snapshot_id: &str) -> Result<bool> {
    let found: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM snapshots WHERE id = ?1",
            [snapshot_id],
            |row| row.get(0),
        )
        .optional()
        .map_err(from_rusqlite)?;
    Ok(found.is_some())
}

/// Load a snapshot with its items and edges
///
/// ## Errors
///
/// - `ExErrorKind::NotFound`: the tenant has no snapshot with this id
/// - `ExErrorKind::Persistence` / `ExErrorKind::Serialization`: rows cannot be read
pub fn load_snapshot(
    conn: &Connection,
    scope: &TenantScope,
    snapshot_id: &str,
) -> Result<FrozenSnapshot> {
    let header = conn
        .query_row(
            &format!(
                "SELECT {} FROM snapshots WHERE tenant_id = ?1 AND id = ?2",
                HEADER_COLUMNS
            ),
            [scope.tenant_id(), snapshot_id],
            header_from_row,
        )
        .optional()
        .map_err(from_rusqlite)?
        .ok_or_else(|| not_found("load_snapshot", snapshot_id, "Snapshot"))?;

    let mut stmt = conn
        .prepare(
            "SELECT id, snapshot_id, name, kind, learning_object_id, parent_id, depth, sort_order
             FROM snapshot_items WHERE snapshot_id = ?1
             ORDER BY depth, sort_order, id",
        )
        .map_err(from_rusqlite)?;
    let items = stmt
        .query_map([snapshot_id], |row| {
            let kind: String = row.get(3)?;
            Ok(SnapshotItem {
                id: row.get(0)?,
                snapshot_id: row.get(1)?,
                name: row.get(2)?,
                kind: kind_from_columns(3, &kind, row.get(4)?)?,
                parent_id: row.get(5)?,
                depth: row.get(6)?,
                sort_order: row.get(7)?,
            })
        })
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(from_rusqlite)?;

    let mut stmt = conn
        .prepare(
            "SELECT id, snapshot_id, from_item_id, to_item_id
             FROM snapshot_edges WHERE snapshot_id = ?1 ORDER BY id",
        )
        .map_err(from_rusqlite)?;
    let edges = stmt
        .query_map([snapshot_id], |row| {
            Ok(SnapshotEdge {
                id: row.get(0)?,
                snapshot_id: row.get(1)?,
                from_item_id: row.get(2)?,
                to_item_id: row.get(3)?,
            })
        })
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(from_rusqlite)?;

    Ok(FrozenSnapshot::from_parts(header, items, edges))
}

/// Snapshot headers of one course, oldest first
pub fn list_snapshots(
    conn: &Connection,
    scope: &TenantScope,
    course_id: &str,
) -> Result<Vec<Snapshot>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {} FROM snapshots
             WHERE tenant_id = ?1 AND source_course_id = ?2
             ORDER BY created_at, id",
            HEADER_COLUMNS
        ))
        .map_err(from_rusqlite)?;
    let headers = stmt
        .query_map([scope.tenant_id(), course_id], header_from_row)
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(from_rusqlite)?;
    Ok(headers)
}
