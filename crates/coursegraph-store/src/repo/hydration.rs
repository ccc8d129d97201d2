//! Hydration: load one course's graph from SQLite into an in-memory `Store`

use coursegraph_core::{GraphConfig, Store};
use rusqlite::Connection;

use super::sqlite_repo::{edge_from_row, item_from_row, SqliteRepo, ITEM_COLUMNS};
use crate::errors::{from_rusqlite, not_found, Result};
use crate::tenant::TenantScope;

/// Load a course into a fresh store that enforces `config`
///
/// # Errors
///
/// Returns `NotFound` if the tenant has no such course, or `Persistence` /
/// `Serialization` if rows cannot be read.
pub fn load_course(
    conn: &Connection,
    scope: &TenantScope,
    course_id: &str,
    config: &GraphConfig,
) -> Result<Store> {
    let mut store = Store::with_config(config.clone());
    load_course_into(conn, scope, course_id, &mut store)?;
    Ok(store)
}

/// Load a course into an existing store
///
/// Items are inserted parent first so the store's child index is built in
/// sibling order.
///
/// # Errors
///
/// See [`load_course`]. Also fails if the store already holds the course.
pub fn load_course_into(
    conn: &Connection,
    scope: &TenantScope,
    course_id: &str,
    store: &mut Store,
) -> Result<()> {
    let course = SqliteRepo::get_course(conn, scope, course_id)?
        .ok_or_else(|| not_found("load_course", course_id, "Course"))?;
    store.insert_course(course)?;

    let mut stmt = conn
        .prepare(&format!(
            "SELECT {} FROM items
             WHERE tenant_id = ?1 AND course_id = ?2
             ORDER BY depth, sort_order, id",
            ITEM_COLUMNS
        ))
        .map_err(from_rusqlite)?;
    let items = stmt
        .query_map([scope.tenant_id(), course_id], item_from_row)
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(from_rusqlite)?;
    let item_count = items.len();
    for item in items {
        store.insert_item(item);
    }

    let mut stmt = conn
        .prepare(
            "SELECT id, course_id, from_item_id, to_item_id, created_at FROM edges
             WHERE tenant_id = ?1 AND course_id = ?2
             ORDER BY id",
        )
        .map_err(from_rusqlite)?;
    let edges = stmt
        .query_map([scope.tenant_id(), course_id], edge_from_row)
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(from_rusqlite)?;
    let edge_count = edges.len();
    for edge in edges {
        store.insert_edge(edge);
    }

    tracing::debug!(course_id, item_count, edge_count, "Hydrated course");

    Ok(())
}
