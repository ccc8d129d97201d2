//! Tenant-scoped persistence of courses, items, edges and learning objects

use coursegraph_core::errors::{ExError, ExErrorKind};
use coursegraph_core::{Course, Edge, Item, Store};
use rusqlite::{Connection, OptionalExtension, Row, Transaction};

use super::{from_millis, kind_columns, kind_from_columns, to_millis};
use crate::errors::{from_rusqlite, not_found, Result};
use crate::tenant::TenantScope;

pub(crate) const ITEM_COLUMNS: &str =
    "id, course_id, name, kind, learning_object_id, parent_id, \
     depth, sort_order, created_at, updated_at";

pub(crate) fn item_from_row(row: &Row<'_>) -> rusqlite::Result<Item> {
    let kind: String = row.get(3)?;
    Ok(Item {
        id: row.get(0)?,
        course_id: row.get(1)?,
        name: row.get(2)?,
        kind: kind_from_columns(3, &kind, row.get(4)?)?,
        parent_id: row.get(5)?,
        depth: row.get(6)?,
        sort_order: row.get(7)?,
        created_at: from_millis(row.get(8)?),
        updated_at: from_millis(row.get(9)?),
    })
}

pub(crate) fn edge_from_row(row: &Row<'_>) -> rusqlite::Result<Edge> {
    Ok(Edge {
        id: row.get(0)?,
        course_id: row.get(1)?,
        from_item_id: row.get(2)?,
        to_item_id: row.get(3)?,
        created_at: from_millis(row.get(4)?),
    })
}

fn course_from_row(row: &Row<'_>) -> rusqlite::Result<Course> {
    let version: i64 = row.get(2)?;
    Ok(Course {
        id: row.get(0)?,
        title: row.get(1)?,
        version: version as u64,
        created_at: from_millis(row.get(3)?),
        updated_at: from_millis(row.get(4)?),
    })
}

/// SQLite repository for course graphs
pub struct SqliteRepo;

impl SqliteRepo {
    /// Insert a new course row
    ///
    /// # Errors
    ///
    /// Returns `AlreadyExists` if the tenant already has a course with this id.
    pub fn create_course(conn: &Connection, scope: &TenantScope, course: &Course) -> Result<()> {
        if Self::get_course(conn, scope, &course.id)?.is_some() {
            return Err(ExError::new(ExErrorKind::AlreadyExists)
                .with_op("create_course")
                .with_course_id(&course.id)
                .with_message(format!("Course already exists: {}", course.id)));
        }

        conn.execute(
            "INSERT INTO courses (tenant_id, id, title, version, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
                scope.tenant_id(),
                course.id,
                course.title,
                course.version as i64,
                to_millis(&course.created_at),
                to_millis(&course.updated_at),
            ],
        )
        .map_err(from_rusqlite)?;

        Ok(())
    }

    /// # Errors
    ///
    /// Returns `Persistence` if the query fails.
    pub fn get_course(
        conn: &Connection,
        scope: &TenantScope,
        course_id: &str,
    ) -> Result<Option<Course>> {
        conn.query_row(
            "SELECT id, title, version, created_at, updated_at
             FROM courses WHERE tenant_id = ?1 AND id = ?2",
            [scope.tenant_id(), course_id],
            course_from_row,
        )
        .optional()
        .map_err(from_rusqlite)
    }

    /// Current version of a course
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the tenant has no such course.
    pub fn course_version(conn: &Connection, scope: &TenantScope, course_id: &str) -> Result<u64> {
        Self::get_course(conn, scope, course_id)?
            .map(|c| c.version)
            .ok_or_else(|| not_found("course_version", course_id, "Course"))
    }

    /// # Errors
    ///
    /// Returns `Persistence` if the query fails.
    pub fn list_courses(conn: &Connection, scope: &TenantScope) -> Result<Vec<Course>> {
        let mut stmt = conn
            .prepare(
                "SELECT id, title, version, created_at, updated_at
                 FROM courses WHERE tenant_id = ?1 ORDER BY id",
            )
            .map_err(from_rusqlite)?;
        let courses = stmt
            .query_map([scope.tenant_id()], course_from_row)
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;
        Ok(courses)
    }

    /// Course owning a live item, if the tenant has such an item
    ///
    /// # Errors
    ///
    /// Returns `Persistence` if the query fails.
    pub fn item_course_id(
        conn: &Connection,
        scope: &TenantScope,
        item_id: &str,
    ) -> Result<Option<String>> {
        conn.query_row(
            "SELECT course_id FROM items WHERE tenant_id = ?1 AND id = ?2",
            [scope.tenant_id(), item_id],
            |row| row.get(0),
        )
        .optional()
        .map_err(from_rusqlite)
    }

    /// # Errors
    ///
    /// Returns `Persistence` if the query fails.
    pub fn get_item(conn: &Connection, scope: &TenantScope, item_id: &str) -> Result<Option<Item>> {
        conn.query_row(
            &format!("SELECT {} FROM items WHERE tenant_id = ?1 AND id = ?2", ITEM_COLUMNS),
            [scope.tenant_id(), item_id],
            item_from_row,
        )
        .optional()
        .map_err(from_rusqlite)
    }

    /// Rewrite one course's items and edges from the in-memory store
    ///
    /// Deletes the course's edges and items, inserts the store's items parent
    /// first and then its edges, and records the store's course version. Meant
    /// to run inside the caller's transaction.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the store does not hold the course, or
    /// `Persistence` if a statement fails (including constraint violations).
    pub fn replace_course_graph(
        tx: &Transaction,
        scope: &TenantScope,
        store: &Store,
        course_id: &str,
    ) -> Result<()> {
        let course = store
            .get_course(course_id)
            .map_err(|_| not_found("replace_course_graph", course_id, "Course"))?;
        let tenant = scope.tenant_id();

        tx.execute(
            "DELETE FROM edges WHERE tenant_id = ?1 AND course_id = ?2",
            [tenant, course_id],
        )
        .map_err(from_rusqlite)?;
        tx.execute(
            "DELETE FROM items WHERE tenant_id = ?1 AND course_id = ?2",
            [tenant, course_id],
        )
        .map_err(from_rusqlite)?;

        let mut insert_item = tx
            .prepare(
                "INSERT INTO items (id, tenant_id, course_id, name, kind, learning_object_id,
                                    parent_id, depth, sort_order, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            )
            .map_err(from_rusqlite)?;
        let items = store.items_parent_first(course_id);
        for item in &items {
            let (kind, learning_object_id) = kind_columns(&item.kind);
            insert_item
                .execute(rusqlite::params![
                    item.id,
                    tenant,
                    item.course_id,
                    item.name,
                    kind,
                    learning_object_id,
                    item.parent_id,
                    item.depth,
                    item.sort_order,
                    to_millis(&item.created_at),
                    to_millis(&item.updated_at),
                ])
                .map_err(from_rusqlite)?;
        }

        let mut insert_edge = tx
            .prepare(
                "INSERT INTO edges (id, tenant_id, course_id, from_item_id, to_item_id, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )
            .map_err(from_rusqlite)?;
        let edges = store.edges_in_course(course_id);
        for edge in &edges {
            insert_edge
                .execute(rusqlite::params![
                    edge.id,
                    tenant,
                    edge.course_id,
                    edge.from_item_id,
                    edge.to_item_id,
                    to_millis(&edge.created_at),
                ])
                .map_err(from_rusqlite)?;
        }

        tx.execute(
            "UPDATE courses SET title = ?3, version = ?4, updated_at = ?5
             WHERE tenant_id = ?1 AND id = ?2",
            rusqlite::params![
                tenant,
                course_id,
                course.title,
                course.version as i64,
                to_millis(&course.updated_at),
            ],
        )
        .map_err(from_rusqlite)?;

        tracing::debug!(
            course_id,
            item_count = items.len(),
            edge_count = edges.len(),
            version = course.version,
            "Rewrote course graph"
        );

        Ok(())
    }

    /// Insert or update a learning object's duration
    ///
    /// # Errors
    ///
    /// Returns `Persistence` if the statement fails.
    pub fn upsert_learning_object(
        conn: &Connection,
        scope: &TenantScope,
        learning_object_id: &str,
        title: &str,
        estimated_duration_minutes: u64,
    ) -> Result<()> {
        conn.execute(
            "INSERT INTO learning_objects (tenant_id, id, title, estimated_duration_minutes)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(tenant_id, id) DO UPDATE SET
                title = excluded.title,
                estimated_duration_minutes = excluded.estimated_duration_minutes",
            rusqlite::params![
                scope.tenant_id(),
                learning_object_id,
                title,
                estimated_duration_minutes as i64,
            ],
        )
        .map_err(from_rusqlite)?;

        Ok(())
    }

    /// True if the id names a snapshot or a snapshot item of this tenant
    ///
    /// # Errors
    ///
    /// Returns `Persistence` if the query fails.
    pub fn is_snapshot_entity(conn: &Connection, scope: &TenantScope, id: &str) -> Result<bool> {
        let found: Option<i64> = conn
            .query_row(
                "SELECT 1 FROM snapshots WHERE tenant_id = ?1 AND id = ?2
                 UNION ALL
                 SELECT 1 FROM snapshot_items si JOIN snapshots s ON s.id = si.snapshot_id
                 WHERE s.tenant_id = ?1 AND si.id = ?2
                 LIMIT 1",
                [scope.tenant_id(), id],
                |row| row.get(0),
            )
            .optional()
            .map_err(from_rusqlite)?;
        Ok(found.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::migrations::apply_migrations;

    #[test]
    fn test_course_round_trip_is_tenant_scoped() {
        let mut conn = db::open_in_memory().unwrap();
        apply_migrations(&mut conn).unwrap();
        let acme = TenantScope::new("acme").unwrap();
        let globex = TenantScope::new("globex").unwrap();

        let course = Course::new("c1".to_string(), "Rust".to_string());
        SqliteRepo::create_course(&conn, &acme, &course).unwrap();

        assert_eq!(SqliteRepo::get_course(&conn, &acme, "c1").unwrap().unwrap().title, "Rust");
        assert!(SqliteRepo::get_course(&conn, &globex, "c1").unwrap().is_none());

        let err = SqliteRepo::create_course(&conn, &acme, &course).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::AlreadyExists);
    }
}
