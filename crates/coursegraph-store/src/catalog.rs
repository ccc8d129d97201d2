//! Learning object durations read from the `learning_objects` table

use coursegraph_core::catalog::{LearningObjectCatalog, StaticDurationCatalog};
use rusqlite::Connection;

use crate::errors::{from_rusqlite, Result};
use crate::tenant::TenantScope;

/// Durations of the learning objects one course's leaves reference
///
/// Prefetched in a single query so freezing a course does no further I/O.
#[derive(Debug, Clone, Default)]
pub struct SqliteDurationCatalog {
    inner: StaticDurationCatalog,
}

impl SqliteDurationCatalog {
    /// # Errors
    ///
    /// Returns `Persistence` if the query fails.
    pub fn load(conn: &Connection, scope: &TenantScope, course_id: &str) -> Result<Self> {
        let mut stmt = conn
            .prepare(
                "SELECT DISTINCT lo.id, lo.estimated_duration_minutes
                 FROM learning_objects lo
                 JOIN items i ON i.tenant_id = lo.tenant_id AND i.learning_object_id = lo.id
                 WHERE lo.tenant_id = ?1 AND i.course_id = ?2",
            )
            .map_err(from_rusqlite)?;
        let inner = stmt
            .query_map([scope.tenant_id(), course_id], |row| {
                let minutes: i64 = row.get(1)?;
                Ok((row.get::<_, String>(0)?, minutes.max(0) as u64))
            })
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<StaticDurationCatalog, _>>()
            .map_err(from_rusqlite)?;
        Ok(Self { inner })
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl LearningObjectCatalog for SqliteDurationCatalog {
    fn estimated_duration_minutes(&self, learning_object_id: &str) -> Option<u64> {
        self.inner.estimated_duration_minutes(learning_object_id)
    }
}
