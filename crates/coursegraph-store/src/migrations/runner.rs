use std::collections::HashMap;

use crate::errors::{checksum_mismatch, from_rusqlite, migration_error, Result};
use crate::migrations::checksums::compute_checksum;
use crate::migrations::embedded::get_migrations;
use rusqlite::Connection;

/// Apply all pending migrations
///
/// Already applied migrations are skipped after their recorded checksum is
/// compared with the embedded SQL.
///
/// # Errors
///
/// Returns `Persistence` if a migration fails, if a recorded checksum
/// differs from the embedded SQL, or if the database records a migration
/// this build does not know.
pub fn apply_migrations(conn: &mut Connection) -> Result<()> {
    create_schema_version_table(conn)?;

    let migrations = get_migrations();
    let recorded: HashMap<String, String> = applied_migrations(conn)?.into_iter().collect();

    for migration_id in recorded.keys() {
        if !migrations.iter().any(|m| m.id == migration_id.as_str()) {
            return Err(migration_error(
                migration_id,
                "recorded in schema_version but unknown to this build",
            ));
        }
    }

    for migration in migrations {
        let checksum = compute_checksum(migration.sql);
        match recorded.get(migration.id) {
            Some(stored) if stored != &checksum => {
                return Err(checksum_mismatch(migration.id, stored, &checksum));
            }
            Some(_) => {}
            None => apply_migration(conn, migration.id, migration.sql, &checksum)?,
        }
    }

    Ok(())
}

/// Applied migrations as (migration_id, checksum) in application order
///
/// # Errors
///
/// Returns `Persistence` if `schema_version` cannot be read.
pub fn applied_migrations(conn: &Connection) -> Result<Vec<(String, String)>> {
    let mut stmt = conn
        .prepare("SELECT migration_id, checksum FROM schema_version ORDER BY id")
        .map_err(from_rusqlite)?;
    let rows = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(from_rusqlite)?;
    Ok(rows)
}

fn create_schema_version_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            id INTEGER PRIMARY KEY,
            migration_id TEXT NOT NULL UNIQUE,
            applied_at INTEGER NOT NULL,
            checksum TEXT NOT NULL
        )",
        [],
    )
    .map_err(from_rusqlite)?;

    Ok(())
}

fn apply_migration(
    conn: &mut Connection,
    migration_id: &str,
    sql: &str,
    checksum: &str,
) -> Result<()> {
    let tx = conn.transaction().map_err(from_rusqlite)?;

    tx.execute_batch(sql)
        .map_err(|e| migration_error(migration_id, &e.to_string()))?;

    tx.execute(
        "INSERT INTO schema_version (migration_id, applied_at, checksum) VALUES (?1, ?2, ?3)",
        rusqlite::params![migration_id, chrono::Utc::now().timestamp_millis(), checksum],
    )
    .map_err(from_rusqlite)?;

    tx.commit().map_err(from_rusqlite)?;

    tracing::debug!(migration_id, "Applied migration");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_twice() {
        let mut conn = Connection::open_in_memory().unwrap();
        apply_migrations(&mut conn).unwrap();
        apply_migrations(&mut conn).unwrap();
        assert_eq!(applied_migrations(&conn).unwrap().len(), 3);
    }
}
