//! Connection management

use std::path::Path;
use std::time::Duration;

use crate::errors::{from_rusqlite, Result};
use rusqlite::Connection;

/// How long a writer waits for another writer's lock before failing
pub const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Open (or create) a database file and configure it
///
/// # Errors
///
/// Returns `Persistence` if the file cannot be opened or configured.
pub fn open<P: AsRef<Path>>(path: P) -> Result<Connection> {
    let conn = Connection::open(path).map_err(from_rusqlite)?;
    configure(&conn)?;
    Ok(conn)
}

/// Open a configured in-memory database
///
/// # Errors
///
/// Returns `Persistence` if SQLite cannot allocate the database.
pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory().map_err(from_rusqlite)?;
    configure(&conn)?;
    Ok(conn)
}

/// Enable foreign keys, WAL journaling and the busy timeout
///
/// # Errors
///
/// Returns `Persistence` if a pragma is rejected.
pub fn configure(conn: &Connection) -> Result<()> {
    conn.pragma_update(None, "foreign_keys", "ON")
        .map_err(from_rusqlite)?;

    // In-memory databases report "memory" and stay that way
    let _mode: String = conn
        .query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))
        .map_err(from_rusqlite)?;

    conn.busy_timeout(BUSY_TIMEOUT).map_err(from_rusqlite)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_foreign_keys_enabled() {
        let conn = open_in_memory().unwrap();
        let enabled: i64 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(enabled, 1);
    }
}
