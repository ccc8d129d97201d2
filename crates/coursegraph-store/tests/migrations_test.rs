// Integration tests for the migration runner

use coursegraph_core::ExErrorKind;
use coursegraph_store::migrations::{applied_migrations, apply_migrations};
use rusqlite::Connection;

fn table_names(conn: &Connection) -> Vec<String> {
    let mut stmt = conn
        .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
        .unwrap();
    stmt.query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<Vec<String>, _>>()
        .unwrap()
}

#[test]
fn test_apply_migrations_on_empty_db() {
    let mut conn = Connection::open_in_memory().unwrap();

    apply_migrations(&mut conn).unwrap();

    let tables = table_names(&conn);
    for expected in [
        "courses",
        "edges",
        "items",
        "learning_objects",
        "schema_version",
        "snapshot_edges",
        "snapshot_items",
        "snapshots",
    ] {
        assert!(tables.contains(&expected.to_string()), "missing table {}", expected);
    }

    let applied: Vec<String> = applied_migrations(&conn)
        .unwrap()
        .into_iter()
        .map(|(id, _)| id)
        .collect();
    assert_eq!(
        applied,
        vec!["001_course_graph", "002_snapshots", "003_learning_objects"]
    );
}

#[test]
fn test_apply_migrations_is_idempotent() {
    let mut conn = Connection::open_in_memory().unwrap();

    apply_migrations(&mut conn).unwrap();
    apply_migrations(&mut conn).unwrap();

    assert_eq!(applied_migrations(&conn).unwrap().len(), 3);
}

#[test]
fn test_tampered_checksum_is_rejected() {
    let mut conn = Connection::open_in_memory().unwrap();
    apply_migrations(&mut conn).unwrap();

    conn.execute(
        "UPDATE schema_version SET checksum = 'deadbeef' WHERE migration_id = '002_snapshots'",
        [],
    )
    .unwrap();

    let err = apply_migrations(&mut conn).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Persistence);
    assert!(err.message().contains("Checksum mismatch"));
}

#[test]
fn test_unknown_recorded_migration_is_rejected() {
    let mut conn = Connection::open_in_memory().unwrap();
    apply_migrations(&mut conn).unwrap();

    conn.execute(
        "INSERT INTO schema_version (migration_id, applied_at, checksum)
         VALUES ('999_future', 0, 'x')",
        [],
    )
    .unwrap();

    let err = apply_migrations(&mut conn).unwrap_err();
    assert_eq!(err.entity_id(), Some("999_future"));
}
