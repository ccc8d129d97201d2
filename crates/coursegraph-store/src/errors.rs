//! Error helpers for the store
//!
//! The store reports failures as the core crate's `ExError`.

use coursegraph_core::errors::{ExError, ExErrorKind};

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Message raised by the triggers guarding snapshot tables
pub const SNAPSHOT_IMMUTABLE_MESSAGE: &str = "snapshot rows are immutable";

pub fn migration_error(migration_id: &str, reason: &str) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("migration")
        .with_entity_id(migration_id)
        .with_message(format!("Migration {} failed: {}", migration_id, reason))
}

pub fn checksum_mismatch(migration_id: &str, expected: &str, actual: &str) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("migration_checksum")
        .with_entity_id(migration_id)
        .with_message(format!(
            "Checksum mismatch for migration {}: recorded {}, embedded {}",
            migration_id, expected, actual
        ))
}

pub fn not_found(op: &str, entity_id: &str, what: &str) -> ExError {
    ExError::new(ExErrorKind::NotFound)
        .with_op(op)
        .with_entity_id(entity_id)
        .with_message(format!("{} not found: {}", what, entity_id))
}

/// Map a rusqlite error onto an error kind
///
/// Trigger aborts on snapshot tables become `SnapshotImmutable`, lock
/// timeouts become `Concurrency` and rows that do not decode become
/// `Serialization`. Everything else is `Persistence`.
pub fn from_rusqlite(err: rusqlite::Error) -> ExError {
    let kind = match &err {
        rusqlite::Error::SqliteFailure(_, Some(msg))
            if msg.contains(SNAPSHOT_IMMUTABLE_MESSAGE) =>
        {
            ExErrorKind::SnapshotImmutable
        }
        rusqlite::Error::SqliteFailure(e, _)
            if matches!(
                e.code,
                rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked
            ) =>
        {
            ExErrorKind::Concurrency
        }
        rusqlite::Error::FromSqlConversionFailure(..)
        | rusqlite::Error::IntegralValueOutOfRange(..)
        | rusqlite::Error::InvalidColumnType(..) => ExErrorKind::Serialization,
        _ => ExErrorKind::Persistence,
    };

    ExError::new(kind)
        .with_op("sqlite")
        .with_message(err.to_string())
}
