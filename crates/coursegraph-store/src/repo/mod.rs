//! Repository layer between the in-memory `Store` and SQLite

pub mod hydration;
pub mod sqlite_repo;

pub use sqlite_repo::SqliteRepo;

use chrono::{DateTime, Utc};
use coursegraph_core::errors::{ExError, ExErrorKind};
use coursegraph_core::ItemKind;
use rusqlite::types::Type;

/// Timestamps are stored as Unix milliseconds
pub(crate) fn to_millis(at: &DateTime<Utc>) -> i64 {
    at.timestamp_millis()
}

pub(crate) fn from_millis(ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms).unwrap_or_else(Utc::now)
}

/// Split an item kind into its `kind` and `learning_object_id` columns
pub(crate) fn kind_columns(kind: &ItemKind) -> (&'static str, Option<&str>) {
    (kind.as_str(), kind.learning_object_id())
}

/// Rebuild an item kind from its columns; `column` is the index of `kind`
pub(crate) fn kind_from_columns(
    column: usize,
    kind: &str,
    learning_object_id: Option<String>,
) -> rusqlite::Result<ItemKind> {
    match (kind, learning_object_id) {
        ("folder", None) => Ok(ItemKind::Folder),
        ("leaf", Some(lo)) => Ok(ItemKind::leaf(lo)),
        (other, lo) => Err(rusqlite::Error::FromSqlConversionFailure(
            column,
            Type::Text,
            Box::new(
                ExError::new(ExErrorKind::Serialization)
                    .with_message(format!("Bad item kind {} (learning object {:?})", other, lo)),
            ),
        )),
    }
}
