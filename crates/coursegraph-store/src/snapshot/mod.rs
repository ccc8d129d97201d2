//! Snapshot storage
//!
//! Snapshots are inserted once, whole, inside the caller's transaction and
//! read back as `FrozenSnapshot`s. Triggers on the snapshot tables reject any
//! later UPDATE or DELETE.

pub mod persist;
pub mod query;

pub use persist::persist_snapshot;
pub use query::{list_snapshots, load_snapshot, snapshot_exists};
