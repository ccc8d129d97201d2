//! Coursegraph Engine - Orchestration layer
//!
//! Runs core content graph operations against persisted courses: hydrate the
//! course from SQLite, apply the operation in memory, validate, and write the
//! result back, all inside one `BEGIN IMMEDIATE` transaction.

pub mod commands;

pub use commands::authoring::apply_course_command;
pub use commands::engine_command::{apply_engine_command, EngineCommand, EngineCommandResult};
pub use commands::engine_query::{apply_engine_query, EngineQuery, EngineQueryResult};
pub use commands::snapshot::{create_snapshot, SnapshotOptions};
