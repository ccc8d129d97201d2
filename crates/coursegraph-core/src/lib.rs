//! Coursegraph Core - in-memory course content graph and snapshot engine
//!
//! This crate owns the two overlapping structures built over a course's items:
//! - the **content tree** (folders and leaves, depth accounting, move/delete rules)
//! - the **learning order chain** (a simple path over leaves with one start)
//!
//! and the **snapshot engine** that deep-copies both into an immutable,
//! independently identified structure for a time-bound offering.
//!
//! Storage is an arena keyed by stable identifiers (`ops::Store`); parent and
//! chain links are indices, never embedded references.

pub mod apply;
pub mod catalog;
pub mod commands;
pub mod config;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod ops;
pub mod rules;
pub mod traversal;

// Re-exported so the logging macros resolve schema constants through `$crate`
pub use coursegraph_core_types;

pub use apply::apply;
pub use catalog::{LearningObjectCatalog, NoDurationCatalog, StaticDurationCatalog};
pub use commands::{Command, CommandResult};
pub use config::GraphConfig;
pub use errors::{CourseGraphError, ExError, ExErrorKind, Result};
pub use model::{Course, Edge, FrozenSnapshot, Item, ItemKind, Snapshot, SnapshotEdge, SnapshotItem};
pub use ops::Store;
