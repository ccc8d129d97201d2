//! Coursegraph Store - SQLite persistence for course graphs and snapshots
//!
//! Provides:
//! - Embedded, checksummed schema migrations
//! - Tenant-scoped repository for courses, items, edges and learning objects
//! - Hydration of one course's graph into an in-memory `Store`
//! - Write-once persistence and read-back of frozen snapshots

pub mod catalog;
pub mod db;
pub mod errors;
pub mod migrations;
pub mod repo;
pub mod snapshot;
pub mod tenant;

pub use catalog::SqliteDurationCatalog;
pub use errors::Result;
pub use tenant::TenantScope;
