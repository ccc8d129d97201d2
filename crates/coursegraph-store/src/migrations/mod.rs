//! Schema migrations
//!
//! SQL files under `migrations/` are embedded at compile time, applied in
//! order inside one transaction each, and recorded in `schema_version` with
//! their SHA-256 checksum.

mod checksums;
mod embedded;
mod runner;

pub use embedded::{get_migrations, Migration};
pub use runner::{applied_migrations, apply_migrations};
