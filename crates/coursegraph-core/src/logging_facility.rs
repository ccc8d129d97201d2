//! Structured logging for course graph operations
//!
//! - `init(profile)` installs the process-wide subscriber once
//! - `log_op_start!` / `log_op_end!` / `log_op_error!` emit boundary events
//!   with the field names from `coursegraph_core_types::schema`
//! - `test_capture` records events in memory so tests can assert on them
//!
//! ```rust
//! use coursegraph_core::logging_facility::{init, Profile};
//!
//! init(Profile::Development);
//! ```

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
