//! Types shared by the coursegraph error and logging facilities
//!
//! - **Correlation**: `RequestId`, `TraceId`, `RequestContext`
//! - **Schema**: canonical structured-logging field keys and event names

pub mod correlation;
pub mod schema;

pub use correlation::{RequestContext, RequestId, TraceId};
