pub mod graph;
pub mod invariants;
pub mod validation;

pub use graph::{check_depth, walk_reaches};
pub use validation::validate_course;
