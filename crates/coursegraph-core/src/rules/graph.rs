//! Graph checks shared by the content tree and the learning order chain
//!
//! Both structures are "follow one pointer" graphs: an item has at most one
//! parent and at most one successor. Cycle checks on either reduce to asking
//! whether walking that pointer from one node reaches another.

use std::collections::HashSet;

use crate::errors::{CourseGraphError, Result};

/// Walk a single-successor graph from `start` and report whether `target` is reached
///
/// `start` itself counts as visited. The walk stops at the first node without
/// a successor or at the first revisited node, so a corrupted graph that
/// already contains a loop cannot hang the caller.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use coursegraph_core::rules::walk_reaches;
///
/// let next: HashMap<&str, &str> = [("a", "b"), ("b", "c")].into_iter().collect();
/// assert!(walk_reaches("a", "c", |id| next.get(id).copied()));
/// assert!(!walk_reaches("c", "a", |id| next.get(id).copied()));
/// ```
pub fn walk_reaches<'a, F>(start: &'a str, target: &str, mut next: F) -> bool
where
    F: FnMut(&'a str) -> Option<&'a str>,
{
    let mut visited = HashSet::new();
    let mut current = Some(start);

    while let Some(id) = current {
        if id == target {
            return true;
        }
        if !visited.insert(id) {
            return false;
        }
        current = next(id);
    }

    false
}

/// Reject a depth beyond the configured maximum
///
/// # Errors
///
/// Returns `MaxDepthExceeded` if `depth > max_depth`.
pub fn check_depth(depth: u32, max_depth: u32) -> Result<()> {
    if depth > max_depth {
        return Err(CourseGraphError::MaxDepthExceeded { depth, max_depth });
    }
    Ok(())
}
