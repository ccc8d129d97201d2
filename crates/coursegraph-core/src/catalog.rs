//! Learning object duration lookup
//!
//! Leaves reference learning objects owned by another module. The snapshot
//! engine only needs each object's estimated duration, which is supplied
//! through the `LearningObjectCatalog` seam.

use std::collections::HashMap;

/// Source of estimated durations for learning objects
pub trait LearningObjectCatalog {
    /// Estimated duration in minutes, or `None` if the object is unknown
    fn estimated_duration_minutes(&self, learning_object_id: &str) -> Option<u64>;
}

/// Catalog that knows no durations; every snapshot totals zero minutes
///
/// # Example
/// ```
/// use coursegraph_core::catalog::{LearningObjectCatalog, NoDurationCatalog};
///
/// assert_eq!(NoDurationCatalog.estimated_duration_minutes("lo-1"), None);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDurationCatalog;

impl LearningObjectCatalog for NoDurationCatalog {
    fn estimated_duration_minutes(&self, _learning_object_id: &str) -> Option<u64> {
        None
    }
}

/// Catalog backed by a prefetched map
#[derive(Debug, Clone, Default)]
pub struct StaticDurationCatalog {
    durations: HashMap<String, u64>,
}

impl StaticDurationCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, learning_object_id: impl Into<String>, minutes: u64) {
        self.durations.insert(learning_object_id.into(), minutes);
    }

    pub fn len(&self) -> usize {
        self.durations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.durations.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, u64)> for StaticDurationCatalog {
    fn from_iter<I: IntoIterator<Item = (K, u64)>>(iter: I) -> Self {
        Self {
            durations: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl LearningObjectCatalog for StaticDurationCatalog {
    fn estimated_duration_minutes(&self, learning_object_id: &str) -> Option<u64> {
        self.durations.get(learning_object_id).copied()
    }
}
