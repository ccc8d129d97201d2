use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Course registration as seen by the content graph
///
/// Courses themselves are owned by the surrounding platform. The graph only
/// needs to know which courses exist and how many structural edits each has
/// seen, so that callers can detect concurrent edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub title: String,

    /// Incremented by every successful structural mutation of this course
    pub version: u64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Course {
    pub fn new(id: String, title: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            title,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Record a structural mutation
    pub(crate) fn bump_version(&mut self) {
        self.version += 1;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bump_version() {
        let mut course = Course::new("c1".to_string(), "Rust 101".to_string());
        assert_eq!(course.version, 0);
        course.bump_version();
        course.bump_version();
        assert_eq!(course.version, 2);
    }
}
