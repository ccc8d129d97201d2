use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One link of a course's learning order
///
/// An edge without `from_item_id` is the start edge: it marks `to_item_id` as
/// the first item a learner visits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: String,
    pub course_id: String,
    pub from_item_id: Option<String>,
    pub to_item_id: String,
    pub created_at: DateTime<Utc>,
}

impl Edge {
    pub fn new(
        id: String,
        course_id: String,
        from_item_id: Option<String>,
        to_item_id: String,
    ) -> Self {
        Self {
            id,
            course_id,
            from_item_id,
            to_item_id,
            created_at: Utc::now(),
        }
    }

    pub fn is_start(&self) -> bool {
        self.from_item_id.is_none()
    }
}
