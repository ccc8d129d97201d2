use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What an item is: an organizational folder or a leaf pointing at learning material
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemKind {
    Folder,
    Leaf { learning_object_id: String },
}

impl ItemKind {
    pub fn leaf(learning_object_id: impl Into<String>) -> Self {
        ItemKind::Leaf {
            learning_object_id: learning_object_id.into(),
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, ItemKind::Folder)
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, ItemKind::Leaf { .. })
    }

    pub fn learning_object_id(&self) -> Option<&str> {
        match self {
            ItemKind::Folder => None,
            ItemKind::Leaf { learning_object_id } => Some(learning_object_id),
        }
    }

    /// Stable storage label
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Folder => "folder",
            ItemKind::Leaf { .. } => "leaf",
        }
    }
}

/// A node of a course's content tree
///
/// Children are not stored on the item. The store keeps a parent → children
/// index, so the tree holds no reference cycles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Unique identifier (UUID v7)
    pub id: String,

    /// Owning course
    pub course_id: String,

    pub name: String,

    pub kind: ItemKind,

    /// Parent folder (None for root items)
    pub parent_id: Option<String>,

    /// 0 for roots, parent depth + 1 otherwise
    pub depth: u32,

    /// Position among siblings (ascending)
    pub sort_order: i64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Item {
    /// Create a root item with depth 0 and sort order 0
    pub fn new(id: String, course_id: String, name: String, kind: ItemKind) -> Self {
        let now = Utc::now();
        Self {
            id,
            course_id,
            name,
            kind,
            parent_id: None,
            depth: 0,
            sort_order: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    pub fn is_folder(&self) -> bool {
        self.kind.is_folder()
    }

    pub fn is_leaf(&self) -> bool {
        self.kind.is_leaf()
    }
}
