//! Command inventory for authoring and snapshot operations
//!
//! Every mutation of a course graph can be expressed as a `Command` and run
//! through [`crate::apply::apply`]. The engine crate builds on this to run
//! commands against persisted courses.

use serde::{Deserialize, Serialize};

use crate::model::{Edge, Item, ItemKind, Snapshot};

/// A single mutation of the course graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    /// Register a course
    CourseCreate { course_id: String, title: String },

    /// Create an item under an optional parent folder
    ItemCreate {
        course_id: String,
        name: String,
        parent_id: Option<String>,
        kind: ItemKind,
    },

    /// Reparent an item with its subtree (None = make root)
    ItemMove {
        item_id: String,
        new_parent_id: Option<String>,
    },

    ItemRename { item_id: String, name: String },

    ItemReorder { item_id: String, sort_order: i64 },

    /// Delete an item; `cascade` also deletes a folder's subtree
    ItemDelete { item_id: String, cascade: bool },

    /// Create or replace the start edge
    ChainSetStart {
        course_id: String,
        item_id: Option<String>,
    },

    ChainConnect {
        from_item_id: String,
        to_item_id: String,
    },

    /// Remove every edge touching an item
    ChainDisconnect { item_id: String },

    /// Rebuild the chain from the tree's leaf order
    ChainAutoGenerate { course_id: String },

    /// Freeze the course into a new snapshot
    SnapshotCreate { course_id: String },
}

impl Command {
    /// Stable operation name used in logs and errors
    pub fn op_name(&self) -> &'static str {
        match self {
            Command::CourseCreate { .. } => "course.create",
            Command::ItemCreate { .. } => "item.create",
            Command::ItemMove { .. } => "item.move",
            Command::ItemRename { .. } => "item.rename",
            Command::ItemReorder { .. } => "item.reorder",
            Command::ItemDelete { .. } => "item.delete",
            Command::ChainSetStart { .. } => "chain.set_start",
            Command::ChainConnect { .. } => "chain.connect",
            Command::ChainDisconnect { .. } => "chain.disconnect",
            Command::ChainAutoGenerate { .. } => "chain.auto_generate",
            Command::SnapshotCreate { .. } => "snapshot.create",
        }
    }
}

/// What a successfully applied command produced
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", content = "data", rename_all = "snake_case")]
pub enum CommandResult {
    CourseCreated { course_id: String },
    ItemCreated(Item),
    ItemUpdated(Item),
    ItemsDeleted { count: usize },
    EdgeCreated(Edge),
    EdgesRemoved { count: usize },
    ChainGenerated { edge_count: usize },
    SnapshotCreated(Snapshot),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_op_names_are_dotted() {
        let cmd = Command::ChainConnect {
            from_item_id: "a".to_string(),
            to_item_id: "b".to_string(),
        };
        assert_eq!(cmd.op_name(), "chain.connect");
    }

    #[test]
    fn test_command_json_shape() {
        let cmd = Command::ItemCreate {
            course_id: "c1".to_string(),
            name: "Lesson".to_string(),
            parent_id: None,
            kind: ItemKind::leaf("lo-1"),
        };
        let json = serde_json::to_value(&cmd).unwrap();
        assert_eq!(json["type"], "item_create");
        assert_eq!(json["kind"]["kind"], "leaf");

        let back: Command = serde_json::from_value(json).unwrap();
        assert_eq!(back, cmd);
    }
}
