//! Single entry point for running commands against a store
//!
//! ## Atomicity
//!
//! Every operation validates its input against the current graph before
//! writing, so a command that returns `Err` has left the store untouched.
//! Commands that succeed bump the affected course's version (snapshot
//! creation leaves it as is).
//!
//! ## Example
//!
//! ```
//! use coursegraph_core::{apply, Command, CommandResult, NoDurationCatalog, Store};
//!
//! let mut store = Store::new();
//! let cmd = Command::CourseCreate {
//!     course_id: "c1".to_string(),
//!     title: "Rust 101".to_string(),
//! };
//!
//! let result = apply(&mut store, cmd, &NoDurationCatalog).unwrap();
//! assert!(matches!(result, CommandResult::CourseCreated { .. }));
//! ```

use std::time::Instant;

use crate::catalog::LearningObjectCatalog;
use crate::commands::{Command, CommandResult};
use crate::errors::Result;
use crate::ops::{chain_ops, snapshot_ops, tree_ops, Store};
use crate::{log_op_end, log_op_error, log_op_start};

/// Apply a command to a store
///
/// Emits start/end (or end_error) log events named after the command.
///
/// # Errors
///
/// Returns the domain error of the underlying operation. See
/// `CourseGraphError` for the full taxonomy.
pub fn apply(
    state: &mut Store,
    cmd: Command,
    catalog: &dyn LearningObjectCatalog,
) -> Result<CommandResult> {
    let op = cmd.op_name();
    let started = Instant::now();
    log_op_start!(op);

    let result = dispatch(state, cmd, catalog);

    let duration_ms = started.elapsed().as_millis() as u64;
    match &result {
        Ok(_) => {
            log_op_end!(op, duration_ms = duration_ms);
        }
        Err(err) => {
            log_op_error!(op, err.clone(), duration_ms = duration_ms);
        }
    }
    result
}

fn dispatch(
    state: &mut Store,
    cmd: Command,
    catalog: &dyn LearningObjectCatalog,
) -> Result<CommandResult> {
    match cmd {
        Command::CourseCreate { course_id, title } => {
            let course = tree_ops::create_course(state, course_id, title)?;
            Ok(CommandResult::CourseCreated {
                course_id: course.id,
            })
        }

        Command::ItemCreate {
            course_id,
            name,
            parent_id,
            kind,
        } => tree_ops::create_item(state, &course_id, name, parent_id.as_deref(), kind)
            .map(CommandResult::ItemCreated),

        Command::ItemMove {
            item_id,
            new_parent_id,
        } => tree_ops::move_item(state, &item_id, new_parent_id.as_deref())
            .map(CommandResult::ItemUpdated),

        Command::ItemRename { item_id, name } => {
            tree_ops::rename_item(state, &item_id, name).map(CommandResult::ItemUpdated)
        }

        Command::ItemReorder {
            item_id,
            sort_order,
        } => tree_ops::reorder_item(state, &item_id, sort_order).map(CommandResult::ItemUpdated),

        Command::ItemDelete { item_id, cascade } => {
            let count = if cascade {
                tree_ops::delete_item_cascade(state, &item_id)?
            } else {
                tree_ops::delete_item(state, &item_id)?;
                1
            };
            Ok(CommandResult::ItemsDeleted { count })
        }

        Command::ChainSetStart { course_id, item_id } => {
            chain_ops::set_start(state, &course_id, item_id.as_deref())
                .map(CommandResult::EdgeCreated)
        }

        Command::ChainConnect {
            from_item_id,
            to_item_id,
        } => chain_ops::connect(state, &from_item_id, &to_item_id).map(CommandResult::EdgeCreated),

        Command::ChainDisconnect { item_id } => {
            let count = chain_ops::disconnect(state, &item_id)?;
            Ok(CommandResult::EdgesRemoved { count })
        }

        Command::ChainAutoGenerate { course_id } => {
            let edge_count = chain_ops::auto_generate(state, &course_id)?;
            Ok(CommandResult::ChainGenerated { edge_count })
        }

        Command::SnapshotCreate { course_id } => {
            snapshot_ops::create_snapshot(state, &course_id, catalog)
                .map(CommandResult::SnapshotCreated)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::NoDurationCatalog;
    use crate::errors::CourseGraphError;
    use crate::model::ItemKind;

    fn run(store: &mut Store, cmd: Command) -> Result<CommandResult> {
        apply(store, cmd, &NoDurationCatalog)
    }

    #[test]
    fn test_apply_builds_chain() {
        let mut store = Store::new();
        run(
            &mut store,
            Command::CourseCreate {
                course_id: "c1".into(),
                title: "Course".into(),
            },
        )
        .unwrap();
        for name in ["A", "B"] {
            run(
                &mut store,
                Command::ItemCreate {
                    course_id: "c1".into(),
                    name: name.into(),
                    parent_id: None,
                    kind: ItemKind::leaf("lo"),
                },
            )
            .unwrap();
        }

        let result = run(
            &mut store,
            Command::ChainAutoGenerate {
                course_id: "c1".into(),
            },
        )
        .unwrap();
        assert_eq!(result, CommandResult::ChainGenerated { edge_count: 2 });
    }

    #[test]
    fn test_apply_error_leaves_version() {
        let mut store = Store::new();
        run(
            &mut store,
            Command::CourseCreate {
                course_id: "c1".into(),
                title: "Course".into(),
            },
        )
        .unwrap();
        let before = store.get_course("c1").unwrap().version;

        let result = run(
            &mut store,
            Command::ItemDelete {
                item_id: "ghost".into(),
                cascade: false,
            },
        );
        assert!(matches!(result, Err(CourseGraphError::ItemNotFound { .. })));
        assert_eq!(store.get_course("c1").unwrap().version, before);
    }
}
