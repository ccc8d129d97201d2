//! Engine-level commands that require I/O.

use coursegraph_core::{Command, CommandResult, GraphConfig, Snapshot};
use coursegraph_core_types::RequestContext;
use coursegraph_store::errors::Result;
use coursegraph_store::TenantScope;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::commands::authoring::apply_course_command;
use crate::commands::snapshot::{create_snapshot, SnapshotOptions};

/// Commands the engine runs against the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EngineCommand {
    /// Any authoring command, guarded by the course version the caller last read.
    Course {
        command: Command,
        expected_version: Option<u64>,
    },
    /// Freeze a course into a new snapshot.
    SnapshotCreate {
        course_id: String,
        #[serde(default)]
        options: SnapshotOptions,
    },
}

impl EngineCommand {
    /// Wrap a core command; `SnapshotCreate` is routed to the snapshot pipeline
    pub fn from_command(command: Command, expected_version: Option<u64>) -> Self {
        match command {
            Command::SnapshotCreate { course_id } => EngineCommand::SnapshotCreate {
                course_id,
                options: SnapshotOptions { expected_version },
            },
            command => EngineCommand::Course {
                command,
                expected_version,
            },
        }
    }
}

/// Result of applying an engine command.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "result", content = "data", rename_all = "snake_case")]
pub enum EngineCommandResult {
    Course(CommandResult),
    SnapshotCreated(Snapshot),
}

/// Apply an engine command inside its own transaction.
///
/// # Errors
///
/// Propagates the error of the underlying authoring or snapshot command.
pub fn apply_engine_command(
    cmd: EngineCommand,
    conn: &mut Connection,
    scope: &TenantScope,
    config: &GraphConfig,
    ctx: &RequestContext,
) -> Result<EngineCommandResult> {
    match cmd {
        EngineCommand::Course {
            command,
            expected_version,
        } => apply_course_command(conn, scope, config, ctx, command, expected_version)
            .map(EngineCommandResult::Course),
        EngineCommand::SnapshotCreate { course_id, options } => {
            create_snapshot(conn, scope, config, ctx, &course_id, options)
                .map(EngineCommandResult::SnapshotCreated)
        }
    }
}
