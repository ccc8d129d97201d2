//! Authoring commands against persisted courses
//!
//! ## Pipeline (in order):
//! 1. Open a `BEGIN IMMEDIATE` transaction
//! 2. Resolve the course the command edits (directly or through an item id)
//! 3. Reject snapshot ids and stale `expected_version`s (no writes)
//! 4. Hydrate the course, plus any other course a referenced item belongs to
//! 5. Apply the command in memory and validate the course graph
//! 6. Rewrite the course's rows and commit
//!
//! Any failure drops the transaction, so a rejected command leaves the
//! database untouched.

use std::time::Instant;

use coursegraph_core::errors::{ExError, ExErrorKind};
use coursegraph_core::rules::validate_course;
use coursegraph_core::{
    apply, Command, CommandResult, Course, GraphConfig, NoDurationCatalog, Store,
};
use coursegraph_core::{log_op_end, log_op_error, log_op_start};
use coursegraph_core_types::RequestContext;
use coursegraph_store::errors::{from_rusqlite, Result};
use coursegraph_store::repo::hydration::load_course_into;
use coursegraph_store::repo::SqliteRepo;
use coursegraph_store::TenantScope;
use rusqlite::{Connection, Transaction, TransactionBehavior};

use super::{check_version, course_of_item, guard_not_snapshot, with_request};

/// Apply one authoring command to a persisted course
///
/// `expected_version`, when given, must equal the course's current version
/// or the command fails with a concurrency error before anything is written.
/// `CourseCreate` ignores it. Depth and name limits come from `config`.
///
/// ## Errors
///
/// - `ExErrorKind::Concurrency`: version mismatch, or the database stayed locked
/// - `ExErrorKind::SnapshotImmutable`: an id names a snapshot entity
/// - `ExErrorKind::InvalidInput`: `SnapshotCreate` (use [`super::snapshot::create_snapshot`])
/// - any error kind the core operation or graph validation raises
pub fn apply_course_command(
    conn: &mut Connection,
    scope: &TenantScope,
    config: &GraphConfig,
    ctx: &RequestContext,
    cmd: Command,
    expected_version: Option<u64>,
) -> Result<CommandResult> {
    let op = cmd.op_name();
    let start = Instant::now();
    log_op_start!(
        op,
        request_id = ctx.request_id.as_str(),
        tenant_id = scope.tenant_id()
    );

    let result = run(conn, scope, config, cmd, expected_version);

    let duration_ms = start.elapsed().as_millis() as u64;
    match result {
        Ok((course_id, version, result)) => {
            log_op_end!(
                op,
                duration_ms = duration_ms,
                request_id = ctx.request_id.as_str(),
                course_id = course_id.as_str(),
                version = version
            );
            Ok(result)
        }
        Err(e) => {
            let e = with_request(e, ctx);
            log_op_error!(
                op,
                e.clone(),
                duration_ms = duration_ms,
                request_id = ctx.request_id.as_str()
            );
            Err(e)
        }
    }
}

fn run(
    conn: &mut Connection,
    scope: &TenantScope,
    config: &GraphConfig,
    cmd: Command,
    expected_version: Option<u64>,
) -> Result<(String, u64, CommandResult)> {
    if let Command::SnapshotCreate { .. } = cmd {
        return Err(ExError::new(ExErrorKind::InvalidInput)
            .with_op(cmd.op_name())
            .with_message("Snapshots are created through the snapshot command"));
    }

    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(from_rusqlite)?;

    if let Command::CourseCreate { course_id, title } = cmd {
        let course = create_course(&tx, scope, config, course_id, title)?;
        tx.commit().map_err(from_rusqlite)?;
        let created = CommandResult::CourseCreated {
            course_id: course.id.clone(),
        };
        return Ok((course.id, course.version, created));
    }

    let course_id = target_course(&tx, scope, &cmd)?;
    check_version(&tx, scope, &course_id, expected_version)?;

    let mut store = Store::with_config(config.clone());
    load_course_into(&tx, scope, &course_id, &mut store)?;
    for related in related_courses(&tx, scope, &cmd)? {
        if related != course_id && store.get_course(&related).is_err() {
            load_course_into(&tx, scope, &related, &mut store)?;
        }
    }

    let result = apply(&mut store, cmd, &NoDurationCatalog)?;
    validate_course(&store, &course_id)?;

    SqliteRepo::replace_course_graph(&tx, scope, &store, &course_id)?;
    tx.commit().map_err(from_rusqlite)?;

    let version = store.get_course(&course_id)?.version;
    Ok((course_id, version, result))
}

fn create_course(
    tx: &Transaction,
    scope: &TenantScope,
    config: &GraphConfig,
    course_id: String,
    title: String,
) -> Result<Course> {
    guard_not_snapshot(tx, scope, &course_id)?;

    let mut store = Store::with_config(config.clone());
    apply(
        &mut store,
        Command::CourseCreate {
            course_id: course_id.clone(),
            title,
        },
        &NoDurationCatalog,
    )?;
    let course = store.get_course(&course_id)?.clone();
    SqliteRepo::create_course(tx, scope, &course)?;
    Ok(course)
}

/// Course the command writes to
fn target_course(conn: &Connection, scope: &TenantScope, cmd: &Command) -> Result<String> {
    match cmd {
        Command::ItemCreate { course_id, .. }
        | Command::ChainSetStart { course_id, .. }
        | Command::ChainAutoGenerate { course_id }
        | Command::CourseCreate { course_id, .. }
        | Command::SnapshotCreate { course_id } => {
            guard_not_snapshot(conn, scope, course_id)?;
            Ok(course_id.clone())
        }
        Command::ItemMove { item_id, .. }
        | Command::ItemRename { item_id, .. }
        | Command::ItemReorder { item_id, .. }
        | Command::ItemDelete { item_id, .. }
        | Command::ChainDisconnect { item_id } => course_of_item(conn, scope, item_id),
        Command::ChainConnect { from_item_id, .. } => course_of_item(conn, scope, from_item_id),
    }
}

/// Courses of the other items a command names
///
/// They are loaded read-only so the core reports cross-course references as
/// such instead of as missing items.
fn related_courses(conn: &Connection, scope: &TenantScope, cmd: &Command) -> Result<Vec<String>> {
    let referenced = match cmd {
        Command::ItemCreate { parent_id, .. } => parent_id.as_deref(),
        Command::ItemMove { new_parent_id, .. } => new_parent_id.as_deref(),
        Command::ChainSetStart { item_id, .. } => item_id.as_deref(),
        Command::ChainConnect { to_item_id, .. } => Some(to_item_id.as_str()),
        _ => None,
    };

    let Some(item_id) = referenced else {
        return Ok(Vec::new());
    };
    guard_not_snapshot(conn, scope, item_id)?;
    Ok(SqliteRepo::item_course_id(conn, scope, item_id)?
        .into_iter()
        .collect())
}
