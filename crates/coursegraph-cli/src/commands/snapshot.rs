//! Snapshot commands

use clap::{Args, Subcommand};
use coursegraph_core::Command;
use coursegraph_core_types::RequestContext;
use coursegraph_engine::{
    apply_engine_command, apply_engine_query, EngineCommand, EngineCommandResult, EngineQuery,
    EngineQueryResult,
};

use super::{CliResult, StoreArgs};

#[derive(Debug, Args)]
pub struct SnapshotArgs {
    #[command(subcommand)]
    pub command: SnapshotCommand,
}

#[derive(Debug, Subcommand)]
pub enum SnapshotCommand {
    /// Freeze a course into a new snapshot
    Create(CreateArgs),
    /// Print a snapshot's learning order
    Sequence(SequenceArgs),
    /// List the snapshots taken from a course
    List(ListArgs),
}

#[derive(Debug, Args)]
pub struct CreateArgs {
    #[arg(long)]
    pub course: String,

    /// Fail unless the course is still at this version
    #[arg(long)]
    pub expected_version: Option<u64>,

    #[command(flatten)]
    pub store: StoreArgs,
}

#[derive(Debug, Args)]
pub struct SequenceArgs {
    #[arg(long)]
    pub snapshot: String,

    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub store: StoreArgs,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    #[arg(long)]
    pub course: String,

    #[command(flatten)]
    pub store: StoreArgs,
}

pub fn execute(args: SnapshotArgs) -> CliResult {
    match args.command {
        SnapshotCommand::Create(args) => execute_create(args),
        SnapshotCommand::Sequence(args) => execute_sequence(args),
        SnapshotCommand::List(args) => execute_list(args),
    }
}

fn execute_create(args: CreateArgs) -> CliResult {
    let (mut conn, scope, config) = args.store.open()?;
    let cmd = EngineCommand::from_command(
        Command::SnapshotCreate {
            course_id: args.course,
        },
        args.expected_version,
    );

    if let EngineCommandResult::SnapshotCreated(snapshot) =
        apply_engine_command(cmd, &mut conn, &scope, &config, &RequestContext::new())?
    {
        println!("Snapshot created:");
        println!("  snapshot_id: {}", snapshot.id);
        println!("  source_version: {}", snapshot.source_version);
        println!("  item_count: {}", snapshot.item_count);
        println!(
            "  estimated_duration_minutes: {}",
            snapshot.estimated_duration_minutes
        );
    }
    Ok(())
}

fn execute_sequence(args: SequenceArgs) -> CliResult {
    let (conn, scope, config) = args.store.open()?;
    let query = EngineQuery::SnapshotSequence {
        snapshot_id: args.snapshot,
    };
    let result = apply_engine_query(query, &conn, &scope, &config)?;
    if let EngineQueryResult::SnapshotItems(items) = result {
        if args.json {
            println!("{}", serde_json::to_string_pretty(&items)?);
        } else {
            for (position, item) in items.iter().enumerate() {
                println!("{}\t{}\t{}", position + 1, item.id, item.name);
            }
        }
    }
    Ok(())
}

fn execute_list(args: ListArgs) -> CliResult {
    let (conn, scope, config) = args.store.open()?;
    let query = EngineQuery::SnapshotList {
        course_id: args.course,
    };
    let result = apply_engine_query(query, &conn, &scope, &config)?;
    if let EngineQueryResult::Snapshots(snapshots) = result {
        for snapshot in snapshots {
            println!(
                "{}\tv{}\t{} items\t{}",
                snapshot.id,
                snapshot.source_version,
                snapshot.item_count,
                snapshot.created_at.to_rfc3339()
            );
        }
    }
    Ok(())
}
