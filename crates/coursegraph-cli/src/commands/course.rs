//! Course authoring and learning order commands

use clap::{Args, Subcommand};
use coursegraph_core::{Command, CommandResult, ItemKind};
use coursegraph_core_types::RequestContext;
use coursegraph_engine::{
    apply_course_command, apply_engine_query, EngineQuery, EngineQueryResult,
};

use super::{CliResult, StoreArgs};

#[derive(Debug, Args)]
pub struct CourseArgs {
    #[command(subcommand)]
    pub command: CourseCommand,
}

#[derive(Debug, Subcommand)]
pub enum CourseCommand {
    /// Register a course
    Create(CreateArgs),
    /// Add a folder, or a leaf when --learning-object is given
    AddItem(AddItemArgs),
    /// Rebuild the learning order from the content tree
    AutoOrder(CourseRef),
    /// Print the live learning order
    Sequence(SequenceArgs),
    /// Print how many leaves the learning order covers
    Status(CourseRef),
}

#[derive(Debug, Args)]
pub struct CreateArgs {
    #[arg(long)]
    pub course: String,

    #[arg(long)]
    pub title: String,

    #[command(flatten)]
    pub store: StoreArgs,
}

#[derive(Debug, Args)]
pub struct AddItemArgs {
    #[arg(long)]
    pub course: String,

    #[arg(long)]
    pub name: String,

    /// Parent folder id; the item becomes a root item when omitted
    #[arg(long)]
    pub parent: Option<String>,

    #[arg(long)]
    pub learning_object: Option<String>,

    #[arg(long)]
    pub expected_version: Option<u64>,

    #[command(flatten)]
    pub store: StoreArgs,
}

#[derive(Debug, Args)]
pub struct CourseRef {
    #[arg(long)]
    pub course: String,

    #[arg(long)]
    pub expected_version: Option<u64>,

    #[command(flatten)]
    pub store: StoreArgs,
}

#[derive(Debug, Args)]
pub struct SequenceArgs {
    #[arg(long)]
    pub course: String,

    /// Print items as a JSON array
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub store: StoreArgs,
}

pub fn execute(args: CourseArgs) -> CliResult {
    match args.command {
        CourseCommand::Create(args) => execute_create(args),
        CourseCommand::AddItem(args) => execute_add_item(args),
        CourseCommand::AutoOrder(args) => execute_auto_order(args),
        CourseCommand::Sequence(args) => execute_sequence(args),
        CourseCommand::Status(args) => execute_status(args),
    }
}

fn execute_create(args: CreateArgs) -> CliResult {
    let (mut conn, scope, config) = args.store.open()?;
    let cmd = Command::CourseCreate {
        course_id: args.course,
        title: args.title,
    };
    let ctx = RequestContext::new();
    if let CommandResult::CourseCreated { course_id } =
        apply_course_command(&mut conn, &scope, &config, &ctx, cmd, None)?
    {
        println!("{}", course_id);
    }
    Ok(())
}

fn execute_add_item(args: AddItemArgs) -> CliResult {
    let (mut conn, scope, config) = args.store.open()?;
    let kind = match args.learning_object {
        Some(lo) => ItemKind::leaf(lo),
        None => ItemKind::Folder,
    };
    let cmd = Command::ItemCreate {
        course_id: args.course,
        name: args.name,
        parent_id: args.parent,
        kind,
    };
    let ctx = RequestContext::new();
    if let CommandResult::ItemCreated(item) =
        apply_course_command(&mut conn, &scope, &config, &ctx, cmd, args.expected_version)?
    {
        println!("{}", item.id);
    }
    Ok(())
}

fn execute_auto_order(args: CourseRef) -> CliResult {
    let (mut conn, scope, config) = args.store.open()?;
    let cmd = Command::ChainAutoGenerate {
        course_id: args.course,
    };
    let ctx = RequestContext::new();
    if let CommandResult::ChainGenerated { edge_count } =
        apply_course_command(&mut conn, &scope, &config, &ctx, cmd, args.expected_version)?
    {
        println!("Learning order rebuilt: {} edges", edge_count);
    }
    Ok(())
}

fn execute_sequence(args: SequenceArgs) -> CliResult {
    let (conn, scope, config) = args.store.open()?;
    let query = EngineQuery::CourseSequence {
        course_id: args.course,
    };
    let result = apply_engine_query(query, &conn, &scope, &config)?;
    if let EngineQueryResult::Items(items) = result {
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

fn execute_status(args: CourseRef) -> CliResult {
    let (conn, scope, config) = args.store.open()?;
    let query = EngineQuery::ChainStatus {
        course_id: args.course,
    };
    let result = apply_engine_query(query, &conn, &scope, &config)?;
    if let EngineQueryResult::ChainStatus(status) = result {
        println!("sequence_len: {}", status.sequence_len);
        println!("leaf_count: {}", status.leaf_count);
        println!("complete: {}", status.is_complete);
    }
    Ok(())
}
