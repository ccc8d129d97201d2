//! Coursegraph CLI
//!
//! Command-line interface for course content graphs and snapshots

use clap::{Parser, Subcommand};
use coursegraph_core::logging_facility::{init, Profile};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "coursegraph")]
#[command(about = "Course content graphs, learning order and snapshots", long_about = None)]
struct Cli {
    /// Log profile (dev, prod); logging is off when omitted
    #[arg(long, global = true)]
    log: Option<Profile>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    Migrate(commands::migrate::MigrateArgs),
    /// Course authoring and learning order
    Course(commands::course::CourseArgs),
    /// Snapshot creation and read-back
    Snapshot(commands::snapshot::SnapshotArgs),
}

fn main() {
    let cli = Cli::parse();
    if let Some(profile) = cli.log {
        init(profile);
    }

    let result = match cli.command {
        Commands::Migrate(args) => commands::migrate::execute(args),
        Commands::Course(args) => commands::course::execute(args),
        Commands::Snapshot(args) => commands::snapshot::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
