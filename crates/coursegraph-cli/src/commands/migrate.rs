//! Schema migration command

use clap::Args;
use coursegraph_store::migrations::applied_migrations;

use super::{open_db, CliResult};

#[derive(Debug, Args)]
pub struct MigrateArgs {
    #[arg(long, default_value = ".coursegraph/store.db")]
    pub db: String,
}

pub fn execute(args: MigrateArgs) -> CliResult {
    let conn = open_db(&args.db)?;
    for (migration_id, checksum) in applied_migrations(&conn)? {
        println!("{}\t{}", migration_id, checksum);
    }
    Ok(())
}
