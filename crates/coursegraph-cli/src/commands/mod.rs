pub mod course;
pub mod migrate;
pub mod snapshot;

use std::path::{Path, PathBuf};

use clap::Args;
use coursegraph_core::GraphConfig;
use coursegraph_store::{db, migrations, TenantScope};
use rusqlite::Connection;

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Database location and tenant shared by every data command
#[derive(Debug, Args)]
pub struct StoreArgs {
    #[arg(long, default_value = ".coursegraph/store.db")]
    pub db: String,

    #[arg(long)]
    pub tenant: String,

    /// TOML file with graph limits (max_depth, max_name_len)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl StoreArgs {
    /// Open the database, bringing its schema up to date, and build the
    /// tenant scope and graph limits
    pub fn open(
        &self,
    ) -> Result<(Connection, TenantScope, GraphConfig), Box<dyn std::error::Error>> {
        let config = match &self.config {
            Some(path) => GraphConfig::from_file(path)?,
            None => GraphConfig::default(),
        };
        let scope = TenantScope::new(self.tenant.as_str())?;
        let conn = open_db(&self.db)?;
        Ok((conn, scope, config))
    }
}

pub fn open_db(path: &str) -> Result<Connection, Box<dyn std::error::Error>> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let mut conn = db::open(path)?;
    migrations::apply_migrations(&mut conn)?;
    Ok(conn)
}
