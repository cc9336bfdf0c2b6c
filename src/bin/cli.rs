//! sqlens CLI: one-shot database inspection without the protocol.
//!
//! Usage:
//!   sqlens -d wiki.db tables           # list tables
//!   sqlens -d wiki.db schema pages     # column metadata
//!   sqlens -d wiki.db info             # size statistics
//!   sqlens -d wiki.db query "SELECT *" # run a SELECT

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};

use sqlens::config::DB_ENV_VAR;
use sqlens::db;

#[derive(Parser)]
#[command(name = "sqlens")]
#[command(about = "Read-only SQLite explorer", long_about = None)]
struct Cli {
    /// Database file (falls back to the SQLENS_DB environment variable)
    #[arg(short, long)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List table names, sorted alphabetically
    Tables,

    /// Show column metadata for a table
    Schema {
        /// Table name
        table: String,
    },

    /// Show page count, page size, approximate size, and table count
    Info,

    /// Run a SELECT statement and print the rows as JSON
    Query {
        /// The SELECT statement
        sql: String,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let database = cli.database.or_else(|| {
        std::env::var(DB_ENV_VAR)
            .ok()
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
    });
    let Some(database) = database else {
        bail!("no database given: pass --database or set {}", DB_ENV_VAR);
    };
    if !database.exists() {
        bail!("Database file not found: {}", database.display());
    }

    let conn = db::open_read_only(&database, None)?;

    match cli.command {
        Commands::Tables => {
            let tables = db::list_tables(&conn)?;
            println!("{}", serde_json::to_string_pretty(&tables)?);
        }

        Commands::Schema { table } => {
            let columns = db::table_schema(&conn, &table)?;
            println!("{}", serde_json::to_string_pretty(&columns)?);
        }

        Commands::Info => {
            let info = db::database_info(&conn)?;
            println!("{}", serde_json::to_string_pretty(&info)?);
        }

        Commands::Query { sql } => {
            let rows = db::run_query(&conn, &sql)?;
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
    }

    Ok(())
}
