//! sqlens MCP server: read-only SQLite access for AI agents.
//!
//! Runs a JSON-RPC 2.0 server over STDIO exposing the query tools
//! through the Model Context Protocol (MCP).
//!
//! Usage:
//!   sqlens-mcp [database]
//!
//! The default database comes from the positional argument, the
//! SQLENS_DB environment variable, or the config file, in that order.
//! Calls may override it per request with a database_path argument.

use std::path::PathBuf;

use tracing::{error, info};

use sqlens::mcp::{server, standard_registry, ToolDefaults};
use sqlens::Config;

fn main() {
    // Tracing goes to stderr (stdout carries the protocol)
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Resolved once here; handlers never read ambient state.
    let mut config = Config::from_startup_env();
    if let Some(database) = std::env::args().nth(1) {
        config.database = Some(PathBuf::from(database));
    }

    match &config.database {
        Some(path) => info!(database = %path.display(), "default database configured"),
        None => info!("no default database, calls must supply database_path"),
    }

    let registry = standard_registry(ToolDefaults {
        database: config.database.clone(),
        query_timeout: config.query_timeout(),
    });

    info!("MCP server ready, waiting for JSON-RPC requests on stdin");

    // Blocks until stdin closes; only a transport failure is fatal.
    if let Err(e) = server::run(&registry) {
        error!(error = %e, "transport failure, exiting");
        std::process::exit(1);
    }
}
