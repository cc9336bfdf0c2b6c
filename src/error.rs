//! Error types for sqlens.
//!
//! Every failure a tool call can hit is recoverable and surfaces to the
//! caller as a structured error result. Only transport I/O failures are
//! fatal, and those stay `std::io::Error` in the server loop.

use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, LensError>;

/// All recoverable failures of a single tool call.
#[derive(Debug, Error)]
pub enum LensError {
    /// A required argument was absent from the call.
    #[error("{0} parameter is required")]
    MissingParameter(&'static str),

    /// An argument was present but had the wrong type.
    #[error("{0} parameter must be a string")]
    InvalidParameter(&'static str),

    /// The resolved database file does not exist.
    #[error("Database file not found: {}", .0.display())]
    DatabaseNotFound(PathBuf),

    /// No database_path argument and no configured default.
    #[error("database_path parameter is required (no default database configured)")]
    NoDatabase,

    /// The statement is not a permitted read statement.
    #[error("Only SELECT queries are allowed, got: {0}")]
    QueryNotAllowed(String),

    /// The requested tool name is not in the registry.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// SQLite raised an error during execution.
    #[error("SQLite error: {0}")]
    Engine(#[from] rusqlite::Error),
}
