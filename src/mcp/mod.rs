//! MCP (Model Context Protocol) server module.
//!
//! JSON-RPC 2.0 over STDIO exposing the database tools to AI agents.

pub mod registry;
pub mod server;
pub mod tools;
pub mod types;

pub use registry::{ToolDefaults, ToolHandler, ToolRegistry, ValidatedArgs};
pub use tools::standard_registry;
pub use types::{ToolDefinition, ToolsCallResult};
