//! Tool registry and dispatch.
//!
//! The catalog is fixed at process start. Each operation implements
//! [`ToolHandler`]: validation runs before any storage access, and every
//! failure either stage produces is converted here into an error result,
//! so nothing propagates up to the transport loop.

use std::path::PathBuf;
use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use super::types::{ToolDefinition, ToolsCallResult};
use crate::error::{LensError, Result};

/// Defaults resolved once at startup and shared by every handler.
#[derive(Debug, Clone, Default)]
pub struct ToolDefaults {
    /// Database used when a call carries no `database_path` argument.
    pub database: Option<PathBuf>,
    /// Per-statement execution deadline, if any.
    pub query_timeout: Option<Duration>,
}

/// One call's arguments after validation: the resolved, existence-checked
/// database target plus whichever tool-specific strings apply.
#[derive(Debug, Clone)]
pub struct ValidatedArgs {
    pub database: PathBuf,
    pub query: Option<String>,
    pub table_name: Option<String>,
}

/// The capability contract every operation implements.
pub trait ToolHandler {
    /// Unique catalog key.
    fn name(&self) -> &'static str;

    /// Static catalog entry: name, description, input contract.
    fn definition(&self) -> ToolDefinition;

    /// Check required arguments and resolve the database target.
    fn validate(&self, arguments: &Value) -> Result<ValidatedArgs>;

    /// Execute against the store and assemble the result payload.
    fn run(&self, args: &ValidatedArgs) -> Result<Value>;
}

/// Static catalog of operations plus the dispatch path.
pub struct ToolRegistry {
    tools: Vec<Box<dyn ToolHandler>>,
}

impl ToolRegistry {
    pub fn new(tools: Vec<Box<dyn ToolHandler>>) -> Self {
        Self { tools }
    }

    /// The full catalog in registration order, for discovery.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|tool| tool.definition()).collect()
    }

    fn lookup(&self, name: &str) -> Option<&dyn ToolHandler> {
        self.tools
            .iter()
            .map(|tool| tool.as_ref())
            .find(|tool| tool.name() == name)
    }

    /// Validate and run one call.
    ///
    /// An unknown name returns an error result without touching storage;
    /// so does any validation failure. Handler errors come back as error
    /// results carrying the error's display string.
    pub fn dispatch(&self, name: &str, arguments: &Value) -> ToolsCallResult {
        let Some(handler) = self.lookup(name) else {
            return ToolsCallResult::error(LensError::UnknownTool(name.to_string()).to_string());
        };

        debug!(tool = name, "dispatching call");
        let outcome = handler
            .validate(arguments)
            .and_then(|args| handler.run(&args));

        match outcome {
            Ok(payload) => ToolsCallResult::json(&payload),
            Err(e) => ToolsCallResult::error(e.to_string()),
        }
    }
}
