//! The four operations the server exposes, as registry handlers.
//!
//! Each handler validates its arguments and resolves the database target
//! before any storage access, then opens a per-call read-only connection,
//! executes, and assembles the payload the caller sees.

use std::path::PathBuf;

use serde_json::{json, Value};

use super::registry::{ToolDefaults, ToolHandler, ToolRegistry, ValidatedArgs};
use super::types::ToolDefinition;
use crate::db;
use crate::error::{LensError, Result};

/// Build the full catalog with the given startup defaults.
pub fn standard_registry(defaults: ToolDefaults) -> ToolRegistry {
    ToolRegistry::new(vec![
        Box::new(ExecuteQuery {
            defaults: defaults.clone(),
        }),
        Box::new(GetTables {
            defaults: defaults.clone(),
        }),
        Box::new(GetTableSchema {
            defaults: defaults.clone(),
        }),
        Box::new(GetDatabaseInfo { defaults }),
    ])
}

// ─── Shared validation helpers ──────────────────────────────────

/// Resolve the call's database target: explicit argument wins over the
/// configured default, and the file must exist before anything opens it.
fn resolve_database(arguments: &Value, defaults: &ToolDefaults) -> Result<PathBuf> {
    let explicit = match arguments.get("database_path") {
        None | Some(Value::Null) => None,
        Some(Value::String(path)) => Some(PathBuf::from(path)),
        Some(_) => return Err(LensError::InvalidParameter("database_path")),
    };

    let path = explicit
        .or_else(|| defaults.database.clone())
        .ok_or(LensError::NoDatabase)?;

    if !path.exists() {
        return Err(LensError::DatabaseNotFound(path));
    }
    Ok(path)
}

/// Extract a required string argument.
fn required_string(arguments: &Value, name: &'static str) -> Result<String> {
    match arguments.get(name) {
        None | Some(Value::Null) => Err(LensError::MissingParameter(name)),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(LensError::InvalidParameter(name)),
    }
}

/// Schema fragment shared by every tool's `database_path` argument.
fn database_path_property() -> Value {
    json!({
        "type": "string",
        "description": "Path to the SQLite database file. Defaults to the configured database."
    })
}

// ─── execute_query ──────────────────────────────────────────────

struct ExecuteQuery {
    defaults: ToolDefaults,
}

impl ToolHandler for ExecuteQuery {
    fn name(&self) -> &'static str {
        "execute_query"
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: "Run a read-only SELECT query against the database and return \
                every matching row. Any other statement class is rejected."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "SELECT statement to execute"
                    },
                    "database_path": database_path_property(),
                },
                "required": ["query"]
            }),
        }
    }

    fn validate(&self, arguments: &Value) -> Result<ValidatedArgs> {
        let query = required_string(arguments, "query")?;
        let database = resolve_database(arguments, &self.defaults)?;
        Ok(ValidatedArgs {
            database,
            query: Some(query),
            table_name: None,
        })
    }

    fn run(&self, args: &ValidatedArgs) -> Result<Value> {
        let query = args
            .query
            .as_deref()
            .ok_or(LensError::MissingParameter("query"))?;
        let conn = db::open_read_only(&args.database, self.defaults.query_timeout)?;
        let results = db::run_query(&conn, query)?;
        let count = results.len();
        Ok(json!({
            "success": true,
            "query": query,
            "results": results,
            "count": count,
        }))
    }
}

// ─── get_tables ─────────────────────────────────────────────────

struct GetTables {
    defaults: ToolDefaults,
}

impl ToolHandler for GetTables {
    fn name(&self) -> &'static str {
        "get_tables"
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: "List all table names in the database, sorted alphabetically."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "database_path": database_path_property(),
                }
            }),
        }
    }

    fn validate(&self, arguments: &Value) -> Result<ValidatedArgs> {
        let database = resolve_database(arguments, &self.defaults)?;
        Ok(ValidatedArgs {
            database,
            query: None,
            table_name: None,
        })
    }

    fn run(&self, args: &ValidatedArgs) -> Result<Value> {
        let conn = db::open_read_only(&args.database, self.defaults.query_timeout)?;
        let tables = db::list_tables(&conn)?;
        let count = tables.len();
        Ok(json!({
            "success": true,
            "tables": tables,
            "count": count,
        }))
    }
}

// ─── get_table_schema ───────────────────────────────────────────

struct GetTableSchema {
    defaults: ToolDefaults,
}

impl ToolHandler for GetTableSchema {
    fn name(&self) -> &'static str {
        "get_table_schema"
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: "Describe the columns of a table: name, declared type, \
                nullability, default value, and primary-key position."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "table_name": {
                        "type": "string",
                        "description": "Name of the table to describe"
                    },
                    "database_path": database_path_property(),
                },
                "required": ["table_name"]
            }),
        }
    }

    fn validate(&self, arguments: &Value) -> Result<ValidatedArgs> {
        let table_name = required_string(arguments, "table_name")?;
        let database = resolve_database(arguments, &self.defaults)?;
        Ok(ValidatedArgs {
            database,
            query: None,
            table_name: Some(table_name),
        })
    }

    fn run(&self, args: &ValidatedArgs) -> Result<Value> {
        let table_name = args
            .table_name
            .as_deref()
            .ok_or(LensError::MissingParameter("table_name"))?;
        let conn = db::open_read_only(&args.database, self.defaults.query_timeout)?;
        // An absent table yields an empty column list, not an error.
        let columns = db::table_schema(&conn, table_name)?;
        let count = columns.len();
        Ok(json!({
            "success": true,
            "table_name": table_name,
            "columns": columns,
            "count": count,
        }))
    }
}

// ─── get_database_info ──────────────────────────────────────────

struct GetDatabaseInfo {
    defaults: ToolDefaults,
}

impl ToolHandler for GetDatabaseInfo {
    fn name(&self) -> &'static str {
        "get_database_info"
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: "Report database statistics: page count, page size, \
                approximate file size in MB, and number of tables."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "database_path": database_path_property(),
                }
            }),
        }
    }

    fn validate(&self, arguments: &Value) -> Result<ValidatedArgs> {
        let database = resolve_database(arguments, &self.defaults)?;
        Ok(ValidatedArgs {
            database,
            query: None,
            table_name: None,
        })
    }

    fn run(&self, args: &ValidatedArgs) -> Result<Value> {
        let conn = db::open_read_only(&args.database, self.defaults.query_timeout)?;
        let info = db::database_info(&conn)?;
        Ok(json!({
            "success": true,
            "database_path": args.database,
            "page_count": info.page_count,
            "page_size": info.page_size,
            "approximate_size_mb": info.approximate_size_mb,
            "table_count": info.table_count,
        }))
    }
}
