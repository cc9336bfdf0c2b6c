//! Wire types: JSON-RPC 2.0 envelopes and the MCP tool surface.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON-RPC error code for unparseable input.
pub const PARSE_ERROR: i64 = -32700;
/// JSON-RPC error code for a method the server does not implement.
pub const METHOD_NOT_FOUND: i64 = -32601;
/// JSON-RPC error code for malformed params.
pub const INVALID_PARAMS: i64 = -32602;
/// JSON-RPC error code for server-side failures.
pub const INTERNAL_ERROR: i64 = -32603;

/// Protocol revision answered during initialize.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

// ─── JSON-RPC 2.0 ───────────────────────────────────────────────

/// One incoming request or notification.
#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    /// Absent for notifications; echoed back otherwise.
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

/// One outgoing response.
#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

/// The JSON-RPC error member.
#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
}

impl JsonRpcResponse {
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(id: Option<Value>, code: i64, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
            }),
        }
    }
}

// ─── MCP surface ────────────────────────────────────────────────

/// initialize result.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    pub protocol_version: &'static str,
    pub capabilities: ServerCapabilities,
    pub server_info: ServerInfo,
}

/// Capabilities advertised during initialize; this server only has tools.
#[derive(Debug, Serialize)]
pub struct ServerCapabilities {
    pub tools: ToolCapability,
}

/// Marker object signalling tool support.
#[derive(Debug, Serialize)]
pub struct ToolCapability {}

/// Server identity.
#[derive(Debug, Serialize)]
pub struct ServerInfo {
    pub name: &'static str,
    pub version: &'static str,
}

impl InitializeResult {
    pub fn current() -> Self {
        Self {
            protocol_version: PROTOCOL_VERSION,
            capabilities: ServerCapabilities {
                tools: ToolCapability {},
            },
            server_info: ServerInfo {
                name: "sqlens",
                version: env!("CARGO_PKG_VERSION"),
            },
        }
    }
}

/// One entry of the tools/list catalog.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

/// tools/list result.
#[derive(Debug, Serialize)]
pub struct ToolsListResult {
    pub tools: Vec<ToolDefinition>,
}

/// tools/call params.
#[derive(Debug, Deserialize)]
pub struct ToolsCallParams {
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

/// One content block of a tool result.
#[derive(Debug, Serialize)]
pub struct ToolResultContent {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub text: String,
}

/// tools/call result envelope: content blocks plus the error flag.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolsCallResult {
    pub content: Vec<ToolResultContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

impl ToolsCallResult {
    /// A successful result carrying one text block.
    pub fn text(text: String) -> Self {
        Self {
            content: vec![ToolResultContent { kind: "text", text }],
            is_error: None,
        }
    }

    /// A successful result whose text block is the payload as pretty JSON.
    pub fn json<T: Serialize>(payload: &T) -> Self {
        match serde_json::to_string_pretty(payload) {
            Ok(text) => Self::text(text),
            Err(e) => Self::error(format!("Failed to serialize result: {}", e)),
        }
    }

    /// An error result; the message becomes the single text block.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: vec![ToolResultContent {
                kind: "text",
                text: message.into(),
            }],
            is_error: Some(true),
        }
    }

    /// Whether this result carries the error flag.
    pub fn is_error(&self) -> bool {
        self.is_error == Some(true)
    }
}
