//! JSON-RPC 2.0 server loop over newline-delimited STDIO.
//!
//! One request is read, dispatched, and answered before the next is
//! read; there are no overlapping in-flight calls. Tracing goes to
//! stderr so it never touches the protocol stream. The only fatal
//! condition is failing to use the transport itself: a read or write
//! error ends the loop with `Err`, and the binary exits non-zero.

use std::io::{self, BufRead, Write};

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::registry::ToolRegistry;
use super::types::{
    InitializeResult, JsonRpcRequest, JsonRpcResponse, ToolsCallParams, ToolsListResult,
    INTERNAL_ERROR, INVALID_PARAMS, METHOD_NOT_FOUND, PARSE_ERROR,
};

/// Run the server loop on the process's standard streams until EOF.
pub fn run(registry: &ToolRegistry) -> io::Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    serve(registry, stdin.lock(), stdout.lock())
}

/// The loop itself, parameterized over the streams so tests can drive it
/// with in-memory buffers.
pub fn serve<R: BufRead, W: Write>(
    registry: &ToolRegistry,
    reader: R,
    mut writer: W,
) -> io::Result<()> {
    info!("server loop started");

    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        debug!(request = %trimmed, "received request");

        let request: JsonRpcRequest = match serde_json::from_str(trimmed) {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, "unparseable request line");
                let response =
                    JsonRpcResponse::failure(None, PARSE_ERROR, format!("Parse error: {}", e));
                write_response(&mut writer, &response)?;
                continue;
            }
        };

        if let Some(response) = handle_request(registry, request) {
            write_response(&mut writer, &response)?;
        }
    }

    info!("input stream closed, shutting down");
    Ok(())
}

/// Answer a single request; notifications return None.
fn handle_request(registry: &ToolRegistry, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
    let JsonRpcRequest {
        id, method, params, ..
    } = request;

    match method.as_str() {
        "initialize" => {
            info!("client initializing");
            Some(success_json(id, &InitializeResult::current()))
        }

        "notifications/initialized" => {
            info!("client initialized");
            None
        }

        "tools/list" => {
            debug!("listing tools");
            let result = ToolsListResult {
                tools: registry.definitions(),
            };
            Some(success_json(id, &result))
        }

        "tools/call" => {
            let params: ToolsCallParams = match serde_json::from_value(params) {
                Ok(params) => params,
                Err(e) => {
                    return Some(JsonRpcResponse::failure(
                        id,
                        INVALID_PARAMS,
                        format!("Invalid params: {}", e),
                    ));
                }
            };
            let result = registry.dispatch(&params.name, &params.arguments);
            Some(success_json(id, &result))
        }

        "ping" => Some(JsonRpcResponse::success(
            id,
            Value::Object(Default::default()),
        )),

        other => {
            warn!(method = other, "unknown method");
            Some(JsonRpcResponse::failure(
                id,
                METHOD_NOT_FOUND,
                format!("Method not found: {}", other),
            ))
        }
    }
}

fn success_json<T: Serialize>(id: Option<Value>, payload: &T) -> JsonRpcResponse {
    match serde_json::to_value(payload) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => JsonRpcResponse::failure(
            id,
            INTERNAL_ERROR,
            format!("Failed to serialize response: {}", e),
        ),
    }
}

fn write_response<W: Write>(writer: &mut W, response: &JsonRpcResponse) -> io::Result<()> {
    let json = serde_json::to_string(response)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    debug!(response = %json, "sending response");
    writeln!(writer, "{}", json)?;
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::registry::ToolDefaults;
    use crate::mcp::tools::standard_registry;
    use std::io::Cursor;

    fn drive(input: &str) -> Vec<Value> {
        let registry = standard_registry(ToolDefaults::default());
        let mut output = Vec::new();
        serve(&registry, Cursor::new(input.to_string()), &mut output).unwrap();
        String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn tools_list_answers_the_full_catalog() {
        let responses = drive(r#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#);
        assert_eq!(responses.len(), 1);
        let tools = responses[0]["result"]["tools"].as_array().unwrap();
        assert_eq!(tools.len(), 4);
        assert_eq!(tools[0]["name"], "execute_query");
        assert!(tools[0]["inputSchema"]["required"]
            .as_array()
            .unwrap()
            .contains(&Value::from("query")));
    }

    #[test]
    fn initialize_reports_protocol_and_identity() {
        let responses = drive(r#"{"jsonrpc":"2.0","id":0,"method":"initialize","params":{}}"#);
        let result = &responses[0]["result"];
        assert_eq!(result["protocolVersion"], "2024-11-05");
        assert_eq!(result["serverInfo"]["name"], "sqlens");
    }

    #[test]
    fn parse_error_is_answered_and_the_loop_continues() {
        let input = "this is not json\n{\"jsonrpc\":\"2.0\",\"id\":2,\"method\":\"ping\"}\n";
        let responses = drive(input);
        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0]["error"]["code"], -32700);
        assert_eq!(responses[1]["id"], 2);
    }

    #[test]
    fn unknown_method_is_method_not_found() {
        let responses = drive(r#"{"jsonrpc":"2.0","id":3,"method":"resources/list"}"#);
        assert_eq!(responses[0]["error"]["code"], -32601);
    }

    #[test]
    fn notifications_and_blank_lines_produce_no_response() {
        let input = "\n{\"jsonrpc\":\"2.0\",\"method\":\"notifications/initialized\"}\n";
        let responses = drive(input);
        assert!(responses.is_empty());
    }

    #[test]
    fn tool_failure_stays_inside_the_call_result() {
        // Unknown tool: the JSON-RPC layer still answers success, the
        // error lives in the result envelope.
        let responses = drive(
            r#"{"jsonrpc":"2.0","id":4,"method":"tools/call","params":{"name":"bogus","arguments":{}}}"#,
        );
        let result = &responses[0]["result"];
        assert_eq!(result["isError"], true);
        assert_eq!(result["content"][0]["text"], "Unknown tool: bogus");
    }

    #[test]
    fn malformed_call_params_are_invalid_params() {
        let responses =
            drive(r#"{"jsonrpc":"2.0","id":5,"method":"tools/call","params":{"arguments":{}}}"#);
        assert_eq!(responses[0]["error"]["code"], -32602);
    }
}
