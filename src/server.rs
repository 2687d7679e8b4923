//! Line-delimited JSON-RPC server over stdio.
//!
//! Stdout carries protocol frames only; all diagnostics go to stderr. Each
//! request line is answered with one response line, and notifications
//! (requests without an id) are consumed silently.

use std::sync::Arc;

use serde_json::{Value, json};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::error::Result;
use crate::executor::ToolExecutor;
use crate::tools::ToolRegistry;

/// MCP protocol revision implemented by this server.
const PROTOCOL_VERSION: &str = "2024-11-05";

const PARSE_ERROR: i64 = -32700;
const METHOD_NOT_FOUND: i64 = -32601;
const INVALID_PARAMS: i64 = -32602;

/// Serves tool listing and invocation requests over stdin/stdout.
pub struct ToolServer {
    registry: Arc<ToolRegistry>,
    executor: ToolExecutor,
}

impl ToolServer {
    pub fn new(registry: Arc<ToolRegistry>, executor: ToolExecutor) -> Self {
        Self { registry, executor }
    }

    /// Serve requests until stdin closes.
    pub async fn run(&self) -> Result<()> {
        let stdin = BufReader::new(tokio::io::stdin());
        let mut stdout = tokio::io::stdout();
        let mut lines = stdin.lines();

        tracing::info!(tools = self.registry.count(), "Serving tool requests on stdio");

        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let response = match serde_json::from_str::<Value>(line) {
                Ok(request) => self.handle_request(&request).await,
                Err(e) => {
                    tracing::warn!(error = %e, "Discarding unparsable request line");
                    Some(error_response(Value::Null, PARSE_ERROR, "Parse error"))
                }
            };

            if let Some(response) = response {
                let mut frame = serde_json::to_string(&response)?;
                frame.push('\n');
                stdout.write_all(frame.as_bytes()).await?;
                stdout.flush().await?;
            }
        }

        tracing::info!("Stdin closed, shutting down");
        Ok(())
    }

    /// Handle one request. `None` means no response is owed (notification).
    pub async fn handle_request(&self, request: &Value) -> Option<Value> {
        let id = match request.get("id") {
            Some(id) if !id.is_null() => id.clone(),
            _ => {
                // Notification; nothing to answer.
                return None;
            }
        };

        let method = request.get("method").and_then(Value::as_str).unwrap_or("");
        tracing::debug!(%method, "Handling request");

        match method {
            "initialize" => Some(result_response(
                id,
                json!({
                    "protocolVersion": PROTOCOL_VERSION,
                    "capabilities": {"tools": {}},
                    "serverInfo": {
                        "name": "stratum",
                        "version": env!("CARGO_PKG_VERSION"),
                    },
                }),
            )),
            "ping" => Some(result_response(id, json!({}))),
            "tools/list" => Some(result_response(
                id,
                json!({"tools": self.registry.definitions()}),
            )),
            "tools/call" => Some(self.handle_tools_call(id, request.get("params")).await),
            other => Some(error_response(
                id,
                METHOD_NOT_FOUND,
                &format!("Method not found: {other}"),
            )),
        }
    }

    async fn handle_tools_call(&self, id: Value, params: Option<&Value>) -> Value {
        let Some(name) = params
            .and_then(|p| p.get("name"))
            .and_then(Value::as_str)
        else {
            return error_response(id, INVALID_PARAMS, "Missing tool name");
        };

        let arguments = params
            .and_then(|p| p.get("arguments"))
            .cloned()
            .unwrap_or_else(|| json!({}));

        // Accept qualified identifiers and bare short names.
        let tool_id = if self.registry.is_allowed(name) {
            name.to_string()
        } else if let Some(qualified) = self.registry.by_short_name(name) {
            qualified
        } else {
            return error_response(id, INVALID_PARAMS, &format!("Unknown tool: {name}"));
        };

        tracing::info!(tool = %tool_id, "Dispatching tool call");
        let response = self.executor.execute(&tool_id, &arguments).await;

        result_response(id, response.to_wire_value())
    }
}

fn result_response(id: Value, result: Value) -> Value {
    json!({"jsonrpc": "2.0", "id": id, "result": result})
}

fn error_response(id: Value, code: i64, message: &str) -> Value {
    json!({"jsonrpc": "2.0", "id": id, "error": {"code": code, "message": message}})
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn server_with_worker(script: &str) -> (tempfile::TempDir, ToolServer) {
        let dir = tempfile::tempdir().unwrap();
        let registry = Arc::new(ToolRegistry::with_defaults());
        let executor = ToolExecutor::new(Arc::clone(&registry), dir.path())
            .with_worker_command(vec![
                "sh".to_string(),
                "-c".to_string(),
                script.to_string(),
            ]);
        let server = ToolServer::new(registry, executor);
        (dir, server)
    }

    #[tokio::test]
    async fn test_initialize() {
        let (_dir, server) = server_with_worker("true");
        let response = server
            .handle_request(&json!({"jsonrpc": "2.0", "id": 1, "method": "initialize"}))
            .await
            .unwrap();

        assert_eq!(response["id"], 1);
        assert_eq!(response["result"]["protocolVersion"], PROTOCOL_VERSION);
        assert_eq!(response["result"]["serverInfo"]["name"], "stratum");
    }

    #[tokio::test]
    async fn test_ping() {
        let (_dir, server) = server_with_worker("true");
        let response = server
            .handle_request(&json!({"jsonrpc": "2.0", "id": 7, "method": "ping"}))
            .await
            .unwrap();

        assert_eq!(response["result"], json!({}));
    }

    #[tokio::test]
    async fn test_tools_list() {
        let (_dir, server) = server_with_worker("true");
        let response = server
            .handle_request(&json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"}))
            .await
            .unwrap();

        let tools = response["result"]["tools"].as_array().unwrap();
        assert!(
            tools
                .iter()
                .any(|tool| tool["name"] == "core.echo" && tool["inputSchema"].is_object())
        );
    }

    #[tokio::test]
    async fn test_notifications_get_no_response() {
        let (_dir, server) = server_with_worker("true");
        let response = server
            .handle_request(&json!({"jsonrpc": "2.0", "method": "notifications/initialized"}))
            .await;

        assert!(response.is_none());
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let (_dir, server) = server_with_worker("true");
        let response = server
            .handle_request(&json!({"jsonrpc": "2.0", "id": 3, "method": "resources/list"}))
            .await
            .unwrap();

        assert_eq!(response["error"]["code"], METHOD_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_call_unknown_tool() {
        let (_dir, server) = server_with_worker("true");
        let response = server
            .handle_request(&json!({
                "jsonrpc": "2.0",
                "id": 4,
                "method": "tools/call",
                "params": {"name": "core.missing"},
            }))
            .await
            .unwrap();

        assert_eq!(response["error"]["code"], INVALID_PARAMS);
        assert!(
            response["error"]["message"]
                .as_str()
                .unwrap()
                .contains("core.missing")
        );
    }

    #[tokio::test]
    async fn test_call_by_short_name_routes_through_worker() {
        let (_dir, server) = server_with_worker(
            r#"printf '{"isError":false,"content":[{"type":"text","text":"from worker"}]}'"#,
        );
        let response = server
            .handle_request(&json!({
                "jsonrpc": "2.0",
                "id": 5,
                "method": "tools/call",
                "params": {"name": "echo", "arguments": {"message": "x"}},
            }))
            .await
            .unwrap();

        assert_eq!(response["result"]["isError"], false);
        assert_eq!(response["result"]["content"][0]["text"], "from worker");
    }

    #[tokio::test]
    async fn test_call_missing_name() {
        let (_dir, server) = server_with_worker("true");
        let response = server
            .handle_request(&json!({
                "jsonrpc": "2.0",
                "id": 6,
                "method": "tools/call",
                "params": {},
            }))
            .await
            .unwrap();

        assert_eq!(response["error"]["code"], INVALID_PARAMS);
    }
}
