//! Worker entry point: decode, dispatch, emit one envelope.
//!
//! The worker's contract with its parent is strict: exactly one JSON
//! envelope on stdout, no matter what goes wrong. Diagnostics go to stderr.
//! The exit status distinguishes a handler that RAN (success, even when it
//! reported a domain error) from a call that never reached its handler or
//! was interrupted mid-flight.

use std::process::ExitCode;
use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::envelope::{ToolResponse, WireEnvelope};
use crate::tools::{ToolContext, ToolRegistry};

/// Executes a single base64-encoded tool call inside a worker process.
pub struct WorkerRuntime {
    registry: Arc<ToolRegistry>,
    context: ToolContext,
}

impl WorkerRuntime {
    pub fn new(registry: Arc<ToolRegistry>, context: ToolContext) -> Self {
        Self { registry, context }
    }

    /// Run one tool call and print its envelope to stdout.
    pub async fn run(&self, encoded_tool: &str, encoded_args: &str) -> ExitCode {
        let (envelope, handler_ran) = self.execute(encoded_tool, encoded_args).await;

        match serde_json::to_string(&envelope) {
            Ok(line) => println!("{line}"),
            Err(e) => {
                // Unreachable for the envelope types involved, but the
                // contract requires an envelope on stdout regardless.
                tracing::error!(error = %e, "Failed to serialize result envelope");
                println!(
                    r#"{{"isError":true,"content":[{{"type":"text","text":"Failed to serialize result envelope."}}]}}"#
                );
                return ExitCode::FAILURE;
            }
        }

        if handler_ran {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }
    }

    /// Decode and dispatch a call. The boolean reports whether the tool
    /// handler ran to completion; a handler that returned a domain error
    /// still counts as having run.
    async fn execute(&self, encoded_tool: &str, encoded_args: &str) -> (WireEnvelope, bool) {
        let Some(tool_id) = decode_utf8(encoded_tool) else {
            return (
                error_envelope(format!("Failed to decode tool identifier: {encoded_tool}")),
                false,
            );
        };

        if !self.registry.is_allowed(&tool_id) {
            return (
                error_envelope(format!("Invalid tool identifier: {tool_id}")),
                false,
            );
        }

        let Some(raw_args) = decode_utf8(encoded_args) else {
            return (
                error_envelope(format!("Failed to decode arguments: {encoded_args}")),
                false,
            );
        };

        let arguments: serde_json::Value = match serde_json::from_str(&raw_args) {
            Ok(serde_json::Value::Object(map)) => serde_json::Value::Object(map),
            Ok(_) => {
                return (
                    error_envelope("Invalid arguments format: expected a JSON object"),
                    false,
                );
            }
            Err(e) => {
                return (error_envelope(format!("Invalid arguments format: {e}")), false);
            }
        };

        // is_allowed already held, so resolution only fails on a racing
        // cache clear.
        let Some(tool) = self.registry.resolve(&tool_id) else {
            return (
                error_envelope(format!("Invalid tool identifier: {tool_id}")),
                false,
            );
        };

        tracing::debug!(tool = %tool_id, "Executing tool in worker");

        // Run the handler on its own task so a panic surfaces as a
        // JoinError here instead of unwinding through the entry point.
        let ctx = self.context.clone();
        let handle = tokio::spawn(async move { tool.execute(arguments, &ctx).await });

        match handle.await {
            Ok(Ok(response)) => (response.to_wire(), true),
            Ok(Err(e)) => {
                tracing::error!(tool = %tool_id, error = %e, "Tool handler failed");
                (error_envelope(format!("Tool execution failed: {e}")), false)
            }
            Err(e) => {
                tracing::error!(tool = %tool_id, error = %e, "Tool handler panicked");
                (error_envelope(format!("Tool execution failed: {e}")), false)
            }
        }
    }
}

fn decode_utf8(encoded: &str) -> Option<String> {
    STANDARD
        .decode(encoded)
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
}

fn error_envelope(message: impl Into<String>) -> WireEnvelope {
    ToolResponse::error(message).to_wire()
}
