//! Tail reader over the application log.

use async_trait::async_trait;
use serde_json::json;

use crate::envelope::ToolResponse;
use crate::logs::{self, LogReadError};
use crate::tools::tool::{
    Tool, ToolCategory, ToolContext, ToolError, optional_i64, optional_str,
};

const DEFAULT_ENTRIES: i64 = 10;

/// Returns the last N entries of the project's log file.
pub struct ReadLogEntriesTool;

#[async_trait]
impl Tool for ReadLogEntriesTool {
    fn name(&self) -> &str {
        "read_log_entries"
    }

    fn category(&self) -> ToolCategory {
        ToolCategory::Core
    }

    fn description(&self) -> &str {
        "Read the most recent entries from the application log file. \
         Multi-line entries such as stack traces are kept intact."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "entries": {
                    "type": "integer",
                    "description": "Number of log entries to return. Defaults to 10.",
                    "default": DEFAULT_ENTRIES
                },
                "source": {
                    "type": "string",
                    "description": "Log file path relative to the project root, or \"auto\" \
                                    to resolve the default application log."
                }
            },
            "required": []
        })
    }

    async fn execute(
        &self,
        args: serde_json::Value,
        ctx: &ToolContext,
    ) -> Result<ToolResponse, ToolError> {
        let count = optional_i64(&args, "entries").unwrap_or(DEFAULT_ENTRIES);
        if count <= 0 {
            return Ok(ToolResponse::error(
                "The \"entries\" argument must be greater than 0.",
            ));
        }

        let source = optional_str(&args, "source").unwrap_or("auto");
        let path = ctx.resolve_log_source(source);

        match logs::read_last_entries(&path, count as usize) {
            Ok(entries) if entries.is_empty() => Ok(ToolResponse::text("No log entries yet.")),
            Ok(entries) => Ok(ToolResponse::text(entries.join("\n\n"))),
            Err(LogReadError::NotFound { path }) => Ok(ToolResponse::error(format!(
                "Log file not found at {path}"
            ))),
            Err(LogReadError::Io(e)) => Err(ToolError::Io(e)),
        }
    }
}
