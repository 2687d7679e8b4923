//! Most-recent-error lookup across candidate log files.

use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::json;

use crate::envelope::ToolResponse;
use crate::logs::{self, LogReadError};
use crate::tools::tool::{Tool, ToolCategory, ToolContext, ToolError, optional_str};

/// Scans log files backward for the most recent error-level entry.
pub struct LastErrorTool;

impl LastErrorTool {
    /// Log files to inspect, in priority order. An explicit source narrows
    /// the scan to that one file.
    fn candidates(ctx: &ToolContext, source: &str) -> Vec<PathBuf> {
        match source {
            "" | "auto" => {
                let mut paths = vec![ctx.resolve_log_file()];
                let fallback = ctx.project_root.join("logs").join("app.log");
                if !paths.contains(&fallback) {
                    paths.push(fallback);
                }
                paths
            }
            other => vec![ctx.project_root.join(other)],
        }
    }
}

#[async_trait]
impl Tool for LastErrorTool {
    fn name(&self) -> &str {
        "last_error"
    }

    fn category(&self) -> ToolCategory {
        ToolCategory::Core
    }

    fn description(&self) -> &str {
        "Find the most recent error entry in the application logs, including \
         any stack trace recorded with it."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "source": {
                    "type": "string",
                    "description": "Log file path relative to the project root, or \"auto\" \
                                    to inspect the default application log."
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
        let source = optional_str(&args, "source").unwrap_or("auto");

        for path in Self::candidates(ctx, source) {
            match logs::read_last_error_entry(&path) {
                Ok(Some(entry)) => {
                    return Ok(ToolResponse::text(format!(
                        "[Source: {}]\n{}",
                        path.display(),
                        entry
                    )));
                }
                Ok(None) => continue,
                Err(LogReadError::NotFound { .. }) => continue,
                Err(LogReadError::Io(e)) => return Err(ToolError::Io(e)),
            }
        }

        Ok(ToolResponse::text(
            "No error entries found in the inspected log files.",
        ))
    }
}
