//! Connectivity check tool.

use async_trait::async_trait;
use serde_json::json;

use crate::envelope::ToolResponse;
use crate::tools::tool::{Tool, ToolCategory, ToolContext, ToolError, require_str};

/// Echoes its message back, for verifying the execution pipeline end to end.
pub struct EchoTool;

#[async_trait]
impl Tool for EchoTool {
    fn name(&self) -> &str {
        "echo"
    }

    fn category(&self) -> ToolCategory {
        ToolCategory::Core
    }

    fn description(&self) -> &str {
        "Echo a message back. Useful for verifying the tool execution pipeline."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "message": {
                    "type": "string",
                    "description": "The message to echo back."
                }
            },
            "required": ["message"]
        })
    }

    async fn execute(
        &self,
        args: serde_json::Value,
        _ctx: &ToolContext,
    ) -> Result<ToolResponse, ToolError> {
        let message = require_str(&args, "message")?;
        Ok(ToolResponse::text(message))
    }
}
