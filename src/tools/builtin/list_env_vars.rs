//! Dotenv variable-name listing.
//!
//! Lists the variable NAMES defined in a dotenv-style file, never the
//! values. The same parser feeds the executor's environment sanitizer, so
//! everything a worker has scrubbed is also visible here.

use std::path::Path;

use async_trait::async_trait;
use serde_json::json;

use crate::envelope::ToolResponse;
use crate::tools::tool::{Tool, ToolCategory, ToolContext, ToolError, optional_str};

/// Lists variable names from the project's .env file.
pub struct ListEnvVarsTool;

/// Variable names defined in a dotenv file, in file order.
///
/// Lines are `NAME=value` with optional `export ` prefix; comments and
/// blank lines are skipped. Malformed lines are ignored rather than
/// rejected, matching how dotenv loaders treat them.
pub fn parse_env_names(content: &str) -> Vec<String> {
    let mut names = Vec::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").unwrap_or(line).trim_start();
        let Some((name, _)) = line.split_once('=') else {
            continue;
        };
        let name = name.trim();
        if !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
            && !name.chars().next().is_some_and(|c| c.is_ascii_digit())
        {
            names.push(name.to_string());
        }
    }
    names
}

#[async_trait]
impl Tool for ListEnvVarsTool {
    fn name(&self) -> &str {
        "list_env_vars"
    }

    fn category(&self) -> ToolCategory {
        ToolCategory::Core
    }

    fn description(&self) -> &str {
        "List the variable names defined in the project's .env file. \
         Values are never returned."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "file": {
                    "type": "string",
                    "description": "Dotenv file path relative to the project root. \
                                    Defaults to \".env\"."
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
        let file = optional_str(&args, "file").unwrap_or(".env");

        // Restrict reads to dotenv files; this tool must not become a
        // generic file reader.
        let basename = Path::new(file)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("");
        if basename != ".env" && !basename.starts_with(".env.") {
            return Ok(ToolResponse::error(
                "This tool can only read .env files.",
            ));
        }

        let path = ctx.project_root.join(file);
        if !path.exists() {
            return Ok(ToolResponse::error(format!(
                "File not found at '{}'",
                path.display()
            )));
        }

        let Ok(content) = std::fs::read_to_string(&path) else {
            return Ok(ToolResponse::error("Failed to read .env file."));
        };

        let mut names = parse_env_names(&content);
        if names.is_empty() {
            return Ok(ToolResponse::text(
                "No environment variables found in file.",
            ));
        }
        names.sort();
        names.dedup();

        Ok(ToolResponse::json(json!({
            "file": file,
            "variables": names,
            "count": names.len(),
        })))
    }
}
