//! Tool trait and types.

use std::fmt;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::envelope::ToolResponse;
use crate::project;

/// Category a tool is discovered under.
///
/// Categories namespace the qualified identifier (`category.name`), so the
/// same short name may exist in more than one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolCategory {
    /// Application-level introspection (logs, env files, diagnostics).
    Core,
    /// Host environment facts (OS, architecture, CPU).
    Host,
    /// Project metadata (manifest, dependencies).
    Project,
}

impl ToolCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Core => "core",
            Self::Host => "host",
            Self::Project => "project",
        }
    }
}

impl fmt::Display for ToolCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Context threaded into every tool invocation.
///
/// Tools receive project facts explicitly instead of consulting process-wide
/// globals, so the same handler behaves identically inside a worker process
/// and on the direct in-process path.
#[derive(Debug, Clone, Default)]
pub struct ToolContext {
    /// Root of the inspected project.
    pub project_root: PathBuf,
    /// Explicit log file override.
    pub log_file: Option<PathBuf>,
}

impl ToolContext {
    /// Create a context rooted at a project directory.
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            log_file: None,
        }
    }

    /// Pin the inspected log file instead of resolving it per call.
    pub fn with_log_file(mut self, log_file: Option<PathBuf>) -> Self {
        self.log_file = log_file;
        self
    }

    /// The log file to inspect: the override if set, otherwise resolved
    /// from the project's `logs/` directory.
    pub fn resolve_log_file(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| project::resolve_log_file(&self.project_root))
    }

    /// Resolve a log source argument: `"auto"` (or empty) uses the default
    /// resolution, anything else is treated as a path relative to the
    /// project root.
    pub fn resolve_log_source(&self, source: &str) -> PathBuf {
        match source {
            "" | "auto" => self.resolve_log_file(),
            other => self.project_root.join(other),
        }
    }
}

/// Error type for tool execution failures.
///
/// Domain errors a handler can describe are returned as
/// [`ToolResponse::Error`] values instead; `ToolError` is reserved for
/// failures that interrupt the handler itself.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Execution failed: {0}")]
    ExecutionFailed(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Listing entry for a tool, shaped for `tools/list` consumers.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: serde_json::Value,
}

/// Trait for introspection tools.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Short name, unique within the tool's category.
    fn name(&self) -> &str;

    /// Category the tool is discovered under.
    fn category(&self) -> ToolCategory;

    /// Human-readable description of what the tool does.
    fn description(&self) -> &str;

    /// JSON Schema for the tool's arguments.
    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {},
            "required": []
        })
    }

    /// Execute the tool with the given arguments.
    async fn execute(
        &self,
        args: serde_json::Value,
        ctx: &ToolContext,
    ) -> Result<ToolResponse, ToolError>;

    /// Fully-qualified identifier, `category.name`.
    fn qualified_name(&self) -> String {
        format!("{}.{}", self.category(), self.name())
    }

    /// Listing entry for this tool.
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.qualified_name(),
            description: self.description().to_string(),
            input_schema: self.parameters_schema(),
        }
    }
}

/// Extract a required string argument.
///
/// Returns `ToolError::InvalidParameters` if the key is missing or not a
/// string.
pub fn require_str<'a>(args: &'a serde_json::Value, name: &str) -> Result<&'a str, ToolError> {
    args.get(name)
        .and_then(|v| v.as_str())
        .ok_or_else(|| ToolError::InvalidParameters(format!("missing '{}' argument", name)))
}

/// Extract an optional string argument.
pub fn optional_str<'a>(args: &'a serde_json::Value, name: &str) -> Option<&'a str> {
    args.get(name).and_then(|v| v.as_str())
}

/// Extract an optional integer argument.
pub fn optional_i64(args: &serde_json::Value, name: &str) -> Option<i64> {
    args.get(name).and_then(|v| v.as_i64())
}
