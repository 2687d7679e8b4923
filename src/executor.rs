//! Out-of-process tool execution.
//!
//! Every tool call runs in a short-lived worker process:
//!
//! ```text
//!   server process                        worker process
//!   --------------                        --------------
//!   ToolExecutor::execute(id, args)
//!     base64(id), base64(args)  ----->    stratum execute-tool <id64> <args64>
//!     spawn + timeout                       decode, resolve, run handler
//!     read stdout               <-----      print one JSON envelope
//!     reconstruct envelope
//! ```
//!
//! A crashing, hanging, or misbehaving tool can only take down its own
//! worker; the server turns whatever comes back (or does not come back)
//! into an error response. Arguments travel base64-encoded through argv so
//! no quoting layer between the two processes can mangle them.

use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tokio::process::Command;

use crate::envelope::{self, ToolResponse};
use crate::tools::ToolRegistry;
use crate::tools::builtin::parse_env_names;

/// Default per-call timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: i64 = 180;

/// Minimum accepted per-call timeout in seconds.
pub const MIN_TIMEOUT_SECS: i64 = 1;

/// Maximum accepted per-call timeout in seconds.
pub const MAX_TIMEOUT_SECS: i64 = 600;

/// Spawns worker processes and interprets their envelopes.
pub struct ToolExecutor {
    registry: Arc<ToolRegistry>,
    project_root: PathBuf,
    worker_command: Vec<String>,
}

impl ToolExecutor {
    /// Create an executor whose workers re-invoke the current binary with
    /// the hidden `execute-tool` subcommand.
    pub fn new(registry: Arc<ToolRegistry>, project_root: impl Into<PathBuf>) -> Self {
        let current_exe = std::env::current_exe()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|_| "stratum".to_string());

        Self {
            registry,
            project_root: project_root.into(),
            worker_command: vec![current_exe, "execute-tool".to_string()],
        }
    }

    /// Replace the worker command line. The encoded tool identifier and
    /// arguments are appended to it.
    pub fn with_worker_command(mut self, command: Vec<String>) -> Self {
        self.worker_command = command;
        self
    }

    /// The registry backing this executor.
    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    /// Execute a tool in an isolated worker process.
    ///
    /// Never returns an `Err`: every failure mode, from a hung worker to
    /// garbage on stdout, is folded into a [`ToolResponse::Error`] so the
    /// caller always has an envelope to forward.
    pub async fn execute(&self, tool_id: &str, arguments: &serde_json::Value) -> ToolResponse {
        let timeout_secs = resolve_timeout(arguments);

        let encoded_tool = STANDARD.encode(tool_id);
        let encoded_args = STANDARD.encode(arguments.to_string());

        let Some((program, base_args)) = self.worker_command.split_first() else {
            return ToolResponse::error("Process tool execution failed: empty worker command");
        };

        let mut cmd = Command::new(program);
        cmd.args(base_args)
            .arg(&encoded_tool)
            .arg(&encoded_args)
            .current_dir(&self.project_root)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        self.clean_environment(&mut cmd);

        tracing::debug!(tool = %tool_id, timeout_secs, "Spawning tool worker");

        let child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                tracing::error!(tool = %tool_id, error = %e, "Failed to spawn tool worker");
                return ToolResponse::error(format!("Process tool execution failed: {e}"));
            }
        };

        // Dropping the future on timeout kills the worker via kill_on_drop.
        let output = match tokio::time::timeout(
            Duration::from_secs(timeout_secs),
            child.wait_with_output(),
        )
        .await
        {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return ToolResponse::error(format!("Process tool execution failed: {e}"));
            }
            Err(_) => {
                tracing::warn!(tool = %tool_id, timeout_secs, "Tool worker timed out");
                return ToolResponse::error(format!(
                    "Tool execution timed out after {timeout_secs} seconds"
                ));
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        // The worker emits a valid envelope even for failures it handled
        // itself, so stdout takes precedence over the exit status.
        if !output.status.success() {
            tracing::debug!(
                tool = %tool_id,
                status = ?output.status.code(),
                "Tool worker exited with failure status"
            );
            if let Ok(value) = serde_json::from_str::<serde_json::Value>(stdout.trim()) {
                return envelope::reconstruct(&value);
            }
            return ToolResponse::error(format!(
                "Process tool execution failed: {}{}",
                stderr, stdout
            ));
        }

        match serde_json::from_str::<serde_json::Value>(stdout.trim()) {
            Ok(value) => envelope::reconstruct(&value),
            Err(e) => ToolResponse::error(format!("Invalid JSON output from tool process: {e}")),
        }
    }

    /// Scrub variables named in the project's `.env` from the worker's
    /// inherited environment, so tool handlers never observe application
    /// secrets loaded into the server process.
    fn clean_environment(&self, cmd: &mut Command) {
        let env_file = self.project_root.join(".env");
        let Ok(content) = std::fs::read_to_string(&env_file) else {
            return;
        };
        for name in parse_env_names(&content) {
            cmd.env_remove(&name);
        }
    }
}

/// Effective timeout for a call: the `timeout` argument if present,
/// otherwise the default, clamped to the accepted range.
pub fn resolve_timeout(arguments: &serde_json::Value) -> u64 {
    arguments
        .get("timeout")
        .and_then(serde_json::Value::as_i64)
        .unwrap_or(DEFAULT_TIMEOUT_SECS)
        .clamp(MIN_TIMEOUT_SECS, MAX_TIMEOUT_SECS) as u64
}
