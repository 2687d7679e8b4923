//! Command-line interface.

mod tool;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use tool::{ToolsAction, ToolsCommand, run_tools_command};

#[derive(Parser, Debug)]
#[command(name = "stratum", version, about = "Application introspection tool server")]
pub struct Cli {
    /// Root of the project to inspect.
    #[arg(long, global = true, env = "STRATUM_PROJECT_ROOT")]
    pub project_root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve tool requests over stdio (the default).
    Serve,

    /// List and invoke tools from the command line.
    Tools(ToolsCommand),

    /// Worker entry point; spawned by the server, not for direct use.
    #[command(hide = true, name = "execute-tool")]
    ExecuteTool {
        /// Base64-encoded tool identifier.
        tool: String,
        /// Base64-encoded JSON arguments object.
        arguments: String,
    },
}
