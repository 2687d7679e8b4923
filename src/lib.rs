//! stratum: application introspection tool server with process-isolated
//! tool execution.
//!
//! Tools inspect a target project (its logs, dotenv files, manifest, and
//! host environment) and are exposed over a line-delimited JSON-RPC stdio
//! protocol. Every tool call runs in a short-lived worker process:
//!
//! ```text
//!   client ──stdio──> ToolServer ──> ToolExecutor ──spawn──> worker
//!                        │               │                     │
//!                   ToolRegistry    base64 argv          WorkerRuntime
//!                        │          + timeout                  │
//!                        └──────── result envelope <── stdout ─┘
//! ```
//!
//! The worker re-invokes this same binary with a hidden subcommand, so a
//! crashing or hanging tool handler never takes the server down with it.

pub mod cli;
pub mod config;
pub mod envelope;
pub mod error;
pub mod executor;
pub mod logs;
pub mod project;
pub mod server;
pub mod tools;
pub mod worker;

pub use config::Config;
pub use error::{Error, Result};
