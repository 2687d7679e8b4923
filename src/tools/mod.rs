//! Tool abstractions: the `Tool` trait, the registry, and the built-in
//! tool catalog.

pub mod builtin;
mod registry;
mod tool;

pub use registry::{ToolRegistry, filter_identifiers};
pub use tool::{
    Tool, ToolCategory, ToolContext, ToolDefinition, ToolError, optional_i64, optional_str,
    require_str,
};
