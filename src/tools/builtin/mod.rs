//! Built-in tool catalog, grouped by category.

use std::sync::Arc;

use crate::tools::tool::Tool;

mod echo;
mod host_info;
mod last_error;
mod list_env_vars;
mod project_info;
mod read_log_entries;

pub use echo::EchoTool;
pub use host_info::HostInfoTool;
pub use last_error::LastErrorTool;
pub use list_env_vars::{ListEnvVarsTool, parse_env_names};
pub use project_info::ProjectInfoTool;
pub use read_log_entries::ReadLogEntriesTool;

/// Tools in the `core` category.
pub fn core_tools() -> Vec<Arc<dyn Tool>> {
    vec![
        Arc::new(EchoTool),
        Arc::new(ReadLogEntriesTool),
        Arc::new(LastErrorTool),
        Arc::new(ListEnvVarsTool),
    ]
}

/// Tools in the `host` category.
pub fn host_tools() -> Vec<Arc<dyn Tool>> {
    vec![Arc::new(HostInfoTool)]
}

/// Tools in the `project` category.
pub fn project_tools() -> Vec<Arc<dyn Tool>> {
    vec![Arc::new(ProjectInfoTool)]
}
