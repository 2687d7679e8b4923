//! Host environment facts.

use async_trait::async_trait;
use serde_json::json;

use crate::envelope::ToolResponse;
use crate::tools::tool::{Tool, ToolCategory, ToolContext, ToolError};

/// Reports static facts about the host running the server.
pub struct HostInfoTool;

#[async_trait]
impl Tool for HostInfoTool {
    fn name(&self) -> &str {
        "host_info"
    }

    fn category(&self) -> ToolCategory {
        ToolCategory::Host
    }

    fn description(&self) -> &str {
        "Report the host operating system, architecture, and process facts."
    }

    async fn execute(
        &self,
        _args: serde_json::Value,
        _ctx: &ToolContext,
    ) -> Result<ToolResponse, ToolError> {
        let cpus = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);

        Ok(ToolResponse::json(json!({
            "os": std::env::consts::OS,
            "arch": std::env::consts::ARCH,
            "family": std::env::consts::FAMILY,
            "cpus": cpus,
            "pid": std::process::id(),
            "time": chrono::Local::now().to_rfc3339(),
        })))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn test_reports_host_facts() {
        let response = HostInfoTool
            .execute(json!({}), &ToolContext::default())
            .await
            .unwrap();

        let ToolResponse::Json(value) = response else {
            panic!("expected json response");
        };
        assert_eq!(value["os"], std::env::consts::OS);
        assert_eq!(value["arch"], std::env::consts::ARCH);
        assert!(value["cpus"].as_u64().unwrap() >= 1);
        assert!(value["pid"].as_u64().is_some());
    }
}
