//! Project manifest summary.

use async_trait::async_trait;
use serde_json::json;

use crate::envelope::ToolResponse;
use crate::tools::tool::{Tool, ToolCategory, ToolContext, ToolError};

/// Summarizes the project's Cargo manifest: name, version, edition, and
/// dependency names.
pub struct ProjectInfoTool;

fn dependency_names(manifest: &toml::Value, table: &str) -> Vec<String> {
    let mut names: Vec<String> = manifest
        .get(table)
        .and_then(|deps| deps.as_table())
        .map(|deps| deps.keys().cloned().collect())
        .unwrap_or_default();
    names.sort();
    names
}

#[async_trait]
impl Tool for ProjectInfoTool {
    fn name(&self) -> &str {
        "project_info"
    }

    fn category(&self) -> ToolCategory {
        ToolCategory::Project
    }

    fn description(&self) -> &str {
        "Summarize the project manifest: package name, version, edition, and \
         dependency names."
    }

    async fn execute(
        &self,
        _args: serde_json::Value,
        ctx: &ToolContext,
    ) -> Result<ToolResponse, ToolError> {
        let path = ctx.project_root.join("Cargo.toml");
        if !path.exists() {
            return Ok(ToolResponse::error(format!(
                "No Cargo.toml found at {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(&path)?;
        let manifest: toml::Value = match content.parse() {
            Ok(value) => value,
            Err(e) => {
                return Ok(ToolResponse::error(format!(
                    "Failed to parse Cargo.toml: {e}"
                )));
            }
        };

        let package = manifest.get("package");
        let field = |key: &str| {
            package
                .and_then(|pkg| pkg.get(key))
                .and_then(|v| v.as_str())
                .unwrap_or("unknown")
                .to_string()
        };

        Ok(ToolResponse::json(json!({
            "name": field("name"),
            "version": field("version"),
            "edition": field("edition"),
            "dependencies": dependency_names(&manifest, "dependencies"),
            "dev_dependencies": dependency_names(&manifest, "dev-dependencies"),
        })))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn test_summarizes_manifest() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("Cargo.toml"),
            r#"
[package]
name = "demo-app"
version = "0.3.1"
edition = "2024"

[dependencies]
serde = "1"
tokio = { version = "1", features = ["full"] }

[dev-dependencies]
tempfile = "3"
"#,
        )
        .unwrap();
        let ctx = ToolContext::new(dir.path());

        let response = ProjectInfoTool.execute(json!({}), &ctx).await.unwrap();

        let ToolResponse::Json(value) = response else {
            panic!("expected json response");
        };
        assert_eq!(value["name"], "demo-app");
        assert_eq!(value["version"], "0.3.1");
        assert_eq!(value["edition"], "2024");
        assert_eq!(value["dependencies"], json!(["serde", "tokio"]));
        assert_eq!(value["dev_dependencies"], json!(["tempfile"]));
    }

    #[tokio::test]
    async fn test_missing_manifest_is_domain_error() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = ToolContext::new(dir.path());

        let response = ProjectInfoTool.execute(json!({}), &ctx).await.unwrap();

        assert!(response.is_error());
        let ToolResponse::Error(message) = response else {
            panic!("expected error response");
        };
        assert!(message.starts_with("No Cargo.toml found at "));
    }

    #[tokio::test]
    async fn test_malformed_manifest_is_domain_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Cargo.toml"), "not [ valid toml").unwrap();
        let ctx = ToolContext::new(dir.path());

        let response = ProjectInfoTool.execute(json!({}), &ctx).await.unwrap();

        assert!(response.is_error());
    }
}
