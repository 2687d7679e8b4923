//! `tools` subcommand: list the catalog, invoke a tool ad hoc.

use clap::{Args, Subcommand};

use crate::envelope::ToolResponse;
use crate::executor::ToolExecutor;
use crate::tools::ToolContext;

#[derive(Args, Debug)]
pub struct ToolsCommand {
    #[command(subcommand)]
    pub action: ToolsAction,
}

#[derive(Subcommand, Debug)]
pub enum ToolsAction {
    /// List available tools.
    List {
        /// Also print each tool's parameter schema.
        #[arg(long)]
        verbose: bool,
    },

    /// Invoke a tool and print its result.
    Call {
        /// Tool identifier, qualified (`core.echo`) or short (`echo`).
        name: String,

        /// JSON arguments object.
        #[arg(long, default_value = "{}")]
        args: String,

        /// Run in-process instead of spawning a worker.
        #[arg(long)]
        direct: bool,
    },
}

/// Run a `tools` subcommand against a configured executor.
pub async fn run_tools_command(
    command: ToolsCommand,
    executor: &ToolExecutor,
    context: &ToolContext,
) -> anyhow::Result<()> {
    let registry = executor.registry();

    match command.action {
        ToolsAction::List { verbose } => {
            for definition in registry.definitions() {
                println!("{}", definition.name);
                println!("    {}", definition.description);
                if verbose {
                    println!(
                        "    schema: {}",
                        serde_json::to_string(&definition.input_schema)?
                    );
                }
            }
            Ok(())
        }
        ToolsAction::Call { name, args, direct } => {
            let arguments: serde_json::Value = serde_json::from_str(&args)
                .map_err(|e| anyhow::anyhow!("invalid --args JSON: {e}"))?;

            let tool_id = if registry.is_allowed(&name) {
                name.clone()
            } else {
                registry
                    .by_short_name(&name)
                    .ok_or_else(|| anyhow::anyhow!("unknown tool: {name}"))?
            };

            let response = if direct {
                let tool = registry
                    .resolve(&tool_id)
                    .ok_or_else(|| anyhow::anyhow!("unknown tool: {tool_id}"))?;
                match tool.execute(arguments, context).await {
                    Ok(response) => response,
                    Err(e) => ToolResponse::error(format!("Tool execution failed: {e}")),
                }
            } else {
                executor.execute(&tool_id, &arguments).await
            };

            match response {
                ToolResponse::Text(text) => {
                    println!("{text}");
                    Ok(())
                }
                ToolResponse::Json(value) => {
                    println!("{}", serde_json::to_string_pretty(&value)?);
                    Ok(())
                }
                ToolResponse::Error(message) => anyhow::bail!("{message}"),
            }
        }
    }
}
