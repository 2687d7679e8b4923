use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use stratum::cli::{Cli, Command, run_tools_command};
use stratum::config::Config;
use stratum::executor::ToolExecutor;
use stratum::server::ToolServer;
use stratum::tools::{ToolContext, ToolRegistry};
use stratum::worker::WorkerRuntime;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Stdout belongs to the protocol (and to worker envelopes); all
    // diagnostics go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("stratum=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(project_root) = cli.project_root {
        config.project_root = project_root;
    }

    let registry = Arc::new(ToolRegistry::new(config.tools.clone()));
    let context =
        ToolContext::new(&config.project_root).with_log_file(config.log_file.clone());

    match cli.command {
        Some(Command::ExecuteTool { tool, arguments }) => {
            let worker = WorkerRuntime::new(registry, context);
            Ok(worker.run(&tool, &arguments).await)
        }
        Some(Command::Tools(command)) => {
            let executor = ToolExecutor::new(registry, &config.project_root);
            run_tools_command(command, &executor, &context).await?;
            Ok(ExitCode::SUCCESS)
        }
        Some(Command::Serve) | None => {
            let executor = ToolExecutor::new(Arc::clone(&registry), &config.project_root);
            let server = ToolServer::new(registry, executor);
            server.run().await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
