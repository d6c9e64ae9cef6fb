//! Conduit CLI binary entry point.

use std::sync::Arc;

use clap::Parser;
use conduit::agent_loop::ToolCallingOrchestrator;
use conduit::chat::run_chat;
use conduit::cli::{Cli, Mode};
use conduit::config::ConduitConfig;
use conduit::error::ConduitError;
use conduit::mcp::{list_all, MCPSession, ServerLaunch};
use conduit::provider::{create_provider, ModelProvider};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), ConduitError> {
    let launch = ServerLaunch::resolve(&cli.server_path, cli.interpreter.as_deref())?;
    let config = ConduitConfig::from_env();
    let mode = cli.mode();

    // Credential problems must surface before a server process exists.
    let provider: Option<Arc<dyn ModelProvider>> = match mode {
        Mode::Chat => Some(Arc::from(create_provider(&config)?)),
        Mode::Members => None,
    };

    let mut session = MCPSession::open(&launch).await?;
    if let Some(instructions) = session.instructions() {
        tracing::debug!(%instructions, "server instructions");
    }

    let outcome = match provider {
        Some(provider) => {
            let orchestrator = ToolCallingOrchestrator::new(&mut session, provider)
                .with_settings(config.generation_settings());
            run_chat(orchestrator).await.map(|_| ())
        }
        None => {
            print!("{}", list_all(&mut session).await);
            Ok(())
        }
    };

    let closed = session.close().await;
    outcome?;
    closed.map(|_| ())
}
