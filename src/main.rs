mod cli;
mod mcp;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Commands};

// Re-export from lib for internal use
use pynav::{error, nav};
use pynav::Navigator;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pynav=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();
    let navigator = Arc::new(Navigator::new());

    match cli.command {
        Commands::Serve => {
            if let Some(root) = cli.root.as_deref() {
                navigator.configure_project(root, cli.interpreter.as_deref())?;
            }
            cli::run_mcp_server(navigator).await?;
        }
        command => {
            let root = cli.root.unwrap_or_else(|| PathBuf::from("."));
            navigator.configure_project(&root, cli.interpreter.as_deref())?;

            match command {
                Commands::Serve => unreachable!(),
                Commands::Definition {
                    file,
                    line,
                    column,
                    name,
                    occurrence,
                } => {
                    cli::definition(&navigator, &file, line, column, name.as_deref(), occurrence)?;
                }
                Commands::Symbols { file } => {
                    cli::symbols(&navigator, &file)?;
                }
                Commands::References { file, line, column } => {
                    cli::references(&navigator, &file, line, column)?;
                }
                Commands::Find { file, name } => {
                    cli::find(&navigator, &file, &name)?;
                }
            }
        }
    }

    Ok(())
}
