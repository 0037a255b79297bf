use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::error::{NavError, Result};
use crate::mcp::McpServer;
use crate::nav::Navigator;

#[derive(Parser)]
#[command(name = "pynav")]
#[command(about = "Python code navigation over MCP, powered by tree-sitter")]
#[command(version)]
#[command(after_long_help = r#"
EXAMPLES:
    # Start the MCP server (stdio transport), project set via the tool call
    pynav serve

    # Start pre-configured against a project
    pynav --root ~/work/api serve

    # Where is the symbol on src/app.py line 42 defined?
    pynav --root . definition src/app.py --line 42 --name handler

    # Same, with an exact column
    pynav --root . definition src/app.py --line 42 --column 8

    # List symbols in a file
    pynav --root . symbols src/app.py

    # All project-wide references to the symbol at a position
    pynav --root . references src/app.py --line 42 --column 8

    # Whole-identifier matches within one file
    pynav --root . find src/app.py handler
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Project root to analyze (defaults to the current directory for
    /// one-shot commands; serve starts unconfigured unless given)
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Python interpreter to analyze against
    #[arg(long)]
    pub interpreter: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the MCP server on stdio
    Serve,

    /// Find where a symbol is defined
    Definition {
        /// Path to the Python file
        file: PathBuf,

        /// Line number the symbol appears on (1-based)
        #[arg(long)]
        line: u32,

        /// Exact column of the symbol (0-based)
        #[arg(long, conflicts_with = "name")]
        column: Option<u32>,

        /// Symbol name to locate on the line instead of a column
        #[arg(long)]
        name: Option<String>,

        /// Which occurrence of the name on the line (0-based)
        #[arg(long, default_value_t = 0)]
        occurrence: u32,
    },

    /// List every symbol in a file, grouped by category
    Symbols {
        /// Path to the Python file
        file: PathBuf,
    },

    /// Find all project-wide references to the symbol at a position
    References {
        /// Path to the Python file
        file: PathBuf,

        /// Line number (1-based)
        #[arg(long)]
        line: u32,

        /// Column number (0-based)
        #[arg(long)]
        column: u32,
    },

    /// Find whole-identifier occurrences of a name in one file
    Find {
        /// Path to the Python file
        file: PathBuf,

        /// Symbol name to search for
        name: String,
    },
}

pub async fn run_mcp_server(navigator: Arc<Navigator>) -> anyhow::Result<()> {
    use rmcp::ServiceExt;

    let server = McpServer::new(navigator);
    let transport = (tokio::io::stdin(), tokio::io::stdout());
    let service = server
        .serve(transport)
        .await
        .map_err(|e| anyhow::anyhow!("MCP server failed to start: {e}"))?;
    service.waiting().await?;

    Ok(())
}

pub fn definition(
    navigator: &Navigator,
    file: &Path,
    line: u32,
    column: Option<u32>,
    name: Option<&str>,
    occurrence: u32,
) -> Result<()> {
    let defs = match (column, name) {
        (Some(column), _) => navigator.find_definition(file, line, column)?,
        (None, Some(name)) => navigator.find_definition_by_name(file, line, name, occurrence)?,
        (None, None) => {
            return Err(NavError::InvalidQuery(
                "provide either --column or --name".to_string(),
            ))
        }
    };

    if defs.is_empty() {
        println!("No definition found");
        return Ok(());
    }
    println!("{}", serde_json::to_string_pretty(&defs).unwrap_or_default());
    Ok(())
}

pub fn symbols(navigator: &Navigator, file: &Path) -> Result<()> {
    let catalog = navigator.list_symbols(file)?;

    if catalog.is_empty() {
        println!("No symbols found in {}", file.display());
        return Ok(());
    }
    println!("{}", serde_json::to_string_pretty(&catalog).unwrap_or_default());
    Ok(())
}

pub fn references(navigator: &Navigator, file: &Path, line: u32, column: u32) -> Result<()> {
    let refs = navigator.find_references(file, line, column)?;

    if refs.is_empty() {
        println!("No references found");
        return Ok(());
    }
    println!("{}", serde_json::to_string_pretty(&refs).unwrap_or_default());
    Ok(())
}

pub fn find(navigator: &Navigator, file: &Path, name: &str) -> Result<()> {
    let matches = navigator.find_in_file(file, name)?;

    if matches.is_empty() {
        println!("No occurrences of '{}' in {}", name, file.display());
        return Ok(());
    }
    println!("{}", serde_json::to_string_pretty(&matches).unwrap_or_default());
    Ok(())
}
