//! docdrift - Documentation drift analyzer
//!
//! Analyzes a codebase for missing and inconsistent documentation and
//! produces a JSON report.

use anyhow::Result;
use docdrift::cli::{analyze, config_command, Cli, Commands};
use std::path::Path;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let root = Path::new(&cli.path);

    match cli.command {
        Commands::Analyze(args) => {
            analyze(root, &args, cli.format).await?;
        }

        Commands::Config(args) => {
            config_command(root, &args)?;
        }
    }

    Ok(())
}
