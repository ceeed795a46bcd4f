//! CLI interface using clap
//!
//! Provides the command-line interface for docdrift

mod commands;

pub use commands::*;

use clap::{Parser, Subcommand};

/// docdrift - Documentation drift analyzer
#[derive(Parser, Debug)]
#[command(name = "docdrift")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the codebase (defaults to current directory)
    #[arg(short, long, global = true, default_value = ".")]
    pub path: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json)
    #[arg(short = 'o', long, global = true, default_value = "text")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze a codebase for documentation issues
    Analyze(AnalyzeArgs),

    /// Show or reset configuration
    Config(ConfigArgs),
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Arguments for analyze command
#[derive(Parser, Debug)]
pub struct AnalyzeArgs {
    /// Write a JSON report to this file
    #[arg(long)]
    pub output: Option<String>,

    /// Override the similarity threshold (0.0 - 1.0)
    #[arg(short, long)]
    pub threshold: Option<f64>,

    /// Override the worker pool size (0 = one per core)
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Embedding endpoint URL (e.g., http://localhost:11434)
    #[arg(long, env = "DOCDRIFT_EMBEDDING_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Embedding model name
    #[arg(long, env = "DOCDRIFT_EMBEDDING_MODEL")]
    pub model: Option<String>,
}

/// Arguments for config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Show current configuration
    #[arg(long)]
    pub show: bool,

    /// Write defaults to docdrift.toml
    #[arg(long)]
    pub init: bool,

    /// Reset docdrift.toml to defaults
    #[arg(long)]
    pub reset: bool,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
