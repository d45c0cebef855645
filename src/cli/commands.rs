//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Solidafy Pager CLI
#[derive(Parser, Debug)]
#[command(name = "solidafy-pager")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// API key; overrides the config file (falls back to `TMDB_API_KEY`)
    #[arg(short = 'k', long, global = true)]
    pub api_key: Option<String>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Page through the listing the way a scrolling list would
    Browse {
        /// Number of pages to load
        #[arg(short, long, default_value = "3")]
        pages: u32,

        /// Retry failed loads instead of stopping
        #[arg(long)]
        retry: bool,

        /// Retries allowed per failed load
        #[arg(long, default_value = "2")]
        max_retries: u32,
    },

    /// Fetch a single page and print it
    Fetch {
        /// Page number
        #[arg(short, long, default_value = "1")]
        page: u32,
    },

    /// Print the effective configuration
    Config,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one message per line)
    Json,
    /// Human-readable output
    Pretty,
}
