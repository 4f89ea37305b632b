//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Paginated product service and incremental feed loader
#[derive(Parser, Debug)]
#[command(name = "scrollfeed")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "pretty")]
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
    /// Start the product service
    Serve {
        /// Address to bind
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// DuckDB database file (`:memory:` for a throwaway store)
        #[arg(long)]
        database: Option<String>,
    },

    /// Insert the demo catalogue
    Seed {
        /// Number of products to insert
        #[arg(short = 'n', long)]
        count: Option<usize>,

        /// DuckDB database file
        #[arg(long)]
        database: Option<String>,
    },

    /// Scroll through a running service until the feed ends
    Browse {
        /// Service base URL
        #[arg(short, long)]
        url: Option<String>,

        /// Items per page
        #[arg(long)]
        page_size: Option<u32>,

        /// Case-insensitive name pattern
        #[arg(short, long)]
        query: Option<String>,

        /// Stop after this many pages even if more are available
        #[arg(long)]
        max_pages: Option<usize>,

        /// Minimum milliseconds between scroll evaluations
        #[arg(long)]
        throttle_ms: Option<u64>,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one message per line)
    Json,
    /// Human-readable output
    Pretty,
}
