//! CLI module
//!
//! Command-line interface for the product service and feed loader.
//!
//! # Commands
//!
//! - `serve` - Start the HTTP service
//! - `seed` - Insert the demo catalogue
//! - `browse` - Scroll through a running service until the feed ends

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
