//! CLI module
//!
//! Command-line interface for paging through a listing headlessly.
//!
//! # Commands
//!
//! - `browse` - Load pages the way a scrolling list would
//! - `fetch` - Fetch and print a single page
//! - `config` - Print the effective configuration

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::{BrowseOptions, BrowseReport, Runner, API_KEY_ENV};
