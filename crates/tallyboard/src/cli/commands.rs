//! CLI argument definitions.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Browse leaderboard collections from the command line.
#[derive(Parser, Debug)]
#[command(name = "tallyboard")]
#[command(about = "Query paginated leaderboard collections", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML config file (defaults to the user config directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch one page of a collection and print it as JSON
    Fetch(FetchArgs),

    /// Print the filter option groups served at an endpoint
    Filters {
        /// Endpoint name or URL of the filter options
        #[arg(long)]
        url: String,

        /// Active filter expression whose selected options to mark
        #[arg(long)]
        filter: Option<String>,
    },
}

/// Sort direction as spelled on the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderArg {
    /// Smallest first
    Asc,
    /// Largest first
    Desc,
}

/// Arguments of `tallyboard fetch`.
#[derive(clap::Args, Debug)]
pub struct FetchArgs {
    /// Collection: accounts, artifacts, leaderboards, builds, or a URL/path
    #[arg(short, long)]
    pub endpoint: String,

    /// Sort field (dotted paths allowed)
    #[arg(long)]
    pub sort: Option<String>,

    /// Sort direction
    #[arg(long, value_enum)]
    pub order: Option<OrderArg>,

    /// One-based page number
    #[arg(long)]
    pub page: Option<u32>,

    /// Rows per page
    #[arg(long)]
    pub size: Option<u32>,

    /// Filter pill as name=value (repeatable, order preserved)
    #[arg(long = "filter", value_name = "NAME=VALUE")]
    pub filters: Vec<String>,

    /// Fixed fetch parameter as key=value (repeatable)
    #[arg(long = "param", value_name = "KEY=VALUE")]
    pub params: Vec<String>,

    /// Raw query string to start from, as copied from a bookmarked URL
    #[arg(long)]
    pub query: Option<String>,

    /// Return no rows instead of fetching when uids/uid are empty
    #[arg(long)]
    pub ignore_empty_uids: bool,
}
