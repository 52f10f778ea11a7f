//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the tallyboard binary.

mod commands;
mod fetch;
mod filters;

pub use commands::{Cli, Commands, FetchArgs};
pub use fetch::handle_fetch_command;
pub use filters::handle_filters_command;
