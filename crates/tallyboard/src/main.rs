//! Tallyboard command-line interface.

mod cli;

use clap::Parser;
use cli::{Cli, Commands, handle_fetch_command, handle_filters_command};
use tallyboard_client::ClientConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tallyboard=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = ClientConfig::load(cli.config.as_deref())?;

    let output = match cli.command {
        Commands::Fetch(args) => handle_fetch_command(&config, args).await?,
        Commands::Filters { url, filter } => {
            handle_filters_command(&config, &url, filter.as_deref()).await?
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
