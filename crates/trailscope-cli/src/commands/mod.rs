//! Command implementations

mod config;
mod crossing;
mod normalize;
mod proximity;
mod search;
mod statistics;

use crate::cli::{Cli, Commands};
use crate::output::OutputWriter;
use crate::storage;
use anyhow::{anyhow, Context, Result};
use serde_json::Value;
use std::path::Path;
use trailscope_api::error::ApiError;

/// Execute a CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    let output = OutputWriter::new(cli.json);

    match &cli.command {
        Commands::Normalize(args) => return normalize::execute(args, &output),
        Commands::Config => {
            let config = storage::load_query_config(&cli)?;
            return config::execute(&config, &output);
        }
        _ => {}
    }

    let config = storage::load_query_config(&cli)?;
    let state = storage::open_state(&cli, &config).await?;

    match &cli.command {
        Commands::Search(args) => search::execute(args, &state, &output).await,
        Commands::Nearest(args) => proximity::nearest(args, &state, &output).await,
        Commands::Radius(args) => proximity::radius(args, &state, &output).await,
        Commands::Pois(args) => proximity::pois(args, &state, &output).await,
        Commands::Bbox(args) => proximity::bbox(args, &state, &output).await,
        Commands::Crossing(args) => crossing::execute(args, &state, &output).await,
        Commands::Stats => statistics::trails(&state, &output).await,
        Commands::Analytics(args) => statistics::analytics(args, &state, &output).await,
        Commands::Normalize(_) | Commands::Config => Ok(()),
    }
}

/// Read a JSON payload file
fn read_payload(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("{} does not contain valid JSON", path.display()))
}

/// Flatten an API error into `message: details`
fn to_anyhow(err: ApiError) -> anyhow::Error {
    match err.details {
        Some(details) => anyhow!("{}: {}", err.message, details),
        None => anyhow!("{}", err.message),
    }
}
