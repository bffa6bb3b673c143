mod fetch;
mod filter;
mod run;
mod tiers;

use crate::cli::{Cli, Commands};
use crate::output::OutputWriter;
use anyhow::{Context, Result};
use floodline_core::config::PipelineConfig;

pub async fn execute(cli: Cli) -> Result<()> {
    let output = OutputWriter::new(cli.json);

    let config = match &cli.config {
        Some(path) => PipelineConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => PipelineConfig::default(),
    };

    match cli.command {
        Commands::Fetch(args) => fetch::execute(args, &config, &output).await,
        Commands::Filter(args) => filter::execute(args, &config, &output),
        Commands::Tiers(args) => tiers::execute(args, &config, &output),
        Commands::Run(args) => run::execute(args, &config, &output).await,
    }
}
