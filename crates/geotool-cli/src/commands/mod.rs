//! Command implementations

mod capture;
mod captures;
mod config;
mod export;
mod load;
mod stats;
mod track;

use std::sync::Arc;

use crate::cli::{Cli, Commands};
use crate::config_loader;
use crate::output::OutputWriter;
use anyhow::Result;
use geotool_core::config::LayeredConfig;
use geotool_core::FieldSession;
use geotool_store::file::JsonFilePersistence;

/// Execute a CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    let output = OutputWriter::new(cli.json);
    let config = config_loader::load_config_with_overrides(cli.config.as_deref(), cli.data_file)?;

    match cli.command {
        Commands::Capture(args) => capture::execute(args, &config, &output).await,
        Commands::List => captures::list(&config, &output).await,
        Commands::Stats => stats::execute(&config, &output).await,
        Commands::Remove(args) => captures::remove(args, &config, &output).await,
        Commands::Export(args) => export::execute(args, &config, &output).await,
        Commands::Load(args) => load::execute(args, &output).await,
        Commands::Track(args) => track::execute(args, &config, &output).await,
        Commands::Clear(args) => captures::clear(args, &config, &output).await,
        Commands::Config => config::execute(&config, &output),
    }
}

/// Open the session stored in the configured data file
async fn open_session(config: &LayeredConfig) -> FieldSession {
    let persistence = JsonFilePersistence::new(config.data_file.value.clone());
    FieldSession::open(Arc::new(persistence)).await
}
