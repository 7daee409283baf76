//! Command Line Interface module
//!
//! Argument parsing, the file-backed host and the command implementations.

pub mod args;
pub mod commands;
pub mod host;

pub use args::*;

use anyhow::Result;

use crate::config::DeployConfig;
use crate::utils::logging;

/// Main CLI application runner
pub async fn run() -> Result<()> {
    let cli = Cli::parse_args();
    let config = match &cli.command {
        // Writing a fresh configuration must not depend on reading one
        Commands::Config { .. } => DeployConfig::default(),
        _ => DeployConfig::load_or_default(cli.config.as_deref())?,
    };

    if config.logging.structured {
        logging::init_structured_logging(
            logging::parse_level(&config.logging.level),
            config.logging.file.as_deref(),
        )?;
    } else {
        logging::init_cli_logging(cli.verbose, cli.quiet)?;
    }

    commands::execute_command(cli.command.clone(), &cli, &config).await
}
