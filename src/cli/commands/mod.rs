//! CLI command implementations

pub mod config;
pub mod retarget;
pub mod scan;

use crate::cli::args::{Cli, Commands};
use crate::config::DeployConfig;
use anyhow::Result;

/// Execute a CLI command
pub async fn execute_command(command: Commands, cli: &Cli, config: &DeployConfig) -> Result<()> {
    match command {
        Commands::Scan { source, json } => scan::execute_scan_command(&source, json, config).await,
        Commands::Retarget { source, target } => {
            retarget::execute_retarget_command(&source, &target, config)
        }
        Commands::Config { output } => {
            config::execute_config_command(output.or_else(|| cli.config.clone()))
        }
    }
}
