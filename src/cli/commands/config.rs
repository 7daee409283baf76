//! Config command implementation - write the default configuration

use anyhow::{Result, anyhow};
use std::path::PathBuf;

use crate::config::DeployConfig;

pub fn execute_config_command(output: Option<PathBuf>) -> Result<()> {
    let path = output
        .or_else(DeployConfig::default_path)
        .ok_or_else(|| anyhow!("Could not determine a configuration directory"))?;

    DeployConfig::default().save(&path)?;
    println!("📝 Wrote default configuration to {}", path.display());
    Ok(())
}
