//! Retarget command implementation - rewrite a source file's target directive

use anyhow::{Context, Result, bail};
use log::info;
use std::path::Path;

use crate::config::DeployConfig;
use crate::models::Device;
use crate::services::patcher;

/// Rewrite the directive target of `source` to `target`, in place.
pub fn execute_retarget_command(source: &Path, target: &str, config: &DeployConfig) -> Result<()> {
    let content = std::fs::read_to_string(source)
        .with_context(|| format!("Failed to read source file {}", source.display()))?;

    let patched = retarget_content(&content, target, &config.scan.directive)?;
    if patched == content {
        println!("{} already targets {}", source.display(), target);
        return Ok(());
    }

    std::fs::write(source, &patched)
        .with_context(|| format!("Failed to write source file {}", source.display()))?;
    info!("Retargeted {} to {}", source.display(), target);
    println!("✅ {} now targets {}", source.display(), target);
    Ok(())
}

/// Source text with the `keyword` directive pointing at `target`.
pub fn retarget_content(content: &str, target: &str, keyword: &str) -> Result<String> {
    let Some(directive) = patcher::find_directive(content, keyword) else {
        bail!("no {{{} ...}} directive found", keyword);
    };

    let device = Device::new("-")
        .with_name(target)
        .with_program(directive.to_program());
    Ok(patcher::retarget(content, &device)?)
}
