//! Scan command implementation - classify connected boards against a source file

use anyhow::Result;
use log::info;
use std::path::Path;

use crate::cli::host::file_host;
use crate::config::DeployConfig;
use crate::models::DeploymentState;
use crate::services::DeviceStore;

/// Scan serial ports, classify them and print the outcome.
///
/// Automatic download is switched off: the command line has no transport.
pub async fn execute_scan_command(source: &Path, json: bool, config: &DeployConfig) -> Result<()> {
    info!("Scanning for boards targeted by {}", source.display());

    let store = DeviceStore::with_config(file_host(source, config)?, config)?;
    store.disable_auto();
    store.reload_devices().await?;
    store.classify_devices();

    let state = store.snapshot();
    if json {
        println!("{}", serde_json::to_string_pretty(&*state)?);
    } else {
        print!("{}", render_state(&state));
    }
    Ok(())
}

/// Human-readable listing of a classified state.
pub fn render_state(state: &DeploymentState) -> String {
    let mut out = String::new();

    if state.devices.is_empty() {
        out.push_str("⚠️  No serial ports detected\n");
    } else {
        out.push_str("🔍 Detected Boards:\n");
        for device in &state.devices {
            let marker = if device.is_match { "✅" } else { "  " };
            out.push_str(&format!(
                "{} {:<24} {}\n",
                marker,
                device.path,
                device.display_name()
            ));
        }
    }

    match (state.message(), &state.selected_device) {
        (Some(message), _) => out.push_str(&format!("\n{}\n", message)),
        (None, Some(device)) => out.push_str(&format!(
            "\nTarget board: {} on {}\n",
            device.display_name(),
            device.path
        )),
        (None, None) => {}
    }
    out
}
