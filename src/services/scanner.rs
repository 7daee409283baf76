//! Device scanner service wrapping the host scan primitive

use log::{debug, info};
use std::sync::Arc;

use crate::board::ScanBoards;
use crate::errors::{DeployError, Result};
use crate::models::{Device, ScanOptions};

/// Runs the host scan and normalizes its failures.
///
/// Exclusion patterns are applied by the scan primitive; results are not
/// filtered a second time here.
#[derive(Clone)]
pub struct DeviceScanner {
    host: Arc<dyn ScanBoards>,
}

impl DeviceScanner {
    pub fn new(host: Arc<dyn ScanBoards>) -> Self {
        Self { host }
    }

    pub async fn scan(&self, options: &ScanOptions) -> Result<Vec<Device>> {
        info!(
            "Scanning for boards ({} reject pattern(s))",
            options.reject.len()
        );

        let devices = self
            .host
            .scan_boards(options)
            .await
            .map_err(|e| DeployError::ScanFailure(format!("{:#}", e)))?;

        info!("Scan complete. Found {} device(s)", devices.len());
        for device in &devices {
            debug!(
                "  {} [{}] match={}",
                device.path,
                device.display_name(),
                device.is_match
            );
        }

        Ok(devices)
    }
}
