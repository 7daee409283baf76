//! Board scanning over local serial ports

use anyhow::Result;
use async_trait::async_trait;
use log::{debug, info};
use serialport::{SerialPortInfo, SerialPortType};
use std::collections::HashMap;

use crate::board::ScanBoards;
use crate::config::ScanConfig;
use crate::models::{Device, ScanOptions};
use crate::services::patcher::{self, TargetDirective};

/// Scan primitive enumerating serial ports on this machine.
///
/// Ports cannot describe which board sits behind them, so names come from the
/// configured port mappings. A named port matches when its name equals the
/// target declared by the source directive.
#[derive(Debug, Clone)]
pub struct SerialScanner {
    board_mappings: HashMap<String, String>,
    directive: String,
}

impl SerialScanner {
    pub fn new(board_mappings: HashMap<String, String>, directive: impl Into<String>) -> Self {
        Self {
            board_mappings,
            directive: directive.into(),
        }
    }

    pub fn from_config(config: &ScanConfig) -> Self {
        Self::new(config.board_mappings.clone(), config.directive.clone())
    }

    /// Turn enumerated ports into devices for the given scan options.
    pub fn devices_from_ports(&self, ports: Vec<SerialPortInfo>, options: &ScanOptions) -> Vec<Device> {
        let directive = patcher::find_directive(&options.source, &self.directive);
        match &directive {
            Some(found) => debug!("Source declares target '{}'", found.declared_target()),
            None => debug!("Source declares no {} directive", self.directive),
        }

        ports
            .into_iter()
            .filter(|port| {
                let rejected = options.is_rejected(&port.port_name);
                if rejected {
                    debug!("Skipping rejected port {}", port.port_name);
                }
                !rejected
            })
            .map(|port| {
                debug!("  🔌 {} ({})", port.port_name, describe_port(&port.port_type));
                self.device_for(port.port_name, directive.as_ref())
            })
            .collect()
    }

    fn device_for(&self, path: String, directive: Option<&TargetDirective>) -> Device {
        let name = self.board_mappings.get(&path).cloned();
        let is_match = match (&name, directive) {
            (Some(name), Some(directive)) => directive.declared_target().eq_ignore_ascii_case(name),
            _ => false,
        };

        let mut device = Device::new(path).matched(is_match);
        device.name = name;
        device.program = directive.map(TargetDirective::to_program);
        device
    }
}

#[async_trait]
impl ScanBoards for SerialScanner {
    async fn scan_boards(&self, options: &ScanOptions) -> Result<Vec<Device>> {
        let ports = tokio::task::spawn_blocking(serialport::available_ports).await??;
        info!("📡 Found {} serial port(s)", ports.len());
        Ok(self.devices_from_ports(ports, options))
    }
}

/// Short human-readable description of a port's transport.
pub fn describe_port(port_type: &SerialPortType) -> String {
    match port_type {
        SerialPortType::UsbPort(usb) => format!(
            "{} - {} [{:04x}:{:04x}]",
            usb.manufacturer.as_deref().unwrap_or("Unknown Manufacturer"),
            usb.product.as_deref().unwrap_or("USB Serial Device"),
            usb.vid,
            usb.pid
        ),
        SerialPortType::PciPort => "PCI Serial Port".to_string(),
        SerialPortType::BluetoothPort => "Bluetooth Serial Port".to_string(),
        SerialPortType::Unknown => "Unknown Serial Port".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn port(name: &str) -> SerialPortInfo {
        SerialPortInfo {
            port_name: name.to_string(),
            port_type: SerialPortType::Unknown,
        }
    }

    fn scanner() -> SerialScanner {
        let mut mappings = HashMap::new();
        mappings.insert("/dev/ttyUSB0".to_string(), "BS2".to_string());
        mappings.insert("/dev/ttyUSB1".to_string(), "BS2sx".to_string());
        SerialScanner::new(mappings, "$STAMP")
    }

    #[test]
    fn test_devices_named_and_matched_from_directive() {
        let options = ScanOptions::with_default_rejects("' {$STAMP bs2}\nDEBUG \"hi\"");
        let devices = scanner().devices_from_ports(
            vec![port("/dev/ttyUSB0"), port("/dev/ttyUSB1"), port("/dev/ttyS0")],
            &options,
        );

        assert_eq!(devices.len(), 3);
        assert_eq!(devices[0].name.as_deref(), Some("BS2"));
        assert!(devices[0].is_match);
        assert_eq!(devices[1].name.as_deref(), Some("BS2sx"));
        assert!(!devices[1].is_match);
        assert_eq!(devices[2].name, None);
        assert!(!devices[2].is_match);

        let program = devices[0].program.as_ref().unwrap();
        assert_eq!(program.target_start, 10);
        assert_eq!(program.target.as_deref(), Some("bs2"));
    }

    #[test]
    fn test_rejected_ports_are_dropped() {
        let options = ScanOptions::with_default_rejects("{$STAMP BS2}");
        let devices = scanner().devices_from_ports(
            vec![
                port("/dev/cu.Bluetooth-Incoming-Port"),
                port("/dev/cu.usbserial-A1"),
                port("/dev/ttyUSB0"),
            ],
            &options,
        );

        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].path, "/dev/ttyUSB0");
    }

    #[test]
    fn test_source_without_directive_matches_nothing() {
        let options = ScanOptions::with_default_rejects("DEBUG \"hi\"");
        let devices = scanner().devices_from_ports(vec![port("/dev/ttyUSB0")], &options);

        assert_eq!(devices[0].name.as_deref(), Some("BS2"));
        assert!(!devices[0].is_match);
        assert_eq!(devices[0].program, None);
    }

    #[test]
    fn test_describe_port() {
        assert_eq!(describe_port(&SerialPortType::PciPort), "PCI Serial Port");
    }
}
