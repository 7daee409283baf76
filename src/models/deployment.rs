//! Deployment state shared with observers
//!
//! The store publishes an immutable [`DeploymentState`] after every transition.
//! `searching`, `progress` and `message` are not stored as independent flags;
//! they are derived from the current [`Phase`], which rules out combinations
//! such as a scan and a transfer being reported at the same time.

use serde::Serialize;
use std::fmt;

use crate::models::board::Device;

/// Disambiguation or error outcome shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DeviceMessage {
    /// No scanned device reported a name
    NoDevicesFound,
    /// Named devices exist but none matches the source's target
    NoMatchingDevice,
    /// More than one device matches; the user has to pick
    MultipleMatches,
    /// The scan itself failed
    ScanFailed,
}

impl fmt::Display for DeviceMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceMessage::NoDevicesFound => write!(f, "No boards found."),
            DeviceMessage::NoMatchingDevice => write!(f, "No matching boards found."),
            DeviceMessage::MultipleMatches => {
                write!(f, "Please select which board to download to.")
            }
            DeviceMessage::ScanFailed => write!(f, "Unable to scan for boards."),
        }
    }
}

/// Current phase of the device store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Phase {
    Idle,
    Scanning,
    AwaitingSelection(DeviceMessage),
    /// Transfer running, with the last reported percentage
    Bootloading(u8),
    /// Scan failure with its detail
    Errored(String),
}

/// Which long-running operation currently owns the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Activity {
    Scanning,
    Deploying,
}

/// Result of classifying a device list.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub message: Option<DeviceMessage>,
    pub candidate: Option<Device>,
}

/// Snapshot of everything the rendering layer observes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeploymentState {
    /// Automatic selection and download after a scan
    pub auto: bool,
    /// Result of the most recent scan
    pub devices: Vec<Device>,
    pub device_path: Option<String>,
    pub selected_device: Option<Device>,
    pub phase: Phase,
}

impl Default for DeploymentState {
    fn default() -> Self {
        Self {
            auto: true,
            devices: Vec::new(),
            device_path: None,
            selected_device: None,
            phase: Phase::Idle,
        }
    }
}

impl DeploymentState {
    pub fn searching(&self) -> bool {
        matches!(self.phase, Phase::Scanning)
    }

    pub fn progress(&self) -> u8 {
        match self.phase {
            Phase::Bootloading(progress) => progress,
            _ => 0,
        }
    }

    pub fn message(&self) -> Option<DeviceMessage> {
        match self.phase {
            Phase::AwaitingSelection(message) => Some(message),
            Phase::Errored(_) => Some(DeviceMessage::ScanFailed),
            _ => None,
        }
    }

    pub fn error_detail(&self) -> Option<&str> {
        match &self.phase {
            Phase::Errored(detail) => Some(detail),
            _ => None,
        }
    }

    pub fn is_bootloading(&self) -> bool {
        matches!(self.phase, Phase::Bootloading(_))
    }

    pub(crate) fn begin_scan(&mut self) {
        self.device_path = None;
        self.phase = Phase::Scanning;
    }

    pub(crate) fn finish_scan(&mut self, devices: Vec<Device>) {
        self.devices = devices;
        self.phase = Phase::Idle;
    }

    /// A failed scan cannot vouch for the previous selection, so it is dropped.
    pub(crate) fn fail_scan(&mut self, detail: String) {
        self.device_path = None;
        self.selected_device = None;
        self.phase = Phase::Errored(detail);
    }

    /// Settle a scan that ended without a result.
    pub(crate) fn abandon_scan(&mut self) {
        if let Phase::Scanning = self.phase {
            self.fail_scan("scan cancelled".to_string());
        }
    }

    pub(crate) fn apply_classification(&mut self, classification: Classification) {
        match (classification.message, classification.candidate) {
            (None, Some(candidate)) => {
                self.device_path = Some(candidate.path.clone());
                self.selected_device = Some(candidate);
                self.phase = Phase::Idle;
            }
            (Some(message), _) => {
                self.selected_device = None;
                self.phase = Phase::AwaitingSelection(message);
            }
            (None, None) => {
                self.selected_device = None;
                self.phase = Phase::Idle;
            }
        }
    }

    pub(crate) fn select(&mut self, device: Device) {
        self.device_path = Some(device.path.clone());
        self.selected_device = Some(device);
        self.phase = Phase::Idle;
    }

    pub(crate) fn begin_bootload(&mut self) {
        self.phase = Phase::Bootloading(0);
    }

    /// Progress outside of a transfer is dropped.
    pub(crate) fn set_progress(&mut self, progress: u8) {
        if let Phase::Bootloading(_) = self.phase {
            self.phase = Phase::Bootloading(progress.min(100));
        }
    }

    pub(crate) fn end_bootload(&mut self) {
        if let Phase::Bootloading(_) = self.phase {
            self.phase = Phase::Idle;
        }
    }
}
