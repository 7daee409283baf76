//! Classification of scan results
//!
//! A board is only ever picked automatically when exactly one device matches
//! the source's declared target. Several matches always defer to the user.

use log::debug;

use crate::models::{Classification, Device, DeviceMessage};

/// Classify a device list into a message and an optional candidate.
pub fn classify(devices: &[Device]) -> Classification {
    let exists = devices.iter().any(Device::is_identified);
    let matched: Vec<&Device> = devices.iter().filter(|device| device.is_match).collect();

    debug!(
        "Classifying {} device(s): identified={}, matched={}",
        devices.len(),
        exists,
        matched.len()
    );

    if !exists {
        return Classification {
            message: Some(DeviceMessage::NoDevicesFound),
            candidate: None,
        };
    }

    match matched.as_slice() {
        [] => Classification {
            message: Some(DeviceMessage::NoMatchingDevice),
            candidate: None,
        },
        [single] => Classification {
            message: None,
            candidate: Some((*single).clone()),
        },
        _ => Classification {
            message: Some(DeviceMessage::MultipleMatches),
            candidate: None,
        },
    }
}

/// Whether a classification should start a download on its own.
pub fn should_auto_download(classification: &Classification, auto: bool) -> bool {
    auto && classification.message.is_none() && classification.candidate.is_some()
}
