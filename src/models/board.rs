//! Device and scan-related data models

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Port patterns excluded from scans unless configuration says otherwise.
///
/// Bluetooth serial endpoints and the macOS call-out duplicates of every tty
/// never host a board.
pub const DEFAULT_REJECT_PATTERNS: &[&str] =
    &["Bluetooth-Incoming-Port", "Bluetooth-Modem", r"dev/cu\."];

/// Location of the target identifier literal inside the workspace source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetProgram {
    /// Raw byte offset of the first character of the identifier literal
    #[serde(rename = "TargetStart")]
    pub target_start: usize,
    /// Target identifier the source currently declares, if it was read
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

/// One candidate board discovered by a scan.
///
/// Devices are produced fresh by every scan and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    /// Transport address, unique per physical connection
    pub path: String,
    /// Declared device identifier; `None` for generic/unidentified ports
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Whether the device satisfies the source's declared target
    #[serde(rename = "match", default)]
    pub is_match: bool,
    /// Metadata about the program this device expects
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program: Option<TargetProgram>,
}

impl Device {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: None,
            is_match: false,
            program: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn matched(mut self, is_match: bool) -> Self {
        self.is_match = is_match;
        self
    }

    pub fn with_program(mut self, program: TargetProgram) -> Self {
        self.program = Some(program);
        self
    }

    /// A device counts as identified when it reports a nonempty name.
    pub fn is_identified(&self) -> bool {
        self.name.as_deref().is_some_and(|name| !name.is_empty())
    }

    /// Name for logs and listings.
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => "(unidentified)",
        }
    }
}

/// [`DEFAULT_REJECT_PATTERNS`], compiled.
pub fn default_rejects() -> Vec<Regex> {
    DEFAULT_REJECT_PATTERNS
        .iter()
        .filter_map(|pattern| Regex::new(pattern).ok())
        .collect()
}

/// Options handed to the host scan primitive.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Transport paths matching any of these are excluded
    pub reject: Vec<Regex>,
    /// Current workspace content, used to compute the match criterion
    pub source: String,
}

impl ScanOptions {
    pub fn new(reject: Vec<Regex>, source: impl Into<String>) -> Self {
        Self {
            reject,
            source: source.into(),
        }
    }

    /// Options using [`DEFAULT_REJECT_PATTERNS`].
    pub fn with_default_rejects(source: impl Into<String>) -> Self {
        Self::new(default_rejects(), source)
    }

    pub fn is_rejected(&self, path: &str) -> bool {
        self.reject.iter().any(|pattern| pattern.is_match(path))
    }
}
