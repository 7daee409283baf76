//! Custom error types for board-deploy

use std::fmt;

use crate::models::Activity;

/// Main error type for deployment operations
#[derive(Debug)]
pub enum DeployError {
    /// The host scan primitive rejected
    ScanFailure(String),
    /// The board transfer rejected
    BootloadFailure(String),
    /// A deployment is already running
    DeploymentInProgress,
    /// A device scan is already running
    ScanInProgress,
    /// The target directive in the source could not be rewritten
    Patch(String),
    /// Configuration related errors
    Config(String),
    /// General I/O errors
    Io(std::io::Error),
    /// Serialization errors
    Serialization(String),
}

impl DeployError {
    /// Rejection matching whichever activity currently holds the store.
    pub fn busy(activity: Activity) -> Self {
        match activity {
            Activity::Scanning => DeployError::ScanInProgress,
            Activity::Deploying => DeployError::DeploymentInProgress,
        }
    }
}

impl fmt::Display for DeployError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeployError::ScanFailure(msg) => write!(f, "Device scan failed: {}", msg),
            DeployError::BootloadFailure(msg) => write!(f, "Download failed: {}", msg),
            DeployError::DeploymentInProgress => write!(f, "A download is already in progress"),
            DeployError::ScanInProgress => write!(f, "A device scan is already in progress"),
            DeployError::Patch(msg) => write!(f, "Unable to retarget source: {}", msg),
            DeployError::Config(msg) => write!(f, "Configuration error: {}", msg),
            DeployError::Io(err) => write!(f, "I/O error: {}", err),
            DeployError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for DeployError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DeployError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for DeployError {
    fn from(err: std::io::Error) -> Self {
        DeployError::Io(err)
    }
}

impl From<serde_json::Error> for DeployError {
    fn from(err: serde_json::Error) -> Self {
        DeployError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for DeployError {
    fn from(err: toml::de::Error) -> Self {
        DeployError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for DeployError {
    fn from(err: toml::ser::Error) -> Self {
        DeployError::Serialization(err.to_string())
    }
}

impl From<regex::Error> for DeployError {
    fn from(err: regex::Error) -> Self {
        DeployError::Config(format!("invalid reject pattern: {}", err))
    }
}

/// Result type alias for deployment operations
pub type Result<T> = std::result::Result<T, DeployError>;
