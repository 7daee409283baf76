//! Application configuration management

use log::{debug, info};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::errors::{DeployError, Result};
use crate::models::{DEFAULT_REJECT_PATTERNS, ScanOptions};
use crate::services::patcher::DEFAULT_DIRECTIVE;

/// Main application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeployConfig {
    /// Select and download automatically after a scan
    pub auto: bool,
    /// Scan configuration
    pub scan: ScanConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Scan-related configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Regex patterns for transport paths that are never boards
    pub reject: Vec<String>,
    /// Declared board name per port path
    pub board_mappings: HashMap<String, String>,
    /// Keyword of the source directive declaring the target board
    pub directive: String,
}

/// Logging-related configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub structured: bool,
    /// Optional log file for structured output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            auto: true,
            scan: ScanConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            reject: DEFAULT_REJECT_PATTERNS
                .iter()
                .map(|pattern| pattern.to_string())
                .collect(),
            board_mappings: HashMap::new(),
            directive: DEFAULT_DIRECTIVE.to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            structured: false,
            file: None,
        }
    }
}

impl DeployConfig {
    /// Default configuration file location
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("board-deploy").join("config.toml"))
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: DeployConfig = toml::from_str(&content)?;
        config.scan.compile_rejects()?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load the explicit file if given, else the default location if present,
    /// else the built-in defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }

        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => {
                debug!("No configuration file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Write this configuration as pretty TOML
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        info!("Wrote configuration to {}", path.display());
        Ok(())
    }

    /// Scan options for the given workspace source
    pub fn scan_options(&self, source: impl Into<String>) -> Result<ScanOptions> {
        Ok(ScanOptions::new(self.scan.compile_rejects()?, source))
    }
}

impl ScanConfig {
    pub fn compile_rejects(&self) -> Result<Vec<Regex>> {
        self.reject
            .iter()
            .map(|pattern| Regex::new(pattern).map_err(DeployError::from))
            .collect()
    }
}
