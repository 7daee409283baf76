//! Host services backed by a source file and the terminal
//!
//! The command line has no board transport, so the board provider refuses
//! every request. Scanning and classification still run through the regular
//! device store.

use anyhow::{Context, Result, anyhow};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use crate::board::{Board, BoardProvider};
use crate::config::DeployConfig;
use crate::errors::DeployError;
use crate::host::{
    Documents, EventBus, HostServices, Notifier, SerialScanner, Workspace, WorkspaceState,
};
use crate::models::Device;

/// Workspace holding a single source file. Document updates are written back
/// to that file.
pub struct FileWorkspace {
    path: PathBuf,
    state: Mutex<WorkspaceState>,
}

impl FileWorkspace {
    pub fn open(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read source file {}", path.display()))?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let cwd = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(Self {
            path: path.to_path_buf(),
            state: Mutex::new(WorkspaceState {
                cwd,
                content,
                filename,
            }),
        })
    }
}

impl Workspace for FileWorkspace {
    fn state(&self) -> WorkspaceState {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn update_content(&self, content: String) {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .content = content;
    }
}

impl Documents for FileWorkspace {
    fn update(&self, source: &str) {
        match std::fs::write(&self.path, source) {
            Ok(()) => info!("Saved {}", self.path.display()),
            Err(e) => error!("Failed to write {}: {}", self.path.display(), e),
        }
    }
}

/// Notifications go to the log.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn success(&self, message: &str) {
        info!("✅ {}", message);
    }

    fn error(&self, error: &DeployError) {
        error!("❌ {}", error);
    }

    fn clear(&self) {}
}

/// Bus signals go to the log.
pub struct LogBus;

impl EventBus for LogBus {
    fn connected(&self) {
        debug!("Link connected");
    }

    fn disconnected(&self) {
        debug!("Link disconnected");
    }

    fn rx(&self, line: &str) {
        debug!("rx: {}", line);
    }

    fn tx(&self, progress: u8) {
        debug!("tx: {}%", progress);
    }

    fn output(&self, line: &str) {
        println!("{}", line);
    }

    fn clear_output(&self) {}

    fn show_download(&self) {}

    fn hide_download(&self) {}
}

/// Board provider for hosts without a transport.
pub struct NoTransport;

impl BoardProvider for NoTransport {
    fn get_board(&self, device: &Device) -> Result<Arc<dyn Board>> {
        warn!("No board transport available for {}", device.path);
        Err(anyhow!("no board transport available for {}", device.path))
    }
}

/// Host services for the given source file.
pub fn file_host(source: &Path, config: &DeployConfig) -> Result<HostServices> {
    let workspace = Arc::new(FileWorkspace::open(source)?);
    Ok(HostServices {
        scanner: Arc::new(SerialScanner::from_config(&config.scan)),
        boards: Arc::new(NoTransport),
        workspace: workspace.clone(),
        documents: workspace,
        notifier: Arc::new(LogNotifier),
        bus: Arc::new(LogBus),
    })
}
