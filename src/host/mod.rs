//! Host-side collaborators of the device store
//!
//! Workspace content, the document store, the notification surface and the
//! transmission/console bus all belong to the surrounding editor. The store
//! only talks to them through these traits.

pub mod serial;

use std::path::PathBuf;
use std::sync::Arc;

use crate::board::{BoardProvider, ScanBoards};
use crate::errors::DeployError;

pub use serial::SerialScanner;

/// What the workspace currently holds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkspaceState {
    pub cwd: PathBuf,
    pub content: String,
    pub filename: String,
}

pub trait Workspace: Send + Sync {
    fn state(&self) -> WorkspaceState;
    fn update_content(&self, content: String);
}

pub trait Documents: Send + Sync {
    fn update(&self, source: &str);
}

/// Toast-style user notifications.
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, error: &DeployError);
    fn clear(&self);
}

/// Transmission, console and overlay signals.
pub trait EventBus: Send + Sync {
    fn connected(&self);
    fn disconnected(&self);
    fn rx(&self, line: &str);
    fn tx(&self, progress: u8);
    fn output(&self, line: &str);
    fn clear_output(&self);
    fn show_download(&self);
    fn hide_download(&self);
}

/// Everything the device store needs from its host.
#[derive(Clone)]
pub struct HostServices {
    pub scanner: Arc<dyn ScanBoards>,
    pub boards: Arc<dyn BoardProvider>,
    pub workspace: Arc<dyn Workspace>,
    pub documents: Arc<dyn Documents>,
    pub notifier: Arc<dyn Notifier>,
    pub bus: Arc<dyn EventBus>,
}
