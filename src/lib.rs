//! board-deploy - board discovery and firmware download orchestration
//!
//! A [`DeviceStore`] scans for connected boards, matches them against the
//! target a source file declares and downloads the source to the chosen
//! board. Boards, the scan primitive and the editor surfaces are supplied by
//! the host through the traits in [`board`] and [`host`].

pub mod board;
pub mod cli;
pub mod config;
pub mod errors;
pub mod host;
pub mod models;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use board::{Board, BoardListeners, BoardProvider, ScanBoards};
pub use config::DeployConfig;
pub use errors::*;
pub use host::HostServices;
pub use models::*;
pub use services::{DeviceStore, DownloadOutcome};

/// board-deploy version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// board-deploy application name
pub const APP_NAME: &str = "board-deploy";
