//! Services module containing the deployment core
//!
//! Scanning, classification and source retargeting are small units with no
//! shared state; the [`DeviceStore`] ties them together and owns the
//! published [`DeploymentState`](crate::models::DeploymentState).

pub mod activity;
pub mod bootload;
pub mod matcher;
pub mod patcher;
pub mod scanner;
pub mod store;

pub use bootload::DownloadOutcome;
pub use matcher::{classify, should_auto_download};
pub use scanner::DeviceScanner;
pub use store::DeviceStore;
