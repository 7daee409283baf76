//! Board capabilities consumed by the deployment core
//!
//! The serial/USB transport itself lives outside this crate. A host supplies
//! implementations of these traits; the core only attaches listeners, starts
//! transfers and reacts to their outcome.

pub mod listeners;

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

use crate::models::{Device, Listener, ScanOptions, Subscription};

pub use listeners::BoardListeners;

/// One connected board: an event source plus a firmware transfer.
///
/// Implementations may emit events from any thread.
#[async_trait]
pub trait Board: Send + Sync {
    /// Transport address of this board
    fn path(&self) -> &str;

    /// Attach a listener; the returned subscription detaches it again.
    fn on(&self, listener: Listener) -> Subscription;

    /// Detach a listener, returning `false` if it was not attached.
    fn remove_listener(&self, subscription: &Subscription) -> bool;

    /// Transfer `content` to the board, emitting progress while it runs.
    async fn bootload(&self, content: &str) -> Result<()>;
}

/// Host primitive enumerating candidate boards.
#[async_trait]
pub trait ScanBoards: Send + Sync {
    async fn scan_boards(&self, options: &ScanOptions) -> Result<Vec<Device>>;
}

/// Host primitive handing out the board handle behind a scanned device.
pub trait BoardProvider: Send + Sync {
    fn get_board(&self, device: &Device) -> Result<Arc<dyn Board>>;
}
