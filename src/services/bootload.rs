//! Bootload orchestration for the selected board
//!
//! One download walks `Preparing -> Transferring -> Succeeded | Failed` and
//! always ends in the finalizer held by [`TransferScope`]: the progress
//! listener is detached, progress returns to zero, the bus is told the link
//! is connected again and the download overlay is hidden. The scope runs on
//! every exit path, including the download future being dropped mid-transfer.
//!
//! Progress events may fire on a transport thread. They are forwarded over a
//! channel and applied to the state by the download routine itself, so the
//! store keeps a single writer.

use log::{debug, error, info};
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::board::Board;
use crate::errors::{DeployError, Result};
use crate::host::WorkspaceState;
use crate::models::{Activity, Listener, Subscription};
use crate::services::activity::ActivityGuard;
use crate::services::store::DeviceStore;

/// How a download attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// Nothing was selected, or the source could not be retargeted
    Skipped,
    Succeeded,
    /// The transfer failed with the given detail
    Failed(String),
}

/// Terminal and close listeners left attached after a successful download.
pub(crate) struct TerminalSession {
    board: Arc<dyn Board>,
    subscriptions: Vec<Subscription>,
}

impl TerminalSession {
    fn detach(self) {
        for subscription in &self.subscriptions {
            self.board.remove_listener(subscription);
        }
        debug!(
            "Detached {} listener(s) from {}",
            self.subscriptions.len(),
            self.board.path()
        );
    }
}

/// Finalizer for one download.
struct TransferScope<'a> {
    store: &'a DeviceStore,
    progress: Option<(Arc<dyn Board>, Subscription)>,
}

impl<'a> TransferScope<'a> {
    fn new(store: &'a DeviceStore) -> Self {
        Self {
            store,
            progress: None,
        }
    }

    fn track_progress(&mut self, board: Arc<dyn Board>, subscription: Subscription) {
        self.progress = Some((board, subscription));
    }
}

impl Drop for TransferScope<'_> {
    fn drop(&mut self) {
        if let Some((board, subscription)) = self.progress.take() {
            board.remove_listener(&subscription);
        }
        self.store.update(|state| state.end_bootload());
        self.store.host.bus.connected();
        self.store.host.bus.hide_download();
    }
}

impl DeviceStore {
    /// Download the workspace content to the selected board.
    ///
    /// Returns [`DownloadOutcome::Skipped`] without touching anything when no
    /// board is selected. Transfer failures are reported through the notifier
    /// and come back as [`DownloadOutcome::Failed`], not as errors; only a
    /// concurrent scan or download is rejected with an error.
    pub async fn download(&self) -> Result<DownloadOutcome> {
        let guard = self.activity.try_acquire(Activity::Deploying)?;
        self.run_download(guard).await
    }

    pub(crate) async fn run_download(&self, _guard: ActivityGuard<'_>) -> Result<DownloadOutcome> {
        let Some(device) = self.snapshot().selected_device.clone() else {
            debug!("No board selected, nothing to download");
            return Ok(DownloadOutcome::Skipped);
        };

        let deployment_id = Uuid::new_v4();
        let WorkspaceState {
            content, filename, ..
        } = self.host.workspace.state();
        info!(
            "[{}] Downloading '{}' ({} bytes) to {} on {}",
            deployment_id,
            filename,
            content.len(),
            device.display_name(),
            device.path
        );

        let mut scope = TransferScope::new(self);

        // Preparing
        let board = match self.host.boards.get_board(&device) {
            Ok(board) => board,
            Err(e) => return Ok(self.report_failure(deployment_id, format!("{:#}", e))),
        };
        self.detach_terminal_session();

        let (progress_tx, mut progress_rx) = mpsc::unbounded_channel::<u8>();
        let subscription = board.on(Listener::progress(move |progress| {
            let _ = progress_tx.send(progress);
        }));
        scope.track_progress(board.clone(), subscription);
        self.update(|state| state.begin_bootload());

        // Transferring
        let result = {
            let mut transfer = board.bootload(&content);
            loop {
                tokio::select! {
                    biased;
                    Some(progress) = progress_rx.recv() => {
                        self.apply_progress(deployment_id, progress)
                    }
                    result = &mut transfer => break result,
                }
            }
        };
        while let Ok(progress) = progress_rx.try_recv() {
            self.apply_progress(deployment_id, progress);
        }

        let outcome = match result {
            Ok(()) => {
                self.host.bus.clear_output();
                self.attach_terminal_session(board);
                self.host.notifier.clear();
                self.host
                    .notifier
                    .success(&format!("'{}' downloaded successfully", filename));
                info!("[{}] Download complete", deployment_id);
                DownloadOutcome::Succeeded
            }
            Err(e) => self.report_failure(deployment_id, format!("{:#}", e)),
        };

        drop(scope);
        Ok(outcome)
    }

    fn apply_progress(&self, deployment_id: Uuid, progress: u8) {
        debug!("[{}] Progress {}%", deployment_id, progress);
        self.update(|state| state.set_progress(progress));
        self.host.bus.tx(progress);
    }

    fn report_failure(&self, deployment_id: Uuid, detail: String) -> DownloadOutcome {
        let err = DeployError::BootloadFailure(detail.clone());
        error!("[{}] {}", deployment_id, err);
        self.host.notifier.error(&err);
        DownloadOutcome::Failed(detail)
    }

    fn attach_terminal_session(&self, board: Arc<dyn Board>) {
        let bus = self.host.bus.clone();
        let output = board.on(Listener::terminal(move |line| bus.output(line)));
        let bus = self.host.bus.clone();
        let rx = board.on(Listener::terminal(move |line| bus.rx(line)));
        let bus = self.host.bus.clone();
        let close = board.on(Listener::close(move || bus.disconnected()));

        let previous = self.session().replace(TerminalSession {
            board,
            subscriptions: vec![output, rx, close],
        });
        if let Some(previous) = previous {
            previous.detach();
        }
    }

    fn detach_terminal_session(&self) {
        let previous = self.session().take();
        if let Some(previous) = previous {
            previous.detach();
        }
    }
}
