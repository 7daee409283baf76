//! Device store: scan, classification and selection
//!
//! The store is the single writer of [`DeploymentState`]. Every transition
//! builds a new state value and publishes it through a `watch` channel, so
//! observers only ever see complete snapshots.
//!
//! ```text
//!   reload_devices ──> scan ──(auto)──> classify ──(one match)──> download
//!                                          │
//!   select(device) ──(NoMatchingDevice)──> retarget source ──> download
//! ```

use log::{error, info, warn};
use regex::Regex;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;

use crate::config::DeployConfig;
use crate::errors::{DeployError, Result};
use crate::host::HostServices;
use crate::models::{
    Activity, Classification, DeploymentState, Device, DeviceMessage, ScanOptions, default_rejects,
};
use crate::services::activity::{ActivityGuard, ActivityLock};
use crate::services::bootload::{DownloadOutcome, TerminalSession};
use crate::services::{matcher, patcher, scanner::DeviceScanner};

/// Settles the phase of a scan that is dropped before it finishes, then
/// releases the activity.
struct ScanScope<'a> {
    store: &'a DeviceStore,
    _guard: ActivityGuard<'a>,
}

impl Drop for ScanScope<'_> {
    fn drop(&mut self) {
        if self.store.snapshot().searching() {
            self.store.update(|state| state.abandon_scan());
        }
    }
}

/// Owns the deployment state and drives scans, selection and downloads.
pub struct DeviceStore {
    pub(crate) host: HostServices,
    scanner: DeviceScanner,
    reject: Vec<Regex>,
    state: watch::Sender<Arc<DeploymentState>>,
    pub(crate) activity: ActivityLock,
    session: Mutex<Option<TerminalSession>>,
}

impl DeviceStore {
    /// Store with automatic download enabled and the default reject patterns.
    pub fn new(host: HostServices) -> Self {
        Self::build(host, default_rejects(), DeploymentState::default())
    }

    pub fn with_config(host: HostServices, config: &DeployConfig) -> Result<Self> {
        let reject = config.scan.compile_rejects()?;
        let state = DeploymentState {
            auto: config.auto,
            ..Default::default()
        };
        Ok(Self::build(host, reject, state))
    }

    fn build(host: HostServices, reject: Vec<Regex>, state: DeploymentState) -> Self {
        let (state, _) = watch::channel(Arc::new(state));
        Self {
            scanner: DeviceScanner::new(host.scanner.clone()),
            host,
            reject,
            state,
            activity: ActivityLock::new(),
            session: Mutex::new(None),
        }
    }

    /// Latest published state.
    pub fn snapshot(&self) -> Arc<DeploymentState> {
        self.state.borrow().clone()
    }

    /// Receiver notified after every transition.
    pub fn subscribe(&self) -> watch::Receiver<Arc<DeploymentState>> {
        self.state.subscribe()
    }

    /// Operation currently holding the store, if any.
    pub fn activity(&self) -> Option<Activity> {
        self.activity.current()
    }

    pub fn enable_auto(&self) {
        self.update(|state| state.auto = true);
    }

    pub fn disable_auto(&self) {
        self.update(|state| state.auto = false);
    }

    /// Show the download overlay and start a fresh scan.
    pub async fn open_download(&self) -> Result<()> {
        self.host.bus.show_download();
        self.reload_devices().await
    }

    /// Scan for boards, replacing the device list.
    ///
    /// With `auto` enabled the result is classified right away and a single
    /// unambiguous match is downloaded to.
    pub async fn reload_devices(&self) -> Result<()> {
        let scope = ScanScope {
            store: self,
            _guard: self.activity.try_acquire(Activity::Scanning)?,
        };
        let auto = self.snapshot().auto;
        let options = ScanOptions::new(self.reject.clone(), self.host.workspace.state().content);

        self.update(|state| state.begin_scan());

        match self.scanner.scan(&options).await {
            Ok(devices) => self.update(|state| state.finish_scan(devices)),
            Err(err) => {
                error!("{}", err);
                let detail = match &err {
                    DeployError::ScanFailure(detail) => detail.clone(),
                    other => other.to_string(),
                };
                self.update(|state| state.fail_scan(detail));
                return Err(err);
            }
        }
        drop(scope);

        if auto {
            let classification = self.classify_devices();
            if matcher::should_auto_download(&classification, auto) {
                self.download().await?;
            }
        }
        Ok(())
    }

    /// Classify the current device list and publish the outcome.
    pub fn classify_devices(&self) -> Classification {
        let classification = matcher::classify(&self.snapshot().devices);

        match (&classification.message, &classification.candidate) {
            (Some(message), _) => info!("{}", message),
            (None, Some(candidate)) => info!(
                "Matched {} on {}",
                candidate.display_name(),
                candidate.path
            ),
            (None, None) => {}
        }

        self.update(|state| state.apply_classification(classification.clone()));
        classification
    }

    /// Select a board and download to it.
    ///
    /// When no scanned board matched the source, picking one rewrites the
    /// source's target directive to that board's name first. A refused
    /// rewrite is reported to the user and nothing is downloaded.
    pub async fn select(&self, device: Device) -> Result<DownloadOutcome> {
        let guard = self.activity.try_acquire(Activity::Deploying)?;

        if self.snapshot().message() == Some(DeviceMessage::NoMatchingDevice) {
            if let Err(err) = self.retarget_source(&device) {
                warn!("{}", err);
                self.host.notifier.error(&err);
                return Ok(DownloadOutcome::Skipped);
            }
        }

        info!("Selected {} on {}", device.display_name(), device.path);
        self.update(|state| state.select(device));

        self.run_download(guard).await
    }

    fn retarget_source(&self, device: &Device) -> Result<()> {
        let content = self.host.workspace.state().content;
        let patched = patcher::retarget(&content, device)?;

        info!(
            "Retargeted source to {}",
            device.name.as_deref().unwrap_or_default()
        );
        self.host.documents.update(&patched);
        self.host.workspace.update_content(patched);
        Ok(())
    }

    /// Apply a transition and publish the resulting snapshot.
    pub(crate) fn update(&self, transition: impl FnOnce(&mut DeploymentState)) {
        self.state.send_modify(|current| {
            let mut next = (**current).clone();
            transition(&mut next);
            *current = Arc::new(next);
        });
    }

    pub(crate) fn session(&self) -> MutexGuard<'_, Option<TerminalSession>> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
