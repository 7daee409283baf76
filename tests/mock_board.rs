//! Mock board and host framework
//!
//! Stand-ins for the transport and editor surfaces the device store talks to,
//! recording every interaction so tests can assert on it.

#![allow(dead_code)]

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use board_deploy::board::{Board, BoardListeners, BoardProvider, ScanBoards};
use board_deploy::host::{Documents, EventBus, HostServices, Notifier, Workspace, WorkspaceState};
use board_deploy::models::{Device, EventKind, Listener, ScanOptions, Subscription, TargetProgram};
use board_deploy::DeployError;

pub const SOURCE: &str = "' {$STAMP BS2}\n' {$PBASIC 2.5}\nDEBUG \"Hello\"\n";
pub const FILENAME: &str = "hello.bs2";

/// Offset of the directive literal in [`SOURCE`]
pub fn source_target_start() -> usize {
    SOURCE.find("BS2").unwrap_or_default()
}

pub fn named(path: &str, name: &str, is_match: bool) -> Device {
    Device::new(path)
        .with_name(name)
        .matched(is_match)
        .with_program(TargetProgram {
            target_start: source_target_start(),
            target: Some("BS2".to_string()),
        })
}

pub fn unnamed(path: &str) -> Device {
    Device::new(path)
}

/// Holds a transfer open until the test releases it.
#[derive(Default)]
pub struct BootloadGate {
    pub started: Notify,
    pub release: Notify,
}

/// Simulated board emitting scripted progress.
pub struct MockBoard {
    path: String,
    pub listeners: BoardListeners,
    progress_steps: Vec<u8>,
    failure: Option<String>,
    gate: Option<Arc<BootloadGate>>,
    bootloads: AtomicUsize,
    received: Mutex<Vec<String>>,
}

impl MockBoard {
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            listeners: BoardListeners::new(),
            progress_steps: vec![25, 50, 75, 100],
            failure: None,
            gate: None,
            bootloads: AtomicUsize::new(0),
            received: Mutex::new(Vec::new()),
        }
    }

    pub fn with_progress(mut self, steps: Vec<u8>) -> Self {
        self.progress_steps = steps;
        self
    }

    pub fn failing(mut self, detail: &str) -> Self {
        self.failure = Some(detail.to_string());
        self
    }

    pub fn gated(mut self, gate: Arc<BootloadGate>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn bootload_count(&self) -> usize {
        self.bootloads.load(Ordering::SeqCst)
    }

    pub fn received(&self) -> Vec<String> {
        self.received.lock().unwrap().clone()
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners.count(kind)
    }

    /// Simulate a console line arriving from the board
    pub fn emit_terminal(&self, line: &str) {
        self.listeners.emit_terminal(line);
    }

    /// Simulate the link closing
    pub fn emit_close(&self) {
        self.listeners.emit_close();
    }
}

#[async_trait]
impl Board for MockBoard {
    fn path(&self) -> &str {
        &self.path
    }

    fn on(&self, listener: Listener) -> Subscription {
        self.listeners.on(listener)
    }

    fn remove_listener(&self, subscription: &Subscription) -> bool {
        self.listeners.remove(subscription)
    }

    async fn bootload(&self, content: &str) -> Result<()> {
        self.bootloads.fetch_add(1, Ordering::SeqCst);
        self.received.lock().unwrap().push(content.to_string());

        if let Some(gate) = &self.gate {
            gate.started.notify_one();
            gate.release.notified().await;
        }

        // Progress arrives from the transport thread
        let listeners = &self.listeners;
        let steps = self.progress_steps.clone();
        std::thread::scope(|scope| {
            scope.spawn(|| {
                for step in steps {
                    listeners.emit_progress(step);
                }
            });
        });

        match &self.failure {
            Some(detail) => Err(anyhow!("{}", detail)),
            None => Ok(()),
        }
    }
}

/// Scanner replaying scripted results; the last one repeats.
pub struct MockScanner {
    results: Mutex<Vec<std::result::Result<Vec<Device>, String>>>,
    hang: bool,
    pub calls: AtomicUsize,
    pub last_source: Mutex<Option<String>>,
}

impl MockScanner {
    fn scripted(first: std::result::Result<Vec<Device>, String>, hang: bool) -> Self {
        Self {
            results: Mutex::new(vec![first]),
            hang,
            calls: AtomicUsize::new(0),
            last_source: Mutex::new(None),
        }
    }

    pub fn with_devices(devices: Vec<Device>) -> Self {
        Self::scripted(Ok(devices), false)
    }

    pub fn failing(detail: &str) -> Self {
        Self::scripted(Err(detail.to_string()), false)
    }

    /// Scanner whose enumeration never completes
    pub fn hanging() -> Self {
        Self::scripted(Ok(Vec::new()), true)
    }

    /// Fail every scan after the scripted ones
    pub fn then_failing(self, detail: &str) -> Self {
        self.results.lock().unwrap().push(Err(detail.to_string()));
        self
    }

    fn next_result(&self) -> std::result::Result<Vec<Device>, String> {
        let mut results = self.results.lock().unwrap();
        if results.len() > 1 {
            results.remove(0)
        } else {
            results[0].clone()
        }
    }
}

#[async_trait]
impl ScanBoards for MockScanner {
    async fn scan_boards(&self, options: &ScanOptions) -> Result<Vec<Device>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_source.lock().unwrap() = Some(options.source.clone());
        if self.hang {
            std::future::pending::<()>().await;
        }
        self.next_result()
            .map(|devices| {
                devices
                    .into_iter()
                    .filter(|device| !options.is_rejected(&device.path))
                    .collect()
            })
            .map_err(|detail| anyhow!("{}", detail))
    }
}

/// Provider handing out one board for every device.
pub struct MockProvider {
    board: Option<Arc<MockBoard>>,
    pub requests: Mutex<Vec<String>>,
}

impl MockProvider {
    pub fn new(board: Arc<MockBoard>) -> Self {
        Self {
            board: Some(board),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            board: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl BoardProvider for MockProvider {
    fn get_board(&self, device: &Device) -> Result<Arc<dyn Board>> {
        self.requests.lock().unwrap().push(device.path.clone());
        match &self.board {
            Some(board) => Ok(board.clone()),
            None => Err(anyhow!("board on {} went away", device.path)),
        }
    }
}

/// In-memory workspace that also records document updates.
pub struct RecordingWorkspace {
    state: Mutex<WorkspaceState>,
    pub documents: Mutex<Vec<String>>,
}

impl RecordingWorkspace {
    pub fn new(content: &str) -> Self {
        Self {
            state: Mutex::new(WorkspaceState {
                cwd: std::env::temp_dir(),
                content: content.to_string(),
                filename: FILENAME.to_string(),
            }),
            documents: Mutex::new(Vec::new()),
        }
    }

    pub fn content(&self) -> String {
        self.state.lock().unwrap().content.clone()
    }

    pub fn document_updates(&self) -> Vec<String> {
        self.documents.lock().unwrap().clone()
    }
}

impl Workspace for RecordingWorkspace {
    fn state(&self) -> WorkspaceState {
        self.state.lock().unwrap().clone()
    }

    fn update_content(&self, content: String) {
        self.state.lock().unwrap().content = content;
    }
}

impl Documents for RecordingWorkspace {
    fn update(&self, source: &str) {
        self.documents.lock().unwrap().push(source.to_string());
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub successes: Mutex<Vec<String>>,
    pub errors: Mutex<Vec<String>>,
    pub clears: AtomicUsize,
}

impl RecordingNotifier {
    pub fn successes(&self) -> Vec<String> {
        self.successes.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn success(&self, message: &str) {
        self.successes.lock().unwrap().push(message.to_string());
    }

    fn error(&self, error: &DeployError) {
        self.errors.lock().unwrap().push(error.to_string());
    }

    fn clear(&self) {
        self.clears.fetch_add(1, Ordering::SeqCst);
    }
}

/// Every bus signal in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum BusSignal {
    Connected,
    Disconnected,
    Rx(String),
    Tx(u8),
    Output(String),
    ClearOutput,
    ShowDownload,
    HideDownload,
}

#[derive(Default)]
pub struct RecordingBus {
    pub signals: Mutex<Vec<BusSignal>>,
}

impl RecordingBus {
    pub fn signals(&self) -> Vec<BusSignal> {
        self.signals.lock().unwrap().clone()
    }

    pub fn count(&self, signal: &BusSignal) -> usize {
        self.signals().iter().filter(|s| *s == signal).count()
    }

    pub fn tx_values(&self) -> Vec<u8> {
        self.signals()
            .into_iter()
            .filter_map(|signal| match signal {
                BusSignal::Tx(progress) => Some(progress),
                _ => None,
            })
            .collect()
    }

    fn push(&self, signal: BusSignal) {
        self.signals.lock().unwrap().push(signal);
    }
}

impl EventBus for RecordingBus {
    fn connected(&self) {
        self.push(BusSignal::Connected);
    }

    fn disconnected(&self) {
        self.push(BusSignal::Disconnected);
    }

    fn rx(&self, line: &str) {
        self.push(BusSignal::Rx(line.to_string()));
    }

    fn tx(&self, progress: u8) {
        self.push(BusSignal::Tx(progress));
    }

    fn output(&self, line: &str) {
        self.push(BusSignal::Output(line.to_string()));
    }

    fn clear_output(&self) {
        self.push(BusSignal::ClearOutput);
    }

    fn show_download(&self) {
        self.push(BusSignal::ShowDownload);
    }

    fn hide_download(&self) {
        self.push(BusSignal::HideDownload);
    }
}

/// A complete mock host with handles on every recorder.
pub struct MockHost {
    pub scanner: Arc<MockScanner>,
    pub board: Arc<MockBoard>,
    pub provider: Arc<MockProvider>,
    pub workspace: Arc<RecordingWorkspace>,
    pub notifier: Arc<RecordingNotifier>,
    pub bus: Arc<RecordingBus>,
}

impl MockHost {
    pub fn new(devices: Vec<Device>) -> Self {
        Self::build(
            MockScanner::with_devices(devices),
            MockBoard::new("/dev/ttyUSB0"),
        )
    }

    pub fn with_board(devices: Vec<Device>, board: MockBoard) -> Self {
        Self::build(MockScanner::with_devices(devices), board)
    }

    pub fn build(scanner: MockScanner, board: MockBoard) -> Self {
        let board = Arc::new(board);
        Self {
            scanner: Arc::new(scanner),
            provider: Arc::new(MockProvider::new(board.clone())),
            board,
            workspace: Arc::new(RecordingWorkspace::new(SOURCE)),
            notifier: Arc::new(RecordingNotifier::default()),
            bus: Arc::new(RecordingBus::default()),
        }
    }

    pub fn without_boards(mut self) -> Self {
        self.provider = Arc::new(MockProvider::unavailable());
        self
    }

    pub fn services(&self) -> HostServices {
        HostServices {
            scanner: self.scanner.clone(),
            boards: self.provider.clone(),
            workspace: self.workspace.clone(),
            documents: self.workspace.clone(),
            notifier: self.notifier.clone(),
            bus: self.bus.clone(),
        }
    }
}
