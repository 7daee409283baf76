//! Listener registry for board implementations

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::models::{EventKind, Listener, Subscription};

/// Thread-safe set of listeners keyed by subscription.
///
/// Handlers are cloned out of the lock before they run, so a handler may
/// attach or detach listeners without deadlocking.
#[derive(Debug, Default)]
pub struct BoardListeners {
    next_id: AtomicU64,
    listeners: Mutex<Vec<(Subscription, Listener)>>,
}

impl BoardListeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(&self, listener: Listener) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let subscription = Subscription::new(id, listener.kind());
        self.lock().push((subscription.clone(), listener));
        subscription
    }

    pub fn remove(&self, subscription: &Subscription) -> bool {
        let mut listeners = self.lock();
        let before = listeners.len();
        listeners.retain(|(existing, _)| existing != subscription);
        listeners.len() != before
    }

    /// Number of listeners currently attached for `kind`.
    pub fn count(&self, kind: EventKind) -> usize {
        self.lock()
            .iter()
            .filter(|(subscription, _)| subscription.kind() == kind)
            .count()
    }

    pub fn emit_progress(&self, progress: u8) {
        for listener in self.snapshot(EventKind::Progress) {
            if let Listener::Progress(handler) = listener {
                handler(progress);
            }
        }
    }

    pub fn emit_terminal(&self, line: &str) {
        for listener in self.snapshot(EventKind::Terminal) {
            if let Listener::Terminal(handler) = listener {
                handler(line);
            }
        }
    }

    pub fn emit_close(&self) {
        for listener in self.snapshot(EventKind::Close) {
            if let Listener::Close(handler) = listener {
                handler();
            }
        }
    }

    fn snapshot(&self, kind: EventKind) -> Vec<Listener> {
        self.lock()
            .iter()
            .filter(|(subscription, _)| subscription.kind() == kind)
            .map(|(_, listener)| listener.clone())
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<(Subscription, Listener)>> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
