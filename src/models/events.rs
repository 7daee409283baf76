//! Board events and listener subscriptions

use std::fmt;
use std::sync::Arc;

/// Events a board handle can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Transfer progress in percent
    Progress,
    /// A line of output from the running program
    Terminal,
    /// The connection to the board closed
    Close,
}

pub type ProgressHandler = Arc<dyn Fn(u8) + Send + Sync>;
pub type TerminalHandler = Arc<dyn Fn(&str) + Send + Sync>;
pub type CloseHandler = Arc<dyn Fn() + Send + Sync>;

/// A handler attached to one board event.
#[derive(Clone)]
pub enum Listener {
    Progress(ProgressHandler),
    Terminal(TerminalHandler),
    Close(CloseHandler),
}

impl Listener {
    pub fn progress(handler: impl Fn(u8) + Send + Sync + 'static) -> Self {
        Listener::Progress(Arc::new(handler))
    }

    pub fn terminal(handler: impl Fn(&str) + Send + Sync + 'static) -> Self {
        Listener::Terminal(Arc::new(handler))
    }

    pub fn close(handler: impl Fn() + Send + Sync + 'static) -> Self {
        Listener::Close(Arc::new(handler))
    }

    pub fn kind(&self) -> EventKind {
        match self {
            Listener::Progress(_) => EventKind::Progress,
            Listener::Terminal(_) => EventKind::Terminal,
            Listener::Close(_) => EventKind::Close,
        }
    }
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Listener::{:?}", self.kind())
    }
}

/// Handle returned when a listener is attached; revokes exactly that listener.
/// Issued by [`BoardListeners`](crate::board::BoardListeners).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Subscription {
    id: u64,
    kind: EventKind,
}

impl Subscription {
    pub(crate) fn new(id: u64, kind: EventKind) -> Self {
        Self { id, kind }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }
}
