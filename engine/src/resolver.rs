use std::fmt;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use tracing::{debug, info};

use crate::session::{Session, StackTrace};

/// An engine value that already knows which session owns it, e.g. a
/// register-state or task-control structure resolved by the engine.
#[derive(Debug, Clone)]
pub struct BoundValue {
    session: Arc<dyn Session>,
    tid: u64,
}

impl BoundValue {
    pub fn new(session: Arc<dyn Session>, tid: u64) -> Self {
        Self { session, tid }
    }

    pub fn session(&self) -> &Arc<dyn Session> {
        &self.session
    }

    pub fn tid(&self) -> u64 {
        self.tid
    }
}

/// Argument to stack-trace resolution: either an engine value carrying its
/// owning session, or a bare thread id that needs the ambient default.
#[derive(Debug, Clone)]
pub enum ThreadToken {
    Bound(BoundValue),
    Tid(u64),
}

impl From<u64> for ThreadToken {
    fn from(tid: u64) -> Self {
        ThreadToken::Tid(tid)
    }
}

impl From<BoundValue> for ThreadToken {
    fn from(value: BoundValue) -> Self {
        ThreadToken::Bound(value)
    }
}

/// Raised when a bare thread id is resolved with no ambient session
/// configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoDefaultSession;

impl fmt::Display for NoDefaultSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no default session configured")
    }
}

impl std::error::Error for NoDefaultSession {}

/// Resolve a thread token to a stack trace.
///
/// A session-bound value delegates to its owning session; a bare id asks
/// `default` for the ambient session. The provider is a plain closure so
/// tests can substitute it.
pub fn stack_trace_with<F>(default: F, thread: &ThreadToken) -> Result<StackTrace>
where
    F: FnOnce() -> Option<Arc<dyn Session>>,
{
    match thread {
        ThreadToken::Bound(value) => {
            debug!(session = value.session().name(), tid = value.tid(), "bound stack trace");
            value.session().stack_trace(value.tid())
        }
        ThreadToken::Tid(tid) => {
            let session = default().ok_or(NoDefaultSession)?;
            debug!(session = session.name(), tid, "default-session stack trace");
            session.stack_trace(*tid)
        }
    }
}

/// The ambient default-session slot.
///
/// Owned by the embedder and shared with the natives that need it; holding
/// it behind a `Mutex` makes it shareable, it does not make concurrent
/// script execution safe.
#[derive(Debug, Default)]
pub struct SessionSlot {
    current: Mutex<Option<Arc<dyn Session>>>,
}

impl SessionSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, session: Arc<dyn Session>) {
        info!(session = session.name(), "default session set");
        *self.current.lock().expect("session slot poisoned") = Some(session);
    }

    pub fn clear(&self) {
        *self.current.lock().expect("session slot poisoned") = None;
    }

    pub fn get(&self) -> Option<Arc<dyn Session>> {
        self.current.lock().expect("session slot poisoned").clone()
    }

    /// Resolve against this slot as the ambient default.
    pub fn stack_trace(&self, thread: &ThreadToken) -> Result<StackTrace> {
        stack_trace_with(|| self.get(), thread)
    }
}
