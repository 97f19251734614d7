//! A canned in-process session for tests and wiring checks.

use std::collections::HashMap;

use anyhow::{Result, anyhow};

use crate::session::{Session, StackFrame, StackTrace};

/// A session backed by fixed per-thread frame tables instead of a native
/// engine.
#[derive(Debug, Default)]
pub struct SyntheticSession {
    name: String,
    threads: HashMap<u64, Vec<StackFrame>>,
}

impl SyntheticSession {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            threads: HashMap::new(),
        }
    }

    /// Add a thread whose trace is the given `(pc, symbol)` frames.
    pub fn with_thread(mut self, tid: u64, frames: &[(u64, &str)]) -> Self {
        let frames = frames
            .iter()
            .enumerate()
            .map(|(index, (pc, symbol))| StackFrame {
                index,
                pc: *pc,
                symbol: if symbol.is_empty() {
                    None
                } else {
                    Some((*symbol).to_string())
                },
            })
            .collect();
        self.threads.insert(tid, frames);
        self
    }
}

impl Session for SyntheticSession {
    fn name(&self) -> &str {
        &self.name
    }

    fn stack_trace(&self, tid: u64) -> Result<StackTrace> {
        self.threads
            .get(&tid)
            .cloned()
            .map(StackTrace::new)
            .ok_or_else(|| anyhow!("no thread {} in session '{}'", tid, self.name))
    }
}
