use std::fmt;

use anyhow::Result;

/// One attached or target program as the debugging engine represents it.
///
/// Implementations live outside this workspace (core dumps, live
/// processes, kernels); [`crate::synthetic::SyntheticSession`] is the
/// in-process stand-in used by tests.
pub trait Session: Send + Sync + fmt::Debug {
    /// Human-readable identity of the target.
    fn name(&self) -> &str;

    /// The stack trace of the thread with the given id.
    fn stack_trace(&self, tid: u64) -> Result<StackTrace>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackFrame {
    pub index: usize,
    pub pc: u64,
    pub symbol: Option<String>,
}

impl fmt::Display for StackFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.symbol {
            Some(symbol) => write!(f, "#{}  {:#018x}  {}", self.index, self.pc, symbol),
            None => write!(f, "#{}  {:#018x}  ???", self.index, self.pc),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StackTrace {
    pub frames: Vec<StackFrame>,
}

impl StackTrace {
    pub fn new(frames: Vec<StackFrame>) -> Self {
        Self { frames }
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }
}

impl fmt::Display for StackTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, frame) in self.frames.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", frame)?;
        }
        Ok(())
    }
}
