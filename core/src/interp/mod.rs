mod builtins;
mod context;
mod eval;


pub use context::{ExecContext, Namespace, ProgramIdentity};
pub use eval::run_program;

use std::fmt;

/// Failure raised by a script's own `raise` statement.
///
/// Propagated verbatim to the embedder; recover it with
/// `err.downcast_ref::<Raised>()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raised {
    pub kind: String,
    pub message: String,
}

impl fmt::Display for Raised {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for Raised {}
