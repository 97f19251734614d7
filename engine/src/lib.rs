//! Contracts to the external native debugging engine.
//!
//! corelens never interprets debugger semantics itself. It consumes two
//! narrow contracts (resolve a thread token to a stack trace, and produce
//! the ambient default session) and exposes them to scripts as natives.

mod builtins;
mod resolver;
mod session;
pub mod synthetic;


pub use builtins::register_debug_builtins;
pub use resolver::{BoundValue, NoDefaultSession, SessionSlot, ThreadToken, stack_trace_with};
pub use session::{Session, StackFrame, StackTrace};
