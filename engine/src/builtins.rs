use std::sync::Arc;

use anyhow::{Result, bail};

use corelens_core::interp::ExecContext;
use corelens_core::val::Val;

use crate::resolver::{SessionSlot, ThreadToken};

/// Install the engine-facing natives into a session context, bound to the
/// embedder's default-session slot.
pub fn register_debug_builtins(ctx: &mut ExecContext, slot: Arc<SessionSlot>) {
    let trace_slot = Arc::clone(&slot);
    ctx.register_native("stack_trace", move |args, _ctx| {
        stack_trace_native(&trace_slot, args)
    });

    ctx.register_native("default_session", move |args, _ctx| {
        if !args.is_empty() {
            bail!("default_session() takes no arguments");
        }
        Ok(match slot.get() {
            Some(session) => Val::Str(session.name().into()),
            None => Val::Nil,
        })
    });
}

fn stack_trace_native(slot: &SessionSlot, args: &[Val]) -> Result<Val> {
    let tid = match args {
        [Val::Int(tid)] if *tid >= 0 => *tid as u64,
        [Val::Int(_)] => bail!("stack_trace() thread id must be non-negative"),
        [other] => bail!("stack_trace() thread id must be int, got {}", other.type_name()),
        _ => bail!("stack_trace() takes exactly 1 argument"),
    };
    let trace = slot.stack_trace(&ThreadToken::Tid(tid))?;
    Ok(Val::List(
        trace
            .frames
            .iter()
            .map(|frame| Val::Str(frame.to_string().into()))
            .collect(),
    ))
}
