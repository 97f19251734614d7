use std::mem;

use anyhow::Result;
use tracing::debug;

use crate::interp::{ExecContext, Namespace, run_program};
use crate::script::context::ScriptScope;
use crate::script::loader::{CodeUnit, load_code};
use crate::script::is_special_global;
use crate::util::fast_map::fast_hash_map_with_capacity;
use crate::val::Val;

/// Execute a script in the same context as the caller.
///
/// Currently defined session globals are visible to the script, and the
/// script's final globals are merged back into the session: bindings the
/// script did not re-declare are dropped, special identifiers on either
/// side are never copied across. While the script runs, the ambient
/// argument vector is `[path] + args` and the script observes itself as
/// the top-level program; both are restored on return, whether the script
/// completed or raised. A script failure propagates verbatim after the
/// merge and restore steps have run.
pub fn execscript(ctx: &mut ExecContext, path: &str, args: &[String]) -> Result<()> {
    execscript_with_globals(ctx, path, args, None)
}

/// Like [`execscript`], but binding against an explicit namespace instead
/// of the session's own globals.
pub fn execscript_with_globals(
    ctx: &mut ExecContext,
    path: &str,
    args: &[String],
    globals: Option<&mut Namespace>,
) -> Result<()> {
    let unit = load_code(path)?;
    debug!(path, args = args.len(), "hosting script");

    let scope = ScriptScope::enter(ctx, path, args);
    let result = match globals {
        Some(ns) => {
            // Bind against the caller-supplied namespace for the duration
            mem::swap(ctx.globals_mut(), ns);
            let result = host_run(ctx, &unit);
            mem::swap(ctx.globals_mut(), ns);
            result
        }
        None => host_run(ctx, &unit),
    };
    scope.exit(ctx);
    result.map(|_| ())
}

/// Run the unit against a fresh script namespace seeded from the caller's,
/// then merge the script's bindings back. The merge runs whether execution
/// completed or raised.
fn host_run(ctx: &mut ExecContext, unit: &CodeUnit) -> Result<Val> {
    let mut script_ns: Namespace = fast_hash_map_with_capacity(ctx.globals().len() + 4);
    script_ns.insert("__name__".to_string(), Val::Str("__main__".into()));
    script_ns.insert("__file__".to_string(), Val::Str(unit.path.as_str().into()));
    script_ns.insert("__spec__".to_string(), Val::Nil);
    script_ns.insert("__cached__".to_string(), Val::Nil);
    for (name, value) in ctx.globals() {
        if !is_special_global(name) {
            script_ns.insert(name.clone(), value.clone());
        }
    }

    let caller_ns = mem::replace(ctx.globals_mut(), script_ns);
    let result = run_program(&unit.program, ctx);
    let script_ns = mem::replace(ctx.globals_mut(), caller_ns);
    merge_back(ctx.globals_mut(), script_ns);
    result
}

/// The script's globals become the caller's globals: every non-special
/// caller entry is dropped, every non-special script entry is copied in,
/// and the caller's own special identifiers survive untouched.
fn merge_back(caller: &mut Namespace, script_ns: Namespace) {
    let specials: Vec<(String, Val)> = caller
        .iter()
        .filter(|(name, _)| is_special_global(name))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect();
    caller.clear();
    caller.extend(specials);
    for (name, value) in script_ns {
        if !is_special_global(&name) {
            caller.insert(name, value);
        }
    }
}
