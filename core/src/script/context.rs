use tracing::trace;

use crate::interp::{ExecContext, ProgramIdentity};

/// Scoped capture of the ambient top-level program identity and argument
/// vector around one hosted script execution.
///
/// The saved generation lives in the guard value itself, so nested
/// invocations restore in strict LIFO order; the host calls [`exit`] on
/// success and failure alike, making the net effect on ambient state zero.
///
/// [`exit`]: ScriptScope::exit
#[derive(Debug)]
#[must_use = "a ScriptScope must be exited to restore ambient state"]
pub struct ScriptScope {
    saved_argv: Vec<String>,
    saved_main: Option<ProgramIdentity>,
}

impl ScriptScope {
    /// Install `path` as the ambient top-level program and `[path] + args`
    /// as the argument vector, recording the prior values.
    pub fn enter(ctx: &mut ExecContext, path: &str, args: &[String]) -> Self {
        let saved_main = ctx.main_program().cloned();
        ctx.set_main_program(Some(ProgramIdentity::script(path)));

        let mut argv = Vec::with_capacity(args.len() + 1);
        argv.push(path.to_string());
        argv.extend_from_slice(args);
        let saved_argv = std::mem::replace(ctx.argv_mut(), argv);

        trace!(path, "entered script scope");
        Self {
            saved_argv,
            saved_main,
        }
    }

    /// Restore the recorded argument vector and program identity exactly,
    /// clearing the slot if it was empty before.
    pub fn exit(self, ctx: &mut ExecContext) {
        *ctx.argv_mut() = self.saved_argv;
        ctx.set_main_program(self.saved_main);
        trace!("exited script scope");
    }
}
