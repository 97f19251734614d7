use std::sync::Arc;

use crate::interp::builtins;
use crate::util::fast_map::{FastHashMap, fast_hash_map_new};
use crate::val::{NativeFn, Val};

/// A session or script namespace: identifier to value.
pub type Namespace = FastHashMap<String, Val>;

/// Identity of the program currently occupying the top-level slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramIdentity {
    pub name: Arc<str>,
    pub file: Option<Arc<str>>,
}

impl ProgramIdentity {
    /// The interactive session itself.
    pub fn interactive() -> Self {
        Self {
            name: "__main__".into(),
            file: None,
        }
    }

    /// A hosted script; the script observes itself as the top-level program.
    pub fn script(path: &str) -> Self {
        Self {
            name: "__main__".into(),
            file: Some(path.into()),
        }
    }
}

/// Execution context of one interactive session.
///
/// Owns the session namespace and the ambient state the execution bridge
/// saves and restores around each hosted script: the argument vector and
/// the top-level program identity. Nothing here is process-global; embedders
/// thread the context through explicitly.
#[derive(Debug, Clone)]
pub struct ExecContext {
    globals: Namespace,
    argv: Vec<String>,
    main_program: Option<ProgramIdentity>,
}

impl Default for ExecContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ExecContext {
    /// Create a session context with the core builtins installed and the
    /// session itself as the ambient top-level program.
    pub fn new() -> Self {
        let mut ctx = Self {
            globals: fast_hash_map_new(),
            argv: Vec::new(),
            main_program: Some(ProgramIdentity::interactive()),
        };
        ctx.globals
            .insert("__name__".to_string(), Val::Str("__main__".into()));
        builtins::install_core_builtins(&mut ctx);
        ctx
    }

    /// A context without builtins or special globals, for embedders that
    /// seed everything themselves.
    pub fn empty() -> Self {
        Self {
            globals: fast_hash_map_new(),
            argv: Vec::new(),
            main_program: None,
        }
    }

    pub fn with_argv(mut self, argv: Vec<String>) -> Self {
        self.argv = argv;
        self
    }

    pub fn globals(&self) -> &Namespace {
        &self.globals
    }

    pub fn globals_mut(&mut self) -> &mut Namespace {
        &mut self.globals
    }

    pub fn get_global(&self, name: &str) -> Option<&Val> {
        self.globals.get(name)
    }

    pub fn set_global(&mut self, name: impl Into<String>, value: Val) {
        self.globals.insert(name.into(), value);
    }

    /// Register a native function under `name`.
    pub fn register_native<F>(&mut self, name: &'static str, func: F)
    where
        F: Fn(&[Val], &mut ExecContext) -> anyhow::Result<Val> + Send + Sync + 'static,
    {
        self.globals
            .insert(name.to_string(), Val::Native(NativeFn::new(name, func)));
    }

    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    pub fn argv_mut(&mut self) -> &mut Vec<String> {
        &mut self.argv
    }

    pub fn set_argv(&mut self, argv: Vec<String>) {
        self.argv = argv;
    }

    pub fn main_program(&self) -> Option<&ProgramIdentity> {
        self.main_program.as_ref()
    }

    pub fn set_main_program(&mut self, identity: Option<ProgramIdentity>) {
        self.main_program = identity;
    }
}
