//! The script-execution bridge: run an external script file as if its
//! statements had been typed at the session prompt, with variables flowing
//! both ways and the script observing itself as the top-level program.

mod context;
mod exec;
mod loader;

#[cfg(test)]
mod loader_test;

pub use context::ScriptScope;
pub use exec::{execscript, execscript_with_globals};
pub use loader::{CACHE_EXTENSION, CodeUnit, ScriptError, compile_to_cache, load_code};

use once_cell::sync::Lazy;

use crate::util::fast_map::FastHashSet;

/// Namespace keys that denote execution-environment identity rather than
/// user data. They are never copied between the session and a hosted
/// script's namespace in either direction.
static SPECIAL_GLOBALS: Lazy<FastHashSet<&'static str>> = Lazy::new(|| {
    [
        "__name__",
        "__loader__",
        "__package__",
        "__spec__",
        "__path__",
        "__file__",
        "__cached__",
    ]
    .into_iter()
    .collect()
});

#[inline]
pub fn is_special_global(name: &str) -> bool {
    SPECIAL_GLOBALS.contains(name)
}
