pub mod ast;
pub mod interp;
pub mod script;
pub mod token;
pub mod util;
pub mod val;

pub use interp::{ExecContext, run_program};
pub use script::{execscript, load_code};
pub use val::Val;
