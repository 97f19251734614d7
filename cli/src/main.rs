use std::path::{Path, PathBuf};
use std::sync::{Arc, Once};

use clap::{Parser, Subcommand};

use corelens_core::interp::ExecContext;
use corelens_core::script;
use corelens_engine::{SessionSlot, register_debug_builtins};

mod repl;

#[cfg(test)]
mod main_test;

static TRACE_INIT: Once = Once::new();
const DEFAULT_TRACE_FILTER: &str = "corelens_core=info,corelens_engine=info,corelens_cli=info";

fn init_tracing() {
    TRACE_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        use tracing_subscriber::fmt;

        let builder = fmt().with_writer(std::io::stderr);
        let builder = match std::env::var("RUST_LOG")
            .ok()
            .and_then(|expr| EnvFilter::try_new(expr).ok())
        {
            Some(filter) => builder.with_env_filter(filter),
            None => builder.with_env_filter(DEFAULT_TRACE_FILTER),
        };
        let _ = builder.try_init();
    });
}

#[derive(Debug, Parser)]
#[command(
    name = "corelens",
    author,
    version,
    about = "Scriptable console for native debugging engines",
    long_about = None
)]
struct CliArgs {
    /// Subcommands like `compile FILE`
    #[command(subcommand)]
    command: Option<Commands>,

    /// If no subcommand, a script file to execute
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Arguments handed to the script, visible through argv()
    #[arg(value_name = "ARGS", trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Compile FILE to its precompiled sidecar (.clsb) next to the source
    Compile {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Start an interactive session (the default without a FILE)
    Repl,
}

/// A fresh interactive session: core builtins plus the engine natives
/// bound to this process's default-session slot.
fn new_session() -> ExecContext {
    let mut ctx = ExecContext::new();
    let slot = Arc::new(SessionSlot::new());
    register_debug_builtins(&mut ctx, slot);
    ctx
}

fn run_file(path: &Path, args: &[String]) -> anyhow::Result<()> {
    let path = path.to_string_lossy();
    let mut ctx = new_session().with_argv(vec![path.to_string()]);
    if let Err(err) = script::execscript(&mut ctx, &path, args) {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
    Ok(())
}

fn compile_file(path: &Path) -> anyhow::Result<()> {
    match script::compile_to_cache(&path.to_string_lossy()) {
        Ok(sidecar) => {
            println!("wrote {}", sidecar.display());
            Ok(())
        }
        Err(err) => {
            eprintln!("Error: {}", err);
            std::process::exit(1);
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = CliArgs::parse();

    match (cli.command, cli.file) {
        (Some(Commands::Compile { file }), _) => compile_file(&file),
        (Some(Commands::Repl), _) | (None, None) => repl::run(new_session()),
        (None, Some(file)) => run_file(&file, &cli.args),
    }
}
