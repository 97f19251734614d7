use anyhow::{Result, anyhow, bail};

use crate::interp::ExecContext;
use crate::script;
use crate::val::Val;

/// Install the builtins every fresh session starts with.
pub fn install_core_builtins(ctx: &mut ExecContext) {
    ctx.register_native("print", builtin_print);
    ctx.register_native("println", builtin_println);
    ctx.register_native("len", builtin_len);
    ctx.register_native("str", builtin_str);
    ctx.register_native("type", builtin_type);
    ctx.register_native("argv", builtin_argv);
    ctx.register_native("execscript", builtin_execscript);
}

fn join_args(args: &[Val]) -> String {
    let mut out = String::new();
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(&arg.to_string());
    }
    out
}

fn builtin_print(args: &[Val], _ctx: &mut ExecContext) -> Result<Val> {
    print!("{}", join_args(args));
    Ok(Val::Nil)
}

fn builtin_println(args: &[Val], _ctx: &mut ExecContext) -> Result<Val> {
    println!("{}", join_args(args));
    Ok(Val::Nil)
}

fn builtin_len(args: &[Val], _ctx: &mut ExecContext) -> Result<Val> {
    match args {
        [Val::Str(s)] => Ok(Val::Int(s.chars().count() as i64)),
        [Val::List(items)] => Ok(Val::Int(items.len() as i64)),
        [other] => Err(anyhow!("len() not supported for {}", other.type_name())),
        _ => bail!("len() takes exactly 1 argument"),
    }
}

fn builtin_str(args: &[Val], _ctx: &mut ExecContext) -> Result<Val> {
    match args {
        [value] => Ok(Val::Str(value.to_string().into())),
        _ => bail!("str() takes exactly 1 argument"),
    }
}

fn builtin_type(args: &[Val], _ctx: &mut ExecContext) -> Result<Val> {
    match args {
        [value] => Ok(Val::Str(value.type_name().into())),
        _ => bail!("type() takes exactly 1 argument"),
    }
}

/// The ambient argument vector: `[script path, script args...]` while a
/// script is hosted, whatever the embedder installed otherwise.
fn builtin_argv(args: &[Val], ctx: &mut ExecContext) -> Result<Val> {
    if !args.is_empty() {
        bail!("argv() takes no arguments");
    }
    Ok(Val::List(
        ctx.argv().iter().map(|s| Val::Str(s.as_str().into())).collect(),
    ))
}

/// `execscript("path.cls", "arg", ...)` hosts another script in the calling
/// namespace; see `script::execscript`.
fn builtin_execscript(args: &[Val], ctx: &mut ExecContext) -> Result<Val> {
    let path = match args.first() {
        Some(Val::Str(path)) => path.to_string(),
        Some(other) => bail!("execscript() path must be str, got {}", other.type_name()),
        None => bail!("execscript() takes a path and optional string arguments"),
    };
    let mut script_args = Vec::with_capacity(args.len().saturating_sub(1));
    for arg in &args[1..] {
        match arg {
            Val::Str(s) => script_args.push(s.to_string()),
            other => bail!("execscript() arguments must be str, got {}", other.type_name()),
        }
    }
    script::execscript(ctx, &path, &script_args)?;
    Ok(Val::Nil)
}
