use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use corelens_core::ast;
use corelens_core::interp::{ExecContext, run_program};
use corelens_core::token::Tokenizer;
use corelens_core::val::Val;

const PROMPT: &str = "cls> ";
const CONTINUE_PROMPT: &str = "...> ";

fn print_repl_help() {
    println!("corelens interactive session");
    println!("  :help          show this message");
    println!("  :quit / :q     leave the session");
    println!("  execscript(\"file.cls\")   run a script in this session");
    println!("Unbalanced brackets or a trailing '\\' continue on the next line.");
}

/// Whether `input` looks incomplete and should keep reading lines.
pub(crate) fn should_continue_multiline(input: &str) -> bool {
    if input.trim_end().ends_with('\\') {
        return true;
    }
    let mut depth = 0i32;
    let mut in_str = false;
    let mut escaped = false;
    for c in input.chars() {
        if in_str {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_str = false;
            }
            continue;
        }
        match c {
            '"' => in_str = true,
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth -= 1,
            _ => {}
        }
    }
    depth > 0 || in_str
}

fn eval_input(input: &str, ctx: &mut ExecContext) -> Result<Val> {
    let (tokens, spans) = Tokenizer::tokenize(input)?;
    let program = ast::Parser::new(&tokens, &spans).parse_program()?;
    run_program(&program, ctx)
}

pub fn run(mut ctx: ExecContext) -> Result<()> {
    let mut editor = DefaultEditor::new()?;
    println!("corelens {} (:help for help)", env!("CARGO_PKG_VERSION"));

    let mut buffer = String::new();
    loop {
        let prompt = if buffer.is_empty() { PROMPT } else { CONTINUE_PROMPT };
        match editor.readline(prompt) {
            Ok(line) => {
                if buffer.is_empty() {
                    match line.trim() {
                        ":quit" | ":exit" | ":q" => break,
                        ":help" => {
                            print_repl_help();
                            continue;
                        }
                        "" => continue,
                        _ => {}
                    }
                }
                let explicit_continue = line.trim_end().ends_with('\\');
                let line = line.trim_end().strip_suffix('\\').unwrap_or(&line);
                if !buffer.is_empty() {
                    buffer.push('\n');
                }
                buffer.push_str(line);
                if explicit_continue || should_continue_multiline(&buffer) {
                    continue;
                }

                let input = std::mem::take(&mut buffer);
                let _ = editor.add_history_entry(&input);
                match eval_input(&input, &mut ctx) {
                    Ok(Val::Nil) => {}
                    Ok(val) => println!("{}", val),
                    Err(err) => eprintln!("Error: {}", err),
                }
            }
            Err(ReadlineError::Interrupted) => {
                buffer.clear();
                println!("^C");
            }
            Err(ReadlineError::Eof) => {
                if buffer.is_empty() {
                    break;
                }
                buffer.clear();
            }
            Err(err) => {
                eprintln!("readline error: {}", err);
                break;
            }
        }
    }
    Ok(())
}
