use clap::Parser;

use crate::{CliArgs, Commands};
use crate::repl::should_continue_multiline;

#[test]
fn parse_run_file_with_args() {
    let cli = CliArgs::try_parse_from(["corelens", "trace.cls", "1234", "--full"]).unwrap();
    assert!(cli.command.is_none());
    assert_eq!(cli.file.unwrap().to_str(), Some("trace.cls"));
    assert_eq!(cli.args, vec!["1234", "--full"]);
}

#[test]
fn parse_compile_subcommand() {
    let cli = CliArgs::try_parse_from(["corelens", "compile", "trace.cls"]).unwrap();
    match cli.command {
        Some(Commands::Compile { file }) => assert_eq!(file.to_str(), Some("trace.cls")),
        other => panic!("unexpected command: {:?}", other),
    }
}

#[test]
fn parse_bare_invocation_is_repl() {
    let cli = CliArgs::try_parse_from(["corelens"]).unwrap();
    assert!(cli.command.is_none());
    assert!(cli.file.is_none());
}

#[test]
fn multiline_continues_on_open_brackets() {
    assert!(should_continue_multiline("print(1,"));
    assert!(should_continue_multiline("x = [1, 2,"));
    assert!(!should_continue_multiline("print(1, 2)"));
    assert!(!should_continue_multiline("x = [1, 2];"));
}

#[test]
fn multiline_continues_on_trailing_backslash() {
    assert!(should_continue_multiline("x = 1 + \\"));
    assert!(!should_continue_multiline("x = 1 + 2;"));
}

#[test]
fn multiline_ignores_brackets_inside_strings() {
    assert!(!should_continue_multiline("print(\"(((\");"));
    assert!(should_continue_multiline("print(\"unterminated"));
}
