use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn corelens() -> Command {
    Command::cargo_bin("corelens").expect("binary")
}

fn write_script(dir: &TempDir, name: &str, source: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, source).expect("write script");
    path
}

#[test]
fn runs_a_script_file() {
    let dir = TempDir::new().unwrap();
    let script = write_script(&dir, "hello.cls", "println(\"hello from script\");\n");

    corelens()
        .arg(&script)
        .assert()
        .success()
        .stdout(predicate::str::contains("hello from script"));
}

#[test]
fn passes_argv_to_the_script() {
    let dir = TempDir::new().unwrap();
    let script = write_script(&dir, "args.cls", "println(argv()[1]);\nprintln(argv()[2]);\n");

    corelens()
        .arg(&script)
        .args(["first", "second"])
        .assert()
        .success()
        .stdout(predicate::str::contains("first").and(predicate::str::contains("second")));
}

#[test]
fn argv_zero_is_the_script_path() {
    let dir = TempDir::new().unwrap();
    let script = write_script(&dir, "self.cls", "println(argv()[0]);\n");

    corelens()
        .arg(&script)
        .assert()
        .success()
        .stdout(predicate::str::contains("self.cls"));
}

#[test]
fn compile_writes_a_sidecar_then_run_uses_it() {
    let dir = TempDir::new().unwrap();
    let script = write_script(&dir, "cached.cls", "println(\"from cache\");\n");

    corelens()
        .arg("compile")
        .arg(&script)
        .assert()
        .success()
        .stdout(predicate::str::contains("cached.clsb"));

    let sidecar = dir.path().join("cached.clsb");
    assert!(sidecar.exists());

    corelens()
        .arg(&script)
        .assert()
        .success()
        .stdout(predicate::str::contains("from cache"));
}

#[test]
fn stale_sidecar_is_ignored_after_edit() {
    let dir = TempDir::new().unwrap();
    let script = write_script(&dir, "edited.cls", "println(\"old output\");\n");

    corelens().arg("compile").arg(&script).assert().success();

    // a different byte length guarantees the stamp no longer matches
    fs::write(&script, "println(\"new output, longer line\");\n").unwrap();

    corelens()
        .arg(&script)
        .assert()
        .success()
        .stdout(predicate::str::contains("new output, longer line"));
}

#[test]
fn raised_error_exits_nonzero() {
    let dir = TempDir::new().unwrap();
    let script = write_script(&dir, "boom.cls", "raise ValueError(\"bad input\");\n");

    corelens()
        .arg(&script)
        .assert()
        .failure()
        .stderr(predicate::str::contains("ValueError: bad input"));
}

#[test]
fn missing_script_reports_the_path() {
    let missing = Path::new("definitely-not-here.cls");

    corelens()
        .arg(missing)
        .assert()
        .failure()
        .stderr(predicate::str::contains("definitely-not-here.cls"));
}

#[test]
fn compile_rejects_bad_syntax() {
    let dir = TempDir::new().unwrap();
    let script = write_script(&dir, "broken.cls", "let x = ;\n");

    corelens()
        .arg("compile")
        .arg(&script)
        .assert()
        .failure()
        .stderr(predicate::str::contains("broken.cls"));
}

#[test]
fn execscript_builtin_chains_scripts() {
    let dir = TempDir::new().unwrap();
    let inner = write_script(&dir, "inner.cls", "println(\"inner ran\");\n");
    let outer_src = format!(
        "execscript({:?});\nprintln(\"outer done\");\n",
        inner.to_string_lossy()
    );
    let outer = write_script(&dir, "outer.cls", &outer_src);

    corelens()
        .arg(&outer)
        .assert()
        .success()
        .stdout(predicate::str::contains("inner ran").and(predicate::str::contains("outer done")));
}
