use std::fs;
use std::path::Path;

use tempfile::TempDir;

use crate::interp::ExecContext;
use crate::script::{ScriptError, compile_to_cache, execscript, load_code};
use crate::val::Val;

fn write_script(dir: &Path, name: &str, contents: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write script");
    path.to_string_lossy().into_owned()
}

#[test]
fn test_load_from_source() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_script(dir.path(), "ok.cls", "a = 1;\n");

    let unit = load_code(&path).expect("load");
    assert_eq!(unit.path, path);
    assert_eq!(unit.program.stmts.len(), 1);
}

#[test]
fn test_missing_file_is_file_access_error() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("missing.cls");

    let err = load_code(&path.to_string_lossy()).unwrap_err();
    match err.downcast_ref::<ScriptError>() {
        Some(ScriptError::FileAccess { path: p, .. }) => {
            assert!(p.ends_with("missing.cls"));
        }
        other => panic!("expected FileAccess, got {:?}", other),
    }
}

#[test]
fn test_syntax_error_carries_path_and_location() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_script(dir.path(), "bad.cls", "a = 1;\nb = ;\n");

    let err = load_code(&path).unwrap_err();
    match err.downcast_ref::<ScriptError>() {
        Some(ScriptError::Compile { path: p, error }) => {
            assert!(p.ends_with("bad.cls"));
            let span = error.span.as_ref().expect("span");
            assert_eq!(span.start.line, 2);
        }
        other => panic!("expected Compile, got {:?}", other),
    }
    // The rendered message attributes to the script, not the host
    assert!(err.to_string().contains("bad.cls"));
}

#[test]
fn test_cache_roundtrip() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_script(dir.path(), "cached.cls", "a = 40 + 2;\n");

    let sidecar = compile_to_cache(&path).expect("compile");
    assert!(sidecar.exists());
    assert_eq!(sidecar.extension().and_then(|e| e.to_str()), Some("clsb"));

    let from_cache = load_code(&path).expect("load");
    let from_source = {
        fs::remove_file(&sidecar).expect("remove cache");
        load_code(&path).expect("load")
    };
    assert_eq!(from_cache.program, from_source.program);
}

#[test]
fn test_stale_cache_falls_back_to_source() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_script(dir.path(), "stale.cls", "a = 1;\n");
    compile_to_cache(&path).expect("compile");

    // Rewrite the source with different content (and length)
    fs::write(&path, "a = 1000;\n").expect("rewrite");

    let unit = load_code(&path).expect("load");
    let mut ctx = ExecContext::new();
    execscript(&mut ctx, &path, &[]).expect("execscript");
    assert_eq!(ctx.get_global("a"), Some(&Val::Int(1000)));
    assert_eq!(unit.program.stmts.len(), 1);
}

#[test]
fn test_corrupt_cache_is_ignored() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_script(dir.path(), "corrupt.cls", "a = 7;\n");
    let sidecar = compile_to_cache(&path).expect("compile");

    fs::write(&sidecar, b"not a cache").expect("corrupt");

    let unit = load_code(&path).expect("load falls back to source");
    assert_eq!(unit.program.stmts.len(), 1);
}

#[test]
fn test_fresh_cache_is_used_even_without_source_parse() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_script(dir.path(), "fast.cls", "a = 5;\n");
    compile_to_cache(&path).expect("compile");

    // Sabotage the source body while keeping its stamp identical in length;
    // the loader must still trust the cache and never parse the source.
    let original = fs::metadata(&path).expect("meta").modified().expect("mtime");
    fs::write(&path, "a = !;\n").expect("rewrite");
    let file = fs::File::options().write(true).open(&path).expect("open");
    file.set_modified(original).expect("restore mtime");
    drop(file);

    let unit = load_code(&path).expect("load from cache");
    let mut ctx = ExecContext::new();
    crate::run_program(&unit.program, &mut ctx).expect("run");
    assert_eq!(ctx.get_global("a"), Some(&Val::Int(5)));
}
