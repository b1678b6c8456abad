#![allow(clippy::unwrap_used, clippy::expect_used)]
//! End-to-end tests of the `weft` binary.

use std::fs;
use std::io::Write;
use std::process::{Command, Output, Stdio};

use pretty_assertions::assert_eq;

fn weft(args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_weft"))
        .args(args)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child.stdin.take().unwrap().write_all(stdin.as_bytes()).unwrap();
    child.wait_with_output().unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

#[test]
fn formats_stdin_to_stdout() {
    let output = weft(&["fmt", "--style", "pep8", "-"], "x=[1,2]\nif x :\n  pass\n");
    assert!(output.status.success());
    assert_eq!(stdout(&output), "x = [1, 2]\nif x:\n    pass\n");
}

#[test]
fn diff_mode_prints_unified_diff() {
    let root = tempfile::tempdir().unwrap();
    let file = root.path().join("a.py");
    fs::write(&file, "x=1\ny = 2\n").unwrap();
    let output = weft(&["fmt", "--diff", file.to_str().unwrap()], "");
    assert!(output.status.success());
    let diff = stdout(&output);
    assert!(diff.contains("-x=1\n+x = 1\n"), "{diff}");
    assert_eq!(fs::read_to_string(&file).unwrap(), "x=1\ny = 2\n");
}

#[test]
fn check_mode_lists_files_and_fails() {
    let root = tempfile::tempdir().unwrap();
    fs::write(root.path().join("clean.py"), "x = 1\n").unwrap();
    fs::write(root.path().join("messy.py"), "x  =  1\n").unwrap();
    let output = weft(&["fmt", "--check", root.path().to_str().unwrap()], "");
    assert_eq!(output.status.code(), Some(1));
    let listed = stdout(&output);
    assert!(listed.contains("messy.py"), "{listed}");
    assert!(!listed.contains("clean.py"), "{listed}");
}

#[test]
fn discovered_style_file_applies() {
    let root = tempfile::tempdir().unwrap();
    fs::write(root.path().join("pyproject.toml"), "[tool.weft]\nindent_width = 2\n").unwrap();
    let file = root.path().join("a.py");
    fs::write(&file, "if x:\n    y = 1\n").unwrap();
    let output = weft(&["fmt", file.to_str().unwrap()], "");
    assert!(output.status.success());
    assert_eq!(stdout(&output), "if x:\n  y = 1\n");
}

#[test]
fn syntax_error_is_reported_with_exit_code() {
    let output = weft(&["fmt", "--style", "pep8", "-"], "def (:\n");
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("<stdin>"), "{stderr}");
}

#[test]
fn unknown_command_fails() {
    let output = weft(&["frobnicate"], "");
    assert_eq!(output.status.code(), Some(1));
}
