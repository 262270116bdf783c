//! Black-box tests against the built `rush` binary, covering the
//! concrete scenarios from spec.md §8 that only make sense driven through
//! stdin/stdout of a real process (redirection side effects, pipelines
//! mixing builtins and external commands, command-not-found reporting).

use std::io::Write;
use std::process::{Command, Stdio};

use assert_cmd::cargo::cargo_bin;

fn run_script(script: &str) -> (String, String, i32) {
    let mut child = Command::new(cargo_bin("rush"))
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .env_remove("HISTFILE")
        .spawn()
        .expect("spawn rush");

    child.stdin.take().unwrap().write_all(script.as_bytes()).unwrap();
    let output = child.wait_with_output().unwrap();
    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.code().unwrap_or(-1),
    )
}

#[test]
fn echo_collapses_whitespace_between_words() {
    let (stdout, _stderr, _code) = run_script("echo hello   world\n");
    assert!(stdout.contains("hello world\n"));
}

#[test]
fn quoted_fragments_concatenate() {
    let (stdout, _stderr, _code) = run_script("echo 'a  b'\"  c\"\n");
    assert!(stdout.contains("a  b  c\n"));
}

#[test]
fn redirect_truncate_then_cat_back() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.txt");
    let script = format!("echo foo > {}\ncat {}\n", out.display(), out.display());
    let (stdout, _stderr, _code) = run_script(&script);
    assert_eq!(std::fs::read_to_string(&out).unwrap(), "foo\n");
    assert!(stdout.contains("foo\n"));
}

#[test]
fn redirect_append_twice_accumulates() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("log.txt");
    let script = format!("echo a >> {}\necho a >> {}\n", log.display(), log.display());
    run_script(&script);
    assert_eq!(std::fs::read_to_string(&log).unwrap(), "a\na\n");
}

#[test]
fn pipeline_echo_into_wc_counts_bytes() {
    let (stdout, _stderr, _code) = run_script("echo hi | wc -c\n");
    assert!(stdout.trim().ends_with('3'));
}

#[test]
fn unknown_command_reports_not_found_and_keeps_looping() {
    let (stdout, stderr, _code) = run_script("nonesuch-xyz\necho still-alive\n");
    assert!(stderr.contains("nonesuch-xyz: command not found"));
    assert!(stdout.contains("still-alive\n"));
}

#[test]
fn exit_with_code_propagates_to_process_status() {
    let (_stdout, _stderr, code) = run_script("exit 7\n");
    assert_eq!(code, 7);
}

#[test]
fn eof_after_a_failing_command_still_exits_zero() {
    let (_stdout, stderr, code) = run_script("nonesuch-xyz\n");
    assert!(stderr.contains("nonesuch-xyz: command not found"));
    assert_eq!(code, 0);
}

#[test]
fn exit_persists_history_to_histfile() {
    let dir = tempfile::tempdir().unwrap();
    let histfile = dir.path().join("hist");

    let mut child = Command::new(cargo_bin("rush"))
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .env("HISTFILE", &histfile)
        .spawn()
        .expect("spawn rush");
    child.stdin.take().unwrap().write_all(b"echo one\nexit\n").unwrap();
    child.wait_with_output().unwrap();

    let contents = std::fs::read_to_string(&histfile).unwrap();
    assert!(contents.contains("echo one"));
}

#[test]
fn builtin_inside_a_pipeline_runs_isolated_via_reexec() {
    let (stdout, _stderr, _code) = run_script("pwd | cat\n");
    assert!(!stdout.trim().is_empty());
}
