// This file is part of msh, a POSIX-subset shell implementation.

//! End-to-end scenarios driven against the built binary (SPEC_FULL.md §8),
//! in the spirit of the teacher's own `tests/scripted_test.rs`: no mocking
//! of the operating system, just `std::process::Command` against the real
//! executable.

use std::io::Write;
use std::process::{Command, Stdio};

fn run_script(script: &str) -> (String, i32) {
    let mut child = Command::new(env!("CARGO_BIN_EXE_msh"))
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn msh");

    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(script.as_bytes())
        .expect("write script");

    let output = child.wait_with_output().expect("wait for msh");
    (
        String::from_utf8_lossy(&output.stdout).into_owned(),
        output.status.code().unwrap_or(-1),
    )
}

/// Like [`run_script`] but also returns captured stderr, for scenarios that
/// assert on a diagnostic rather than just an exit status.
fn run_script_with_stderr(script: &str) -> (String, String, i32) {
    let mut child = Command::new(env!("CARGO_BIN_EXE_msh"))
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn msh");

    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(script.as_bytes())
        .expect("write script");

    let output = child.wait_with_output().expect("wait for msh");
    (
        String::from_utf8_lossy(&output.stdout).into_owned(),
        String::from_utf8_lossy(&output.stderr).into_owned(),
        output.status.code().unwrap_or(-1),
    )
}

#[test]
fn echo_hello_world() {
    let (stdout, status) = run_script("echo hello world\n");
    assert_eq!(stdout, "hello world\n");
    assert_eq!(status, 0);
}

#[test]
fn variable_assignment_then_expansion() {
    let (stdout, status) = run_script("X=42\necho \"$X\"\n");
    assert_eq!(stdout, "42\n");
    assert_eq!(status, 0);
}

#[test]
fn three_stage_pipeline() {
    let (stdout, status) = run_script("echo a | tr a b | tr b c\n");
    assert_eq!(stdout, "c\n");
    assert_eq!(status, 0);
}

#[test]
fn redirection_round_trips_through_a_file() {
    let path = std::env::temp_dir().join(format!("msh_test_{}.txt", std::process::id()));
    let script = format!(
        "echo hi > {path} && cat {path}\n",
        path = path.display()
    );

    let (stdout, status) = run_script(&script);
    assert_eq!(stdout, "hi\n");
    assert_eq!(status, 0);

    let contents = std::fs::read_to_string(&path).expect("read redirected file");
    assert_eq!(contents, "hi\n");
    let _ = std::fs::remove_file(&path);
}

#[test]
fn or_rescues_a_failing_command() {
    let (stdout, status) = run_script("false || echo rescued\n");
    assert_eq!(stdout, "rescued\n");
    assert_eq!(status, 0);
}

#[test]
fn and_skips_after_failure() {
    let (stdout, status) = run_script("false && echo should_not_print\n");
    assert_eq!(stdout, "");
    assert_eq!(status, 1);
}

#[test]
fn dollar_question_reflects_previous_status() {
    let (stdout, _status) = run_script("false\necho \"status=$?\"\n");
    assert_eq!(stdout, "status=1\n");
}

#[test]
fn help_flag_prints_usage_and_exits_zero() {
    let output = Command::new(env!("CARGO_BIN_EXE_msh"))
        .arg("-h")
        .output()
        .expect("run msh -h");
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("usage"));
}

#[test]
fn unopenable_redirect_target_prints_a_diagnostic_and_fails() {
    let (stdout, stderr, status) = run_script_with_stderr("cat < /nonexistent-msh-test-path\n");
    assert_eq!(stdout, "");
    assert_eq!(status, 1);
    assert!(
        stderr.contains("cannot open redirect target"),
        "expected a redirect diagnostic, got: {stderr}"
    );
}

#[test]
fn script_path_argument_is_read_instead_of_stdin() {
    let path = std::env::temp_dir().join(format!("msh_test_script_{}.sh", std::process::id()));
    std::fs::write(&path, "echo from_file\n").expect("write script file");

    let output = Command::new(env!("CARGO_BIN_EXE_msh"))
        .arg(&path)
        .output()
        .expect("run msh with script path");

    assert_eq!(String::from_utf8_lossy(&output.stdout), "from_file\n");
    assert!(output.status.success());
    let _ = std::fs::remove_file(&path);
}
