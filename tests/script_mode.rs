//! Integration tests for running edit scripts through the binary

use std::io::Write;
use std::process::{Command, Stdio};

fn run_script(args: &[&str], script: &str) -> (String, String, i32) {
    let mut child = Command::new(env!("CARGO_BIN_EXE_cellweave"))
        // Tests must not depend on a user's ~/.config/cellweave/config.toml.
        .env("XDG_CONFIG_HOME", env!("CARGO_TARGET_TMPDIR"))
        .env("HOME", env!("CARGO_TARGET_TMPDIR"))
        .env_remove("RUST_LOG")
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to start cellweave");

    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(script.as_bytes())
        .expect("Failed to write script");
    let output = child.wait_with_output().expect("Failed to wait for cellweave");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let exit_code = output.status.code().unwrap_or(-1);

    (stdout, stderr, exit_code)
}

#[test]
fn test_formula_sees_updates() {
    let (stdout, _, code) = run_script(&[], "set A1 5\nset B1 =A1\nget B1\nset A1 10\nget B1\n");
    assert_eq!(stdout, "B1\t5\t=A1\nB1\t10\t=A1\n");
    assert_eq!(code, 0);
}

#[test]
fn test_print_values_after_script() {
    let (stdout, _, code) = run_script(
        &["--print", "values"],
        "set A1 2\nset B1 =A1*A1\nset A2 'text\n",
    );
    assert_eq!(stdout, "2\t4\ntext\t\n");
    assert_eq!(code, 0);
}

#[test]
fn test_print_texts_after_script() {
    let (stdout, _, code) = run_script(&["-p", "texts"], "set A1 = ( 1 + 2 ) \nset B2 'x\n");
    assert_eq!(stdout, "=(1+2)\t\n\t'x\n");
    assert_eq!(code, 0);
}

#[test]
fn test_cycle_stops_script() {
    let (stdout, stderr, code) = run_script(&[], "set A1 =B1\nset B1 =A1\nget A1\n");
    assert_eq!(stdout, "");
    assert!(stderr.contains("Circular dependency"), "{stderr}");
    assert_eq!(code, 1);
}

#[test]
fn test_keep_going_continues_after_errors() {
    let (stdout, stderr, code) = run_script(
        &["--keep-going"],
        "set A1 =B1\nset B1 =A1\nset C1 =1+\nget A1\n",
    );
    assert_eq!(stdout, "A1\t0\t=B1\n");
    assert_eq!(stderr.lines().count(), 2);
    assert_eq!(code, 1);
}

#[test]
fn test_clear_shrinks_printable_size() {
    let (stdout, _, code) = run_script(&[], "set A1 a\nset C3 b\nsize\nclear C3\nsize\n");
    assert_eq!(stdout, "3\t3\n1\t1\n");
    assert_eq!(code, 0);
}

#[test]
fn test_unknown_option_is_usage_error() {
    let (_, stderr, code) = run_script(&["--frobnicate"], "");
    assert!(stderr.contains("Usage"), "{stderr}");
    assert_eq!(code, 2);
}

#[test]
fn test_error_message_printed_once() {
    let (_, stderr, code) = run_script(&[], "set A1 =1+\n");
    assert_eq!(
        stderr,
        "Error: Line 1: Formula parse error: syntax error: unexpected end of formula\n"
    );
    assert_eq!(code, 1);
}

#[test]
fn test_missing_script_file_reports_cause() {
    let missing = concat!(env!("CARGO_TARGET_TMPDIR"), "/no-such-script.txt");
    let (_, stderr, code) = run_script(&[missing], "");
    assert_eq!(stderr.lines().count(), 1, "{stderr}");
    assert!(stderr.starts_with("Error: failed to open "), "{stderr}");
    assert_eq!(code, 1);
}
