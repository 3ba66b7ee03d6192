//! Integration tests for the CLI surface.
//!
//! These run the compiled binary as a subprocess to verify that argument
//! parsing works end-to-end. `--help` exits before any network or terminal
//! access, so the tests need neither a relay server nor a real tty.

use std::process::Command;

/// Helper: path to the built binary. `cargo test` compiles it for us.
fn cwchat_bin() -> String {
    // `cargo test` places the binary under target/debug/
    let mut path = std::env::current_exe()
        .expect("cannot determine test exe path")
        .parent()
        .expect("no parent dir")
        .parent()
        .expect("no grandparent dir")
        .to_path_buf();
    path.push("cwchat");
    path.to_string_lossy().to_string()
}

#[test]
fn log_format_json_with_help_exits_zero() {
    // --help causes immediate exit(0). If --log-format json is not a valid
    // flag the binary would print an error and exit(2).
    let output = Command::new(cwchat_bin())
        .args(["--log-format", "json", "--help"])
        .output()
        .expect("failed to run cwchat");

    assert!(
        output.status.success(),
        "expected exit 0, got {:?}\nstderr: {}",
        output.status.code(),
        String::from_utf8_lossy(&output.stderr),
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("--log-format"),
        "help text should mention --log-format:\n{stdout}"
    );
}

#[test]
fn log_format_text_with_help_exits_zero() {
    let output = Command::new(cwchat_bin())
        .args(["--log-format", "text", "--help"])
        .output()
        .expect("failed to run cwchat");

    assert!(
        output.status.success(),
        "expected exit 0, got {:?}\nstderr: {}",
        output.status.code(),
        String::from_utf8_lossy(&output.stderr),
    );
}

#[test]
fn invalid_log_format_fails() {
    let output = Command::new(cwchat_bin())
        .args(["--log-format", "xml", "--help"])
        .output()
        .expect("failed to run cwchat");

    assert!(
        !output.status.success(),
        "expected non-zero exit for an invalid --log-format value"
    );
}

#[test]
fn room_env_var_with_help_exits_zero() {
    // CWCHAT_ROOM should be accepted just like the CLI flag.
    let output = Command::new(cwchat_bin())
        .env("CWCHAT_ROOM", "roomForAll")
        .args(["--help"])
        .output()
        .expect("failed to run cwchat");

    assert!(
        output.status.success(),
        "expected exit 0, got {:?}\nstderr: {}",
        output.status.code(),
        String::from_utf8_lossy(&output.stderr),
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("CWCHAT_ROOM"),
        "help text should mention CWCHAT_ROOM env var:\n{stdout}"
    );
}

#[test]
fn help_mentions_core_flags() {
    let output = Command::new(cwchat_bin())
        .args(["--help"])
        .output()
        .expect("failed to run cwchat");

    let stdout = String::from_utf8_lossy(&output.stdout);
    for flag in ["--room", "--gen-room", "--server", "--dit-ms", "--mute"] {
        assert!(stdout.contains(flag), "help text should mention {flag}:\n{stdout}");
    }
}
