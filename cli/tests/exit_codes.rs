//! Run the `registry-check` binary against the live mock registry.
//!
//! # Design
//! Each test starts the mock server on a random port, spawns the binary with
//! `--base-url` pointing at it, and checks the exit code together with what
//! went to stdout and stderr.

use std::fs;
use std::net::SocketAddr;
use std::process::{Command, Output};

/// Start the mock server on a random port and return its address.
fn start_server() -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    addr
}

fn run(addr: SocketAddr, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_registry-check"))
        .arg("--base-url")
        .arg(format!("http://{addr}/api/v1/"))
        .args(args)
        .env_remove("REGISTRY_API_URL")
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

fn stderr(output: &Output) -> String {
    String::from_utf8(output.stderr.clone()).unwrap()
}

// --- call ---

#[test]
fn call_success_prints_status_and_exits_0() {
    let addr = start_server();
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("serde.json");

    let output = run(addr, &["call", "crates/serde", ".crate", out.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "200\n");
    assert!(stderr(&output).is_empty());
    assert_eq!(fs::read_to_string(dir.path().join("serde.json.http")).unwrap(), "200");
}

#[test]
fn call_not_found_exits_0() {
    let addr = start_server();
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("missing.json");

    let output = run(addr, &["call", "crates/doesnotexist923", ".crate", out.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "404\n");
}

#[test]
fn call_unexpected_status_exits_12() {
    let addr = start_server();
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("down.json");

    let output = run(addr, &["call", "status/503", ".crate", out.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(12));
    assert!(stdout(&output).is_empty());
    assert_eq!(
        stderr(&output),
        format!(
            "maintenance^M\n^[[0m\nregistry-check: error: unexpected HTTP status 503 from http://{addr}/api/v1/status/503\n"
        )
    );
    assert_eq!(fs::read_to_string(dir.path().join("down.json.http")).unwrap(), "503");
}

#[test]
fn call_schema_mismatch_exits_12() {
    let addr = start_server();
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("serde.json");

    let output = run(addr, &["call", "crates/serde", ".nonexistent_field", out.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(12));
    assert!(stderr(&output).ends_with(&format!(
        "registry-check: error: response from http://{addr}/api/v1/crates/serde does not satisfy `.nonexistent_field`\n"
    )));
}

#[test]
fn call_invalid_expectation_exits_12() {
    let addr = start_server();
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("serde.json");

    let output = run(addr, &["call", "crates/serde", "crate", out.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(12));
    assert!(stderr(&output).starts_with("registry-check: error: invalid expectation `crate`"));
    assert!(!out.exists());
}

// --- scan ---

#[test]
fn scan_completed_exits_0() {
    let addr = start_server();

    let output = run(
        addr,
        &["scan", "--expect", ".crate", "crates/serde", "crates/doesnotexist923"],
    );

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "200 crates/serde\n404 crates/doesnotexist923\n");
}

#[test]
fn scan_failure_exits_12_after_earlier_output() {
    let addr = start_server();

    let output = run(addr, &["scan", "crates/serde", "status/500", "crates/tokio"]);

    assert_eq!(output.status.code(), Some(12));
    assert_eq!(stdout(&output), "200 crates/serde\n");
    assert!(stderr(&output).ends_with(&format!(
        "registry-check: error: unexpected HTTP status 500 from http://{addr}/api/v1/status/500\n"
    )));
}

#[test]
fn scan_stopped_early_exits_8() {
    let addr = start_server();

    let output = run(
        addr,
        &[
            "scan",
            "--stop-on-not-found",
            "crates/serde",
            "crates/doesnotexist923",
            "crates/tokio",
        ],
    );

    assert_eq!(output.status.code(), Some(8));
    assert_eq!(stdout(&output), "200 crates/serde\n404 crates/doesnotexist923\n");
    assert!(!stderr(&output).contains("error:"));
}

#[test]
fn scan_stop_flag_without_not_found_exits_0() {
    let addr = start_server();

    let output = run(addr, &["scan", "--stop-on-not-found", "crates/serde", "crates/tokio"]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "200 crates/serde\n200 crates/tokio\n");
}
