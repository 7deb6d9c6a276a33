//! Integration test suite driving the compiled `size-watch` binary.
//!
//! All tests invoke the binary via subprocess. The `CARGO_BIN_EXE_size-watch`
//! environment variable is automatically set by Cargo during `cargo test` to
//! point to the compiled binary for the current profile.
//!
//! The watch session ends on an operator signal (Enter on stdin), so the
//! live tests pipe stdin, generate filesystem activity, then write a newline
//! and collect the full output after a clean exit.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::thread::sleep;
use std::time::Duration;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_size-watch"))
}

/// Run a size-watch command that is expected to fail at startup.
/// Returns (stdout, stderr) as Strings.
fn run_startup_failure(args: &[&str]) -> (String, String) {
    let out = Command::new(binary())
        .args(args)
        .stdin(Stdio::null())
        .output()
        .expect("failed to invoke size-watch binary");
    let stdout = String::from_utf8_lossy(&out.stdout).to_string();
    let stderr = String::from_utf8_lossy(&out.stderr).to_string();
    assert!(
        !out.status.success(),
        "command {:?} expected to fail but exited successfully\nstdout: {}\nstderr: {}",
        args,
        stdout,
        stderr
    );
    (stdout, stderr)
}

/// Spawn a watch session with piped stdin/stdout/stderr.
fn spawn_watch(args: &[&str]) -> Child {
    Command::new(binary())
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn size-watch binary")
}

/// Send the operator shutdown signal (Enter) and collect stdout after exit.
fn finish_watch(mut child: Child) -> String {
    child
        .stdin
        .as_mut()
        .expect("stdin piped")
        .write_all(b"\n")
        .expect("failed to write shutdown newline");
    let out = child.wait_with_output().expect("failed to wait for binary");
    let stdout = String::from_utf8_lossy(&out.stdout).to_string();
    let stderr = String::from_utf8_lossy(&out.stderr).to_string();
    assert!(
        out.status.success(),
        "watch session failed\nstdout: {}\nstderr: {}",
        stdout,
        stderr
    );
    stdout
}

// ---------------------------------------------------------------------------
// Startup validation
// ---------------------------------------------------------------------------

/// Missing required folder argument is a usage error with non-zero exit.
#[test]
fn test_missing_folder_argument_fails() {
    let (_stdout, stderr) = run_startup_failure(&[]);
    assert!(
        stderr.contains("folder") || stderr.contains("Usage"),
        "usage error should mention the missing folder\nstderr: {}",
        stderr
    );
}

/// A folder that does not exist fails before watching starts.
#[test]
fn test_nonexistent_folder_fails() {
    let (_stdout, stderr) = run_startup_failure(&["/definitely/not/a/real/folder"]);
    assert!(
        stderr.contains("does not exist"),
        "startup error should name the problem\nstderr: {}",
        stderr
    );
}

/// An invalid glob filter fails before watching starts.
#[test]
fn test_invalid_filter_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (_stdout, stderr) =
        run_startup_failure(&["--filter", "[", dir.path().to_str().unwrap()]);
    assert!(
        stderr.contains("invalid filter"),
        "startup error should name the filter\nstderr: {}",
        stderr
    );
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// An empty folder with no activity produces both exact empty-report lines.
#[test]
fn test_empty_folder_reports_no_files_and_no_changes() {
    let dir = tempfile::tempdir().unwrap();
    let child = spawn_watch(&[dir.path().to_str().unwrap()]);
    let stdout = finish_watch(child);

    assert!(stdout.contains("Initial File Sizes"), "stdout: {}", stdout);
    assert!(stdout.contains("No files."), "stdout: {}", stdout);
    assert!(stdout.contains("No changes."), "stdout: {}", stdout);
}

/// The initial scan renders each file's size by successive division by 1024.
#[test]
fn test_initial_scan_lists_size_breakdown() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("data.bin"), vec![0u8; 2048]).unwrap();

    let child = spawn_watch(&[dir.path().to_str().unwrap()]);
    let stdout = finish_watch(child);

    assert!(stdout.contains("data.bin"), "stdout: {}", stdout);
    assert!(
        stdout.contains("2048 B, 2 kB, 0 MB, 0 GB"),
        "breakdown should be floor-truncated unit by unit\nstdout: {}",
        stdout
    );
}

/// The final report is JSON when requested; empty runs emit an empty array.
#[test]
fn test_json_report_on_empty_run() {
    let dir = tempfile::tempdir().unwrap();
    let child = spawn_watch(&["--json", dir.path().to_str().unwrap()]);
    let stdout = finish_watch(child);

    let json_part = stdout
        .lines()
        .skip_while(|l| !l.starts_with('['))
        .collect::<Vec<_>>()
        .join("\n");
    let parsed: serde_json::Value =
        serde_json::from_str(&json_part).expect("final report is valid JSON");
    assert_eq!(parsed, serde_json::json!([]));
}

// ---------------------------------------------------------------------------
// Live watching
// ---------------------------------------------------------------------------

/// A content change is observed, logged, and reflected in the final maximum.
#[test]
fn test_live_change_is_tracked_to_final_report() {
    let dir = tempfile::tempdir().unwrap();
    let child = spawn_watch(&[dir.path().to_str().unwrap()]);

    // Let the scan finish and the watch settle.
    sleep(Duration::from_millis(1200));

    let file = dir.path().join("grow.bin");
    std::fs::write(&file, vec![0u8; 500]).unwrap();
    sleep(Duration::from_millis(400));
    {
        let mut handle = std::fs::OpenOptions::new()
            .append(true)
            .open(&file)
            .unwrap();
        handle.write_all(&vec![0u8; 1000]).unwrap();
    }
    sleep(Duration::from_millis(1200));

    let stdout = finish_watch(child);

    assert!(
        stdout.contains("New size:"),
        "first observation should log a new-size line\nstdout: {}",
        stdout
    );
    assert!(stdout.contains("Maximum File Sizes"), "stdout: {}", stdout);
    assert!(stdout.contains("grow.bin"), "stdout: {}", stdout);
    assert!(
        stdout.contains("1500 B, 1 kB, 0 MB, 0 GB"),
        "final maximum should be the largest observed size\nstdout: {}",
        stdout
    );
    // Creation events are disabled by default and must never appear.
    assert!(
        !stdout.contains("Created:"),
        "disabled class leaked into output\nstdout: {}",
        stdout
    );
}

/// With --no-changed, filesystem activity leaves the report empty.
#[test]
fn test_no_changed_flag_disables_tracking() {
    let dir = tempfile::tempdir().unwrap();
    let child = spawn_watch(&["--no-changed", dir.path().to_str().unwrap()]);

    sleep(Duration::from_millis(1200));
    std::fs::write(dir.path().join("ignored.bin"), vec![0u8; 500]).unwrap();
    sleep(Duration::from_millis(1200));

    let stdout = finish_watch(child);

    assert!(!stdout.contains("New size:"), "stdout: {}", stdout);
    assert!(stdout.contains("No changes."), "stdout: {}", stdout);
}
