use std::fs;
use std::path::Path;

use assert_cmd::Command;
use tempfile::TempDir;

/// Write a config file that keeps the log and alerts files inside the temp
/// directory, with the given thresholds on top.
fn write_config(dir: &TempDir, extra: &str) -> std::path::PathBuf {
    let path = dir.path().join("config.json");
    let log_file = dir.path().join("hostwatch.log");
    let alerts_file = dir.path().join("alerts.json");
    let json = format!(
        r#"{{"log_file": "{}", "alerts_file": "{}"{}{}}}"#,
        log_file.display(),
        alerts_file.display(),
        if extra.is_empty() { "" } else { ", " },
        extra
    );
    fs::write(&path, json).unwrap();
    path
}

fn hostwatch() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("hostwatch"))
}

#[test]
fn once_mode_runs_a_single_pass() {
    let dir = TempDir::new().unwrap();
    let config = write_config(
        &dir,
        r#""cpu_threshold": 1000.0, "memory_threshold": 1000.0, "disk_threshold": 1000.0"#,
    );

    hostwatch()
        .args(["--once", "--config", config.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicates::str::contains("Running system check..."));
}

#[test]
fn breaches_are_logged_but_once_mode_does_not_flush() {
    let dir = TempDir::new().unwrap();
    // A negative CPU threshold and a zero memory threshold are always
    // breached on a live host.
    let config = write_config(
        &dir,
        r#""cpu_threshold": -1.0, "memory_threshold": 0.0, "disk_threshold": 1000.0"#,
    );

    hostwatch()
        .args(["--once", "--config", config.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicates::str::contains("High CPU usage"))
        .stdout(predicates::str::contains("High memory usage"));

    // Alerts only persist from the continuous loop.
    assert!(!dir.path().join("alerts.json").exists());
}

#[test]
fn cli_threshold_overrides_beat_the_config_file() {
    let dir = TempDir::new().unwrap();
    let config = write_config(
        &dir,
        r#""cpu_threshold": 1000.0, "memory_threshold": 1000.0, "disk_threshold": 1000.0"#,
    );

    hostwatch()
        .args(["--once", "--config", config.to_str().unwrap(), "--cpu-threshold=-1"])
        .assert()
        .success()
        .stdout(predicates::str::contains("High CPU usage"));
}

#[test]
fn unreadable_config_file_falls_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.json");
    fs::write(&config, "{not json").unwrap();

    // Defaults point the log file under $HOME; redirect it so the test does
    // not touch the real home directory.
    hostwatch()
        .env("HOME", dir.path())
        .args(["--once", "--config", config.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicates::str::contains("Failed to load config file"));
}

#[test]
fn log_lines_are_mirrored_to_the_log_file() {
    let dir = TempDir::new().unwrap();
    let config = write_config(
        &dir,
        r#""cpu_threshold": 1000.0, "memory_threshold": 1000.0, "disk_threshold": 1000.0"#,
    );

    hostwatch()
        .args(["--once", "--config", config.to_str().unwrap()])
        .assert()
        .success();

    let log_path = dir.path().join("hostwatch.log");
    assert!(Path::new(&log_path).exists());
    let log = fs::read_to_string(&log_path).unwrap();
    assert!(log.contains("Running system check..."));
}
