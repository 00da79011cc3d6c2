//! End-to-end tests for the input validation and config surfaces.

use assert_cmd::Command;
use predicates::prelude::*;

fn lector() -> Command {
    Command::cargo_bin("lector").unwrap()
}

#[test]
fn test_process_missing_file_reports_code() {
    lector()
        .args(["process", "no/such/photo.png"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("FILE_NOT_FOUND"));
}

#[test]
fn test_process_rejects_unknown_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scan.tiff");
    std::fs::write(&path, b"II*\x00").unwrap();

    lector()
        .args(["process", path.to_str().unwrap()])
        .assert()
        .failure()
        .stdout(predicate::str::contains("INVALID_FORMAT"));
}

#[test]
fn test_batch_requires_matching_files() {
    lector()
        .args(["batch", "no/such/dir/*.jpg"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No matching files"));
}

#[test]
fn test_config_show_prints_defaults() {
    lector()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("detection"))
        .stdout(predicate::str::contains("extraction"));
}

#[test]
fn test_config_init_and_get() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lector.json");

    lector()
        .args(["config", "init", "--output", path.to_str().unwrap()])
        .assert()
        .success();

    lector()
        .args(["--config", path.to_str().unwrap(), "config", "get", "ocr.lang"])
        .assert()
        .success()
        .stdout(predicate::str::contains("spa"));
}
