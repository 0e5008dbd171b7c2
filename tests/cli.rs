#![cfg(not(target_arch = "wasm32"))]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use gpx_elevation_extend::{parse_gpx, ErrorKind};
use tempfile::{tempdir, TempDir};

fn cli() -> Command {
    Command::new(env!("CARGO_BIN_EXE_gpx-elevation-extend"))
}

/// Copy a fixture into a fresh directory so derived outputs land there.
fn staged(fixture: &str) -> (TempDir, PathBuf) {
    let dir = tempdir().unwrap();
    let input = dir.path().join(fixture);
    fs::copy(Path::new("tests/fixtures").join(fixture), &input).unwrap();
    (dir, input)
}

fn stdout_of(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr_of(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_help() {
    cli().arg("-h").assert().success();
}

#[test]
fn test_missing_elevation() {
    cli().arg("ride.gpx").assert().failure();
}

#[test]
fn test_writes_modified_file() {
    let (dir, input) = staged("climb.gpx");
    let expected = dir.path().join("climb_modified.gpx");

    let assert = cli().arg(&input).arg("5").assert().success();
    let stdout = stdout_of(assert.get_output());
    assert_eq!(
        stdout.trim_end(),
        format!("Elevation modified and written to {}", expected.display())
    );

    let data = parse_gpx(&fs::read_to_string(&expected).unwrap()).unwrap();
    assert_eq!(data.tracks.len(), 2);
    assert_eq!(data.tracks[1].segments[0].points.len(), 4);
    assert!(!dir.path().join("climb_modified_fake_time.gpx").exists());
}

#[test]
fn test_detach_writes_fake_time_file() {
    let (dir, input) = staged("climb.gpx");
    let expected = dir.path().join("climb_modified_fake_time.gpx");

    let assert = cli().arg(&input).arg("5").arg("--detach").assert().success();
    assert!(stdout_of(assert.get_output()).contains(&expected.display().to_string()));
    assert!(expected.exists());
    assert!(!dir.path().join("climb_modified.gpx").exists());
}

#[test]
fn test_explicit_output_and_json() {
    let (dir, input) = staged("climb.gpx");
    let output = dir.path().join("out.gpx");

    let assert = cli()
        .arg(&input)
        .arg("5")
        .arg("-o")
        .arg(&output)
        .arg("--json")
        .assert()
        .success();
    let summary: serde_json::Value =
        serde_json::from_str(&stdout_of(assert.get_output())).unwrap();
    assert_eq!(summary["output"], output.display().to_string());
    assert_eq!(summary["extension"]["pointCount"], 4);
    assert_eq!(summary["extension"]["trackName"], "Hill Repeats");
    assert!(output.exists());
}

#[test]
fn test_unreachable_threshold_fails_without_output() {
    let (dir, input) = staged("climb.gpx");

    let assert = cli()
        .arg(&input)
        .arg("25")
        .assert()
        .failure()
        .code(i32::from(ErrorKind::ThresholdUnreachable.exit_code()));
    let stderr = stderr_of(assert.get_output());
    assert!(stderr.contains("Error [thresholdUnreachable]"));
    assert!(stderr.contains("No points found to reach 25 m"));
    assert!(!dir.path().join("climb_modified.gpx").exists());
}

#[test]
fn test_missing_input_is_input_unavailable() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("absent.gpx");

    let assert = cli()
        .arg(&input)
        .arg("5")
        .assert()
        .failure()
        .code(i32::from(ErrorKind::InputUnavailable.exit_code()));
    assert!(stderr_of(assert.get_output()).contains("Error [inputUnavailable]"));
    assert!(!dir.path().join("absent_modified.gpx").exists());
}

#[test]
fn test_malformed_input() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("broken.gpx");
    fs::write(&input, "<gpx><trk><name>Broken</trk></gpx>").unwrap();

    cli()
        .arg(&input)
        .arg("5")
        .assert()
        .failure()
        .code(i32::from(ErrorKind::MalformedSource.exit_code()));
    assert!(!dir.path().join("broken_modified.gpx").exists());
}

#[test]
fn test_empty_document_is_structurally_empty() {
    let (dir, input) = staged("empty.gpx");

    cli()
        .arg(&input)
        .arg("5")
        .assert()
        .failure()
        .code(i32::from(ErrorKind::StructurallyEmpty.exit_code()));
    assert!(!dir.path().join("empty_modified.gpx").exists());
}

#[test]
fn test_non_positive_target_is_invalid() {
    let (_dir, input) = staged("climb.gpx");

    cli()
        .arg(&input)
        .arg("-5")
        .assert()
        .failure()
        .code(i32::from(ErrorKind::InvalidRequest.exit_code()));
}
