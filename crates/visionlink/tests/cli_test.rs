//! Integration tests for the `visionlink` CLI binary.
//!
//! Every test runs against a throwaway JSON snapshot, so no vision server
//! or user configuration is involved.
#![allow(clippy::unwrap_used)]

use std::path::{Path, PathBuf};

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::{Value, json};
use tempfile::TempDir;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `visionlink` binary with env isolation.
///
/// Clears all `VISIONLINK_*` env vars and points config directories at
/// `home` so tests never touch the user's real configuration.
fn visionlink_cmd(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("visionlink");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("VISIONLINK_SNAPSHOT")
        .env_remove("VISIONLINK_OUTPUT")
        .env_remove("VISIONLINK_ROOT_TABLE")
        .env_remove("VISIONLINK_TARGETS_TABLE")
        .env_remove("VISIONLINK_TARGET_FRESHNESS_MS")
        .env_remove("RUST_LOG");
    cmd
}

fn fixture() -> Value {
    json!({
        "Vision Server": {
            "Cameras Available": 2,
            "Camera Index": 0,
            "Pipelines Available": 2,
            "Pipeline Index": 1,
            "Active Target": "hub",
            "Show Statistics": false,
            "Enable Processing": true,
            "Cameras": {
                "front": { "Exposure": 20, "Brightness": 50, "WhiteBalance": 4500 },
                "rear": { "Exposure": 10, "Brightness": 40, "WhiteBalance": 3000 }
            },
            "Pipelines": {
                "cargo": {
                    "Enable Processing": true,
                    "Source Index": 2,
                    "Show Debug View": false,
                    "Show Threshold": false
                },
                "hatch": { "Enable Processing": false, "Source Index": -1 }
            },
            "Streams": {
                "driver": { "Port": 1181, "Source Index": 1 }
            }
        },
        "Targets": {
            "hub": {
                "x": 0.5, "y": 0.0, "z": 1.0,
                "distance": 3.5, "up-down": 1.0, "left-right": -2.0
            }
        }
    })
}

/// Temp dir holding `snapshot.json` written from [`fixture`].
fn workspace() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("snapshot.json");
    std::fs::write(&path, serde_json::to_string_pretty(&fixture()).unwrap()).unwrap();
    (dir, path)
}

fn with_snapshot(dir: &TempDir, snapshot: &Path) -> assert_cmd::Command {
    let mut cmd = visionlink_cmd(dir.path());
    cmd.arg("--snapshot").arg(snapshot);
    cmd
}

fn read_snapshot(path: &Path) -> Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let dir = tempfile::tempdir().unwrap();
    let output = visionlink_cmd(dir.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_lists_commands() {
    let dir = tempfile::tempdir().unwrap();
    visionlink_cmd(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("cameras")
                .and(predicate::str::contains("pipelines"))
                .and(predicate::str::contains("target")),
        );
}

#[test]
fn test_version_flag() {
    let dir = tempfile::tempdir().unwrap();
    visionlink_cmd(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("visionlink"));
}

#[test]
fn test_completions_bash() {
    let dir = tempfile::tempdir().unwrap();
    visionlink_cmd(dir.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_missing_snapshot_is_a_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    visionlink_cmd(dir.path())
        .args(["cameras", "list"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No snapshot"));
}

#[test]
fn test_unreadable_snapshot_fails() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.json");
    with_snapshot(&dir, &missing)
        .args(["status"])
        .assert()
        .code(1);
}

// ── Listing ─────────────────────────────────────────────────────────

#[test]
fn test_cameras_list_plain_keeps_enumeration_order() {
    let (dir, snap) = workspace();
    with_snapshot(&dir, &snap)
        .args(["-o", "plain", "cameras", "list"])
        .assert()
        .success()
        .stdout("front\nrear\n");
}

#[test]
fn test_cameras_list_json_reports_settings_and_selection() {
    let (dir, snap) = workspace();
    let output = with_snapshot(&dir, &snap)
        .args(["-o", "json", "cameras", "list"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let cameras = stdout_json(&output);
    assert_eq!(cameras[0]["name"], "front");
    assert_eq!(cameras[0]["selected"], true);
    assert_eq!(cameras[1]["exposure"], 10);
    assert_eq!(cameras[1]["index"], 1);
}

#[test]
fn test_pipelines_list_resolves_sources() {
    let (dir, snap) = workspace();
    let output = with_snapshot(&dir, &snap)
        .args(["-o", "json", "pipelines", "list"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let pipelines = stdout_json(&output);
    // cargo: +2 is camera 1; hatch: -1 is pipeline 0.
    assert_eq!(pipelines[0]["source_name"], "rear");
    assert_eq!(pipelines[0]["debug_key"], "Show Debug View");
    assert_eq!(pipelines[1]["source_name"], "cargo");
    assert_eq!(pipelines[1]["selected"], true);
}

#[test]
fn test_streams_list_uses_stream_convention() {
    let (dir, snap) = workspace();
    let output = with_snapshot(&dir, &snap)
        .args(["-o", "json", "streams", "list"])
        .output()
        .unwrap();
    let streams = stdout_json(&output);
    assert_eq!(streams[0]["port"], 1181);
    // +1 on a stream is pipeline 0.
    assert_eq!(streams[0]["source_name"], "cargo");
}

#[test]
fn test_pipeline_show_lists_entries() {
    let (dir, snap) = workspace();
    with_snapshot(&dir, &snap)
        .args(["-o", "plain", "pipelines", "show", "cargo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Source Index=2"));
}

// ── Selection ───────────────────────────────────────────────────────

#[test]
fn test_select_by_name_persists_with_write() {
    let (dir, snap) = workspace();
    with_snapshot(&dir, &snap)
        .args(["--write", "cameras", "select", "rear"])
        .assert()
        .success()
        .stdout("rear\n");
    let saved = read_snapshot(&snap);
    assert_eq!(saved["Vision Server"]["Camera Index"].as_f64(), Some(1.0));
}

#[test]
fn test_select_without_write_leaves_file_alone() {
    let (dir, snap) = workspace();
    with_snapshot(&dir, &snap)
        .args(["cameras", "select", "1"])
        .assert()
        .success()
        .stderr(predicate::str::contains("--write"));
    let saved = read_snapshot(&snap);
    assert_eq!(saved["Vision Server"]["Camera Index"].as_f64(), Some(0.0));
}

#[test]
fn test_select_out_of_range_index() {
    let (dir, snap) = workspace();
    with_snapshot(&dir, &snap)
        .args(["pipelines", "select", "7"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("out of range"));
}

#[test]
fn test_select_unknown_name() {
    let (dir, snap) = workspace();
    with_snapshot(&dir, &snap)
        .args(["cameras", "select", "side"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("cameras list"));
}

#[test]
fn test_next_wraps_to_first() {
    let (dir, snap) = workspace();
    // Pipeline index starts at 1 of 2.
    with_snapshot(&dir, &snap)
        .args(["-w", "pipelines", "next"])
        .assert()
        .success()
        .stdout("cargo\n")
        .stderr(predicate::str::contains("Wrapped"));
    let saved = read_snapshot(&snap);
    assert_eq!(saved["Vision Server"]["Pipeline Index"].as_f64(), Some(0.0));
}

#[test]
fn test_prev_wraps_to_last() {
    let (dir, snap) = workspace();
    with_snapshot(&dir, &snap)
        .args(["cameras", "prev"])
        .assert()
        .success()
        .stdout("rear\n");
}

// ── Writes ──────────────────────────────────────────────────────────

#[test]
fn test_pipeline_debug_view_toggle() {
    let (dir, snap) = workspace();
    with_snapshot(&dir, &snap)
        .args(["-w", "pipelines", "debug", "cargo", "on"])
        .assert()
        .success();
    let saved = read_snapshot(&snap);
    assert_eq!(
        saved["Vision Server"]["Pipelines"]["cargo"]["Show Debug View"],
        true
    );
}

#[test]
fn test_pipeline_without_threshold_entry() {
    let (dir, snap) = workspace();
    with_snapshot(&dir, &snap)
        .args(["pipelines", "threshold", "hatch", "on"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("threshold"));
}

#[test]
fn test_camera_preset_writes_every_camera() {
    let (dir, snap) = workspace();
    with_snapshot(&dir, &snap)
        .args([
            "-w",
            "cameras",
            "preset",
            "--brightness",
            "60",
            "--exposure",
            "5",
            "--white-balance",
            "5000",
        ])
        .assert()
        .success();
    let saved = read_snapshot(&snap);
    for name in ["front", "rear"] {
        let cam = &saved["Vision Server"]["Cameras"][name];
        assert_eq!(cam["Brightness"].as_f64(), Some(60.0));
        assert_eq!(cam["Exposure"].as_f64(), Some(5.0));
        assert_eq!(cam["WhiteBalance"].as_f64(), Some(5000.0));
    }
}

#[test]
fn test_stats_toggle_flips_value() {
    let (dir, snap) = workspace();
    with_snapshot(&dir, &snap)
        .args(["-o", "plain", "-w", "stats", "toggle"])
        .assert()
        .success()
        .stdout("true\n");
    with_snapshot(&dir, &snap)
        .args(["-o", "plain", "stats", "show"])
        .assert()
        .success()
        .stdout("true\n");
}

#[test]
fn test_processing_show() {
    let (dir, snap) = workspace();
    with_snapshot(&dir, &snap)
        .args(["processing", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Enable Processing: on"));
}

// ── Target ──────────────────────────────────────────────────────────

#[test]
fn test_target_json() {
    let (dir, snap) = workspace();
    let output = with_snapshot(&dir, &snap)
        .args(["-o", "json", "target", "--max-age-ms", "600000"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let target = stdout_json(&output);
    assert_eq!(target["name"], "hub");
    assert_eq!(target["distance"], 3.5);
    assert_eq!(target["offset"]["z"], 1.0);
}

#[test]
fn test_target_expect_mismatch() {
    let (dir, snap) = workspace();
    with_snapshot(&dir, &snap)
        .args(["target", "--expect", "goal"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("expected 'goal'"));
}

#[test]
fn test_status_summary() {
    let (dir, snap) = workspace();
    let output = with_snapshot(&dir, &snap)
        .args(["-o", "json", "status"])
        .output()
        .unwrap();
    let status = stdout_json(&output);
    assert_eq!(status["link"], "Connected");
    assert_eq!(status["cameras"], 2);
    assert_eq!(status["in_sync"], true);
    assert_eq!(status["selected_pipeline"], "hatch");
    assert_eq!(status["active_target"], "hub");
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_init_then_show() {
    let dir = tempfile::tempdir().unwrap();
    visionlink_cmd(dir.path())
        .args(["config", "init"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Config written"));
    visionlink_cmd(dir.path())
        .args(["config", "init"])
        .assert()
        .code(2);
    visionlink_cmd(dir.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("root_table = \"Vision Server\""));
}

#[test]
fn test_config_snapshot_from_env() {
    let (dir, snap) = workspace();
    visionlink_cmd(dir.path())
        .env("VISIONLINK_SNAPSHOT", &snap)
        .args(["-o", "plain", "cameras", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("front"));
}
