// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies
//
// nx-v4l2 CLI Tests
//
// TESTING LAYERS:
//
// Layer 1 (Fixture Tests - No hardware required):
//   - Help text and command structure
//   - Invalid argument handling and exit codes
//   - list/open/mipi/link against a temporary sysfs and /dev tree
//
// Layer 3 (Hardware Integration - Requires a Nexell capture pipeline):
//   - list and topology on the live system
//
// RUN LAYER 1:
//   cargo test --test cli
//
// RUN LAYER 3 (on hardware):
//   cargo test --test cli -- --ignored --nocapture

use assert_cmd::Command;
use predicates::prelude::*;
use serial_test::serial;
use std::{env, fs, path::Path};
use tempfile::TempDir;

/// Helper to create a Command for the nx-v4l2 binary
/// Uses NX_V4L2_BIN environment variable if set, otherwise the cargo-built binary
fn nx_v4l2_cmd() -> Command {
    if let Ok(bin_path) = env::var("NX_V4L2_BIN") {
        Command::new(bin_path)
    } else {
        Command::cargo_bin("nx-v4l2").unwrap()
    }
}

/// Temporary system tree: sensor 0 on MIPI, clipper 0 and its video node.
/// The media device is left out so no graph is available.
fn fixture() -> TempDir {
    let root = tempfile::tempdir().unwrap();
    let sensor = root.path().join("platform/camerasensor0");
    fs::create_dir_all(&sensor).unwrap();
    fs::write(sensor.join("info"), "is_mipi:1,name:sensorX\n").unwrap();
    fs::create_dir_all(root.path().join("dev")).unwrap();

    for (node, name) in [
        ("v4l-subdev0", "sensorX 0-0030"),
        ("v4l-subdev1", "nx-csi"),
        ("v4l-subdev2", "nx-clipper0"),
        ("video3", "VIDEO CLIPPER0"),
    ] {
        let dir = root.path().join("class").join(node);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("name"), format!("{}\n", name)).unwrap();
        fs::write(root.path().join("dev").join(node), b"").unwrap();
    }
    root
}

/// Command with discovery pointed at `root`
fn fixture_cmd(root: &Path) -> Command {
    let mut cmd = nx_v4l2_cmd();
    cmd.env("NX_V4L2_PLATFORM_DIR", root.join("platform"))
        .env("NX_V4L2_CLASS_DIR", root.join("class"))
        .env("NX_V4L2_DEV_DIR", root.join("dev"))
        .env("NX_V4L2_MEDIA_DEVICE", root.join("dev/media0"));
    cmd
}

// =============================================================================
// Layer 1: Basic Command Tests
// =============================================================================

#[test]
fn test_cli_help() {
    nx_v4l2_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("open"))
        .stdout(predicate::str::contains("link"))
        .stdout(predicate::str::contains("topology"))
        .stdout(predicate::str::contains("mipi"));
}

#[test]
fn test_cli_version() {
    nx_v4l2_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("nx-v4l2"));
}

#[test]
fn test_link_help() {
    nx_v4l2_cmd()
        .args(["link", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ROLE[:PAD]"))
        .stdout(predicate::str::contains("--disable"))
        .stdout(predicate::str::contains("--instance"));
}

#[test]
fn test_unknown_role() {
    nx_v4l2_cmd()
        .args(["open", "scaler"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("unknown role"));
}

#[test]
fn test_no_subcommand() {
    nx_v4l2_cmd().assert().failure().code(2);
}

// =============================================================================
// Layer 1: Fixture Tests
// =============================================================================

#[test]
fn test_list_json() {
    let root = fixture();
    let output = fixture_cmd(root.path())
        .args(["list", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let devices = value["devices"].as_array().unwrap();
    assert_eq!(devices.len(), 4);
    assert_eq!(devices[0]["role"], "sensor");
    assert_eq!(devices[0]["name"], "sensorX");
    assert_eq!(devices[0]["mipi"], true);
    assert_eq!(
        devices[3]["node"],
        root.path().join("dev/video3").display().to_string()
    );
    assert_eq!(value["summary"]["video_nodes"], 1);
    assert_eq!(value["summary"]["entities"], 0);
}

#[test]
fn test_list_text() {
    let root = fixture();
    fixture_cmd(root.path())
        .args(["list", "--role", "clipper", "--all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("clipper 0:"))
        .stdout(predicate::str::contains("clipper 2: absent"));
}

#[test]
fn test_open_present_device() {
    let root = fixture();
    fixture_cmd(root.path())
        .args(["open", "clipper-video", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("video3"))
        .stdout(predicate::str::contains("capture multi-planar"));
}

#[test]
fn test_open_absent_device() {
    let root = fixture();
    fixture_cmd(root.path())
        .args(["open", "mpegts-video", "1"])
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("Device not found"));
}

#[test]
fn test_open_invalid_instance() {
    let root = fixture();
    fixture_cmd(root.path())
        .args(["open", "csi", "1"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_mipi() {
    let root = fixture();
    let output = fixture_cmd(root.path())
        .args(["mipi", "0", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["mipi"], true);

    fixture_cmd(root.path())
        .args(["mipi", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("not a MIPI camera"));
}

#[test]
fn test_link_without_media_graph() {
    // Without a media graph no entity has pads, so every pad is out of range
    let root = fixture();
    fixture_cmd(root.path())
        .args(["link", "sensor:0", "csi:0"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("pad"));
}

#[test]
fn test_link_same_role() {
    let root = fixture();
    fixture_cmd(root.path())
        .args(["link", "clipper:1", "clipper:0"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_topology_without_media_device() {
    let root = fixture();
    fixture_cmd(root.path())
        .arg("topology")
        .assert()
        .failure()
        .stderr(predicate::str::contains("media0"));
}

// =============================================================================
// Layer 3: Hardware Tests
// =============================================================================

#[test]
#[serial]
#[ignore = "requires a Nexell capture pipeline (run with --ignored on hardware)"]
fn test_list_hardware() {
    nx_v4l2_cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Nexell pipeline"));
}

#[test]
#[serial]
#[ignore = "requires a Nexell capture pipeline (run with --ignored on hardware)"]
fn test_topology_hardware() {
    nx_v4l2_cmd()
        .args(["topology", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"entities\""));
}
