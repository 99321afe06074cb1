#![cfg(feature = "cli")]

use std::process::{Command, Output};

fn smcprims(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_smcprims"))
        .env_remove("SMCPRIMS_TRANSPORT")
        .env_remove("SMCPRIMS_LOG_LEVEL")
        .args(["--log-level", "error", "--transport", "sim"])
        .args(args)
        .output()
        .expect("smcprims should run")
}

fn stdout_json(output: &Output) -> serde_json::Value {
    let stdout = String::from_utf8(output.stdout.clone()).expect("stdout should be utf-8");
    serde_json::from_str(stdout.trim()).expect("stdout should be one JSON document")
}

#[test]
fn read_prints_decoded_fixed_point() {
    let output = smcprims(&["--format", "json", "read", "F0Ac"]);
    assert_eq!(output.status.code(), Some(0));

    let json = stdout_json(&output);
    assert_eq!(json["key"], "F0Ac");
    assert_eq!(json["data_type"], "fpe2");
    assert_eq!(json["size"], 2);
    assert_eq!(json["bytes"], "1f 38");
    assert_eq!(json["value"]["kind"], "fixed_point");
    assert_eq!(json["value"]["value"], 1998.0);
}

#[test]
fn read_pads_short_key_names() {
    let output = smcprims(&["--format", "json", "read", "FS!"]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout_json(&output)["key"], "FS! ");
}

#[test]
fn read_unknown_key_exits_not_found() {
    let output = smcprims(&["--format", "json", "read", "ZZZZ"]);
    assert_eq!(output.status.code(), Some(4));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ZZZZ"), "stderr: {stderr}");
}

#[test]
fn read_invalid_key_is_usage_error() {
    let output = smcprims(&["read", "TOOLONG"]);
    assert_eq!(output.status.code(), Some(64));
}

#[test]
fn list_walks_every_demo_key() {
    let output = smcprims(&["--format", "json", "list"]);
    assert_eq!(output.status.code(), Some(0));

    let json = stdout_json(&output);
    assert_eq!(json["count"], 17);
    let keys = json["keys"].as_array().expect("keys array");
    assert_eq!(keys[0]["key"], "FNum");
    assert_eq!(keys[0]["value"]["value"], 2);
}

#[test]
fn list_honours_limit() {
    let output = smcprims(&["--format", "json", "list", "--limit", "3"]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout_json(&output)["count"], 3);
}

#[test]
fn fans_reports_both_demo_fans() {
    let output = smcprims(&["--format", "json", "fans"]);
    assert_eq!(output.status.code(), Some(0));

    let json = stdout_json(&output);
    assert_eq!(json["total"], 2);
    assert_eq!(json["fans"][0]["mode"], "auto");
    assert_eq!(json["fans"][1]["mode"], "forced");
    assert_eq!(json["fans"][1]["maximum"], 5700.0);
}

#[test]
fn fans_pretty_output_lists_each_fan() {
    let output = smcprims(&["--format", "pretty", "fans"]);
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Total fans in system: 2"));
    assert!(stdout.contains("Fan #1:"));
    assert!(stdout.contains("Actual speed : 2160"));
}

#[test]
fn write_matching_size_succeeds() {
    let output = smcprims(&["--format", "json", "write", "FS! ", "0003"]);
    assert_eq!(output.status.code(), Some(0));
    let json = stdout_json(&output);
    assert_eq!(json["written"], true);
    assert_eq!(json["bytes"], "00 03");
}

#[test]
fn write_size_mismatch_is_rejected() {
    let output = smcprims(&["write", "FNum", "0102"]);
    assert_eq!(output.status.code(), Some(60));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("size"), "stderr: {stderr}");
}

#[test]
fn write_bad_hex_is_usage_error() {
    let output = smcprims(&["write", "FNum", "0g"]);
    assert_eq!(output.status.code(), Some(64));
}

#[test]
fn version_does_not_need_a_controller() {
    let output = Command::new(env!("CARGO_BIN_EXE_smcprims"))
        .args(["--transport", "iokit", "version"])
        .output()
        .expect("smcprims should run");
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("smcprims "));
}
