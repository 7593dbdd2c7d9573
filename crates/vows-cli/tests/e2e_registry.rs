//! E2E CLI tests covering:
//! - `vows init` for the local and sqlite backends
//! - add / remove / checkin round trips through the JSON contract
//! - list search and pagination
//! - CSV and xlsx import, including placeholder names and unsupported formats
//! - corrupt local data falling back to the sample list with a failing exit
//!
//! Each test runs the `vows` binary as a subprocess in an isolated temp directory.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Test Harness
// ---------------------------------------------------------------------------

/// Build a Command targeting the vows binary, rooted in `dir`.
fn vows_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("vows"));
    cmd.current_dir(dir);
    cmd.env("VOWS_LOG", "error");
    cmd.env_remove("FORMAT");
    cmd.env_remove("VOWS_API_KEY");
    // keep the user config out of the picture
    cmd.env("XDG_CONFIG_HOME", dir.join(".user-config"));
    cmd.env("HOME", dir);
    cmd
}

fn init_project(dir: &Path, extra: &[&str]) {
    let mut args = vec!["init"];
    args.extend_from_slice(extra);
    vows_cmd(dir).args(&args).assert().success();
}

fn json(dir: &Path, args: &[&str]) -> Value {
    let output = vows_cmd(dir)
        .args(args)
        .arg("--json")
        .output()
        .expect("vows should not crash");
    assert!(
        output.status.success(),
        "{args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("--json should produce valid JSON")
}

fn add_guest(dir: &Path, name: &str, table: &str) -> Value {
    json(dir, &["add", "--name", name, "--table", table])
}

fn ids(list: &Value) -> Vec<i64> {
    list["guests"]
        .as_array()
        .expect("guests array")
        .iter()
        .map(|g| g["id"].as_i64().expect("id"))
        .collect()
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

#[test]
fn init_seeds_sample_guests() {
    let dir = TempDir::new().expect("tempdir");
    init_project(dir.path(), &[]);
    assert!(dir.path().join(".vows/config.toml").exists());

    let stats = json(dir.path(), &["stats"]);
    assert_eq!(stats["total"], 6);
    assert_eq!(stats["checked_in"], 2);
    assert_eq!(stats["awaited"], 4);
    assert_eq!(stats["vip"], 4);
}

#[test]
fn init_twice_requires_force() {
    let dir = TempDir::new().expect("tempdir");
    init_project(dir.path(), &[]);
    vows_cmd(dir.path())
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));
    init_project(dir.path(), &["--force", "--empty"]);
    assert_eq!(json(dir.path(), &["stats"])["total"], 0);
}

#[test]
fn commands_outside_a_registry_fail() {
    let dir = TempDir::new().expect("tempdir");
    vows_cmd(dir.path())
        .args(["list", "--json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("E1001"));
}

#[test]
fn remote_init_requires_url() {
    let dir = TempDir::new().expect("tempdir");
    vows_cmd(dir.path())
        .args(["init", "--backend", "remote"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--url"));
}

// ---------------------------------------------------------------------------
// Guests
// ---------------------------------------------------------------------------

#[test]
fn add_takes_max_id_plus_one_and_persists() {
    let dir = TempDir::new().expect("tempdir");
    init_project(dir.path(), &[]);

    let zara = add_guest(dir.path(), "Zara", "5");
    assert_eq!(zara["id"], 7);
    assert_eq!(zara["table"], "5");
    assert_eq!(zara["checkedIn"], false);

    let amir = json(dir.path(), &["add", "--name", "  Amir  ", "--vip"]);
    assert_eq!(amir["id"], 8);
    assert_eq!(amir["name"], "Amir");
    assert_eq!(amir["table"], "Unassigned");
    assert_eq!(amir["vip"], true);

    assert_eq!(json(dir.path(), &["next-id"])["next_id"], 9);
    assert!(dir.path().join(".vows/guestList.json").exists());
}

#[test]
fn blank_name_is_rejected() {
    let dir = TempDir::new().expect("tempdir");
    init_project(dir.path(), &[]);
    vows_cmd(dir.path())
        .args(["add", "--name", "   ", "--json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("E2003"));
    assert_eq!(json(dir.path(), &["stats"])["total"], 6);
}

#[test]
fn remove_keeps_other_ids() {
    let dir = TempDir::new().expect("tempdir");
    init_project(dir.path(), &[]);

    let removed = json(dir.path(), &["remove", "3"]);
    assert_eq!(removed["ok"], true);

    let list = json(dir.path(), &["list", "--all"]);
    assert_eq!(ids(&list), vec![1, 2, 4, 5, 6]);
}

#[test]
fn remove_unknown_id_fails() {
    let dir = TempDir::new().expect("tempdir");
    init_project(dir.path(), &[]);
    vows_cmd(dir.path())
        .args(["remove", "42"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("guest 42 not found"));
}

#[test]
fn checkin_toggles_and_untoggles() {
    let dir = TempDir::new().expect("tempdir");
    init_project(dir.path(), &[]);

    let guest = json(dir.path(), &["checkin", "2"]);
    assert_eq!(guest["checkedIn"], true);
    assert_eq!(json(dir.path(), &["stats"])["checked_in"], 3);

    let guest = json(dir.path(), &["checkin", "2"]);
    assert_eq!(guest["checkedIn"], false);
    assert_eq!(json(dir.path(), &["stats"])["checked_in"], 2);
}

// ---------------------------------------------------------------------------
// Read
// ---------------------------------------------------------------------------

#[test]
fn list_search_is_case_insensitive() {
    let dir = TempDir::new().expect("tempdir");
    init_project(dir.path(), &[]);
    let list = json(dir.path(), &["list", "--search", "SARAH"]);
    assert_eq!(list["matched"], 1);
    assert_eq!(list["guests"][0]["name"], "Lady Sarah Montgomery");
    assert_eq!(list["stats"]["total"], 6);
}

#[test]
fn list_pages_of_ten() {
    let dir = TempDir::new().expect("tempdir");
    init_project(dir.path(), &["--empty"]);
    for n in 1..=23 {
        add_guest(dir.path(), &format!("Guest {n}"), "1");
    }

    let first = json(dir.path(), &["list"]);
    assert_eq!(first["guests"].as_array().map(Vec::len), Some(10));
    assert_eq!(first["total_pages"], 3);
    assert_eq!(first["pages"], serde_json::json!([1, 2, 3]));

    let last = json(dir.path(), &["list", "--page", "3"]);
    assert_eq!(ids(&last), vec![21, 22, 23]);

    let clamped = json(dir.path(), &["list", "--page", "99"]);
    assert_eq!(clamped["page"], 3);
}

#[test]
fn list_text_mode_is_tab_separated() {
    let dir = TempDir::new().expect("tempdir");
    init_project(dir.path(), &[]);
    vows_cmd(dir.path())
        .args(["list", "--format", "text", "--search", "duke"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("id\tname\ttable\tchecked_in\tvip\n"))
        .stdout(predicate::str::contains("6\tDuke of Cambridge\t1\tno\tyes"));
}

// ---------------------------------------------------------------------------
// Import
// ---------------------------------------------------------------------------

#[test]
fn import_csv_adds_batch_with_placeholders() {
    let dir = TempDir::new().expect("tempdir");
    init_project(dir.path(), &[]);
    let csv = dir.path().join("guests.csv");
    std::fs::write(&csv, "Name,Table,VIP\nAda,4,VIP\n,2,\nCy,,vip\n").expect("write csv");

    let report = json(dir.path(), &["import", csv.to_str().expect("utf8 path")]);
    assert_eq!(report["imported"], 3);
    let guests = report["guests"].as_array().expect("guests");
    assert_eq!(guests[0]["id"], 7);
    assert_eq!(guests[0]["vip"], true);
    assert_eq!(guests[1]["name"], "Guest 2");
    assert_eq!(guests[2]["table"], "Unassigned");
    assert_eq!(guests[2]["vip"], true);
    assert!(guests.iter().all(|g| g["checkedIn"] == false));

    assert_eq!(json(dir.path(), &["stats"])["total"], 9);
}

#[test]
fn import_header_only_adds_nothing() {
    let dir = TempDir::new().expect("tempdir");
    init_project(dir.path(), &[]);
    let csv = dir.path().join("empty.csv");
    std::fs::write(&csv, "Name,Table,VIP\n").expect("write csv");

    vows_cmd(dir.path())
        .args(["import", csv.to_str().expect("utf8 path")])
        .assert()
        .success()
        .stdout(predicate::str::contains("No guests found"));
}

#[test]
fn import_xlsx_reads_first_sheet() {
    let dir = TempDir::new().expect("tempdir");
    init_project(dir.path(), &["--empty"]);
    let sheet = dir.path().join("guests.xlsx");

    let mut workbook = rust_xlsxwriter::Workbook::new();
    let guests = workbook.add_worksheet();
    guests.write_string(0, 0, "Name").expect("cell");
    guests.write_string(0, 1, "Table").expect("cell");
    guests.write_string(0, 2, "VIP").expect("cell");
    guests.write_string(1, 0, "Ada").expect("cell");
    guests.write_number(1, 1, 4).expect("cell");
    guests.write_string(1, 2, "VIP").expect("cell");
    guests.write_number(2, 1, 2).expect("cell");
    let ignored = workbook.add_worksheet();
    ignored.write_string(1, 0, "Not a guest").expect("cell");
    workbook.save(&sheet).expect("save workbook");

    let report = json(dir.path(), &["import", sheet.to_str().expect("utf8 path")]);
    assert_eq!(report["imported"], 2);
    let guests = report["guests"].as_array().expect("guests");
    assert_eq!(guests[0]["name"], "Ada");
    assert_eq!(guests[0]["table"], "4");
    assert_eq!(guests[0]["vip"], true);
    assert_eq!(guests[1]["name"], "Guest 2");
    assert_eq!(guests[1]["table"], "2");
}

#[test]
fn import_rejects_unknown_format() {
    let dir = TempDir::new().expect("tempdir");
    init_project(dir.path(), &[]);
    let sheet = dir.path().join("guests.ods");
    std::fs::write(&sheet, [0x50, 0x4b, 0x03, 0x04]).expect("write");

    vows_cmd(dir.path())
        .args(["import", sheet.to_str().expect("utf8 path")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("E3002"));
}

// ---------------------------------------------------------------------------
// Recovery and backends
// ---------------------------------------------------------------------------

#[test]
fn corrupt_local_data_falls_back_and_fails() {
    let dir = TempDir::new().expect("tempdir");
    init_project(dir.path(), &[]);
    std::fs::write(dir.path().join(".vows/guestList.json"), "[{\"id\": \"x\"}]")
        .expect("corrupt");

    let output = vows_cmd(dir.path())
        .args(["list", "--json", "--all"])
        .output()
        .expect("run");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to load saved guest list"));
    let list: Value = serde_json::from_slice(&output.stdout).expect("list still rendered");
    assert_eq!(ids(&list), vec![1, 2, 3, 4, 5, 6]);
}

#[test]
fn sqlite_backend_round_trip() {
    let dir = TempDir::new().expect("tempdir");
    init_project(dir.path(), &["--backend", "sqlite"]);
    assert!(dir.path().join(".vows/guests.db").exists());
    assert_eq!(json(dir.path(), &["stats"])["total"], 0);

    let ada = add_guest(dir.path(), "Ada", "");
    assert_eq!(ada["id"], 1);
    assert_eq!(ada["table"], "Unassigned");
    add_guest(dir.path(), "Bo", "2");

    assert_eq!(json(dir.path(), &["checkin", "2"])["checkedIn"], true);
    json(dir.path(), &["remove", "1"]);

    let list = json(dir.path(), &["list"]);
    assert_eq!(ids(&list), vec![2]);
    assert_eq!(list["guests"][0]["checkedIn"], true);
}

#[test]
fn completions_generate_script() {
    let dir = TempDir::new().expect("tempdir");
    vows_cmd(dir.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("vows"));
}
