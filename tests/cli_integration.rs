//! CLI integration tests for the shift ledger
//!
//! These tests drive the `shift` binary end to end: workspace setup, cell
//! edits, roster changes, retained history, export and recovery from
//! damaged records.

use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// A month safely in the past, so the forward limit never applies
const PAST_MONTH: &str = "2024-02";

/// Get a command instance for the shift binary, isolated from user config
fn shift_cmd(dir: &Path) -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("shift"));
    cmd.current_dir(dir).env("XDG_CONFIG_HOME", dir.join(".xdg"));
    cmd
}

/// Create a temporary directory and initialize a shift workspace
fn setup_workspace() -> TempDir {
    let dir = TempDir::new().unwrap();
    shift_cmd(dir.path()).arg("init").assert().success();
    dir
}

fn json_of(dir: &Path, args: &[&str]) -> serde_json::Value {
    let output = shift_cmd(dir)
        .args(args)
        .args(["--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success(), "command failed: {:?}", args);
    serde_json::from_slice(&output.stdout).unwrap()
}

// =============================================================================
// Initialization Tests
// =============================================================================

#[test]
fn test_init_creates_structure() {
    let dir = TempDir::new().unwrap();

    shift_cmd(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized shift workspace"));

    assert!(dir.path().join(".shift").is_dir());
    assert!(dir.path().join(".shift/config.toml").is_file());
    assert!(dir.path().join(".shift/.gitignore").is_file());
    assert!(dir.path().join(".shift/roster.json").is_file());
    assert!(dir.path().join(".shift/schedule.json").is_file());
}

#[test]
fn test_init_at_path() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("team");
    fs::create_dir_all(&target).unwrap();

    shift_cmd(dir.path()).arg("init").arg(&target).assert().success();

    assert!(target.join(".shift/roster.json").is_file());
}

#[test]
fn test_init_is_idempotent() {
    let dir = setup_workspace();

    shift_cmd(dir.path())
        .args(["staff", "rename", "1", "Renamed"])
        .assert()
        .success();
    shift_cmd(dir.path()).arg("init").assert().success();

    shift_cmd(dir.path())
        .args(["staff", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Renamed"));
}

#[test]
fn test_commands_require_workspace() {
    let dir = TempDir::new().unwrap();

    shift_cmd(dir.path())
        .arg("show")
        .assert()
        .failure()
        .stderr(predicate::str::contains("shift init"));
}

// =============================================================================
// Month Grid Tests
// =============================================================================

#[test]
fn test_show_lists_seed_roster() {
    let dir = setup_workspace();

    shift_cmd(dir.path())
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("田中"))
        .stdout(predicate::str::contains("佐藤"))
        .stdout(predicate::str::contains("鈴木"))
        .stdout(predicate::str::contains("日計(人)"));
}

#[test]
fn test_fresh_month_is_all_work() {
    let dir = setup_workspace();

    let report = json_of(dir.path(), &["show", "--month", PAST_MONTH]);

    assert_eq!(report["month"], PAST_MONTH);
    assert_eq!(report["days_in_month"], 29);
    assert_eq!(report["rows"].as_array().unwrap().len(), 3);
    assert!(report["daily_count"]
        .as_array()
        .unwrap()
        .iter()
        .all(|count| count == 3));
    assert_eq!(report["understaffed_days"].as_array().unwrap().len(), 0);
    assert_eq!(report["rows"][0]["days"][0], "WORK");
}

#[test]
fn test_toggle_updates_stats() {
    let dir = setup_workspace();

    shift_cmd(dir.path())
        .args(["toggle", "田中", "5", "--month", PAST_MONTH])
        .assert()
        .success()
        .stdout(predicate::str::contains("休み"));

    let stats = json_of(dir.path(), &["stats", "--month", PAST_MONTH]);

    assert_eq!(stats["understaffed_days"], serde_json::json!([5]));
    assert_eq!(stats["daily_count"][4], 2);
    assert_eq!(stats["rows"][0]["work_days"], 28);
    assert_eq!(stats["rows"][1]["work_days"], 29);
}

#[test]
fn test_toggle_cycles_through_three_statuses() {
    let dir = setup_workspace();
    let toggle = |expected: &str| {
        shift_cmd(dir.path())
            .args(["toggle", "2", "1", "--month", PAST_MONTH])
            .assert()
            .success()
            .stdout(predicate::str::contains(expected.to_string()));
    };

    toggle("休み");
    toggle("希望休");
    toggle("出勤");
}

#[test]
fn test_set_explicit_status() {
    let dir = setup_workspace();

    let change = json_of(
        dir.path(),
        &["set", "鈴木", "29", "request", "--month", PAST_MONTH],
    );
    assert_eq!(change["status"], "REQUEST");
    assert_eq!(change["day"], 29);

    let report = json_of(dir.path(), &["show", "--month", PAST_MONTH]);
    assert_eq!(report["rows"][2]["days"][28], "REQUEST");
    assert_eq!(report["understaffed_days"], serde_json::json!([29]));
}

#[test]
fn test_day_outside_month_fails() {
    let dir = setup_workspace();

    shift_cmd(dir.path())
        .args(["toggle", "1", "30", "--month", PAST_MONTH])
        .assert()
        .failure()
        .stderr(predicate::str::contains("out of range"));
}

#[test]
fn test_unknown_staff_fails() {
    let dir = setup_workspace();

    shift_cmd(dir.path())
        .args(["toggle", "山田", "1", "--month", PAST_MONTH])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown staff member"));
}

// =============================================================================
// Month Window Tests
// =============================================================================

#[test]
fn test_forward_limit_is_enforced() {
    let dir = setup_workspace();

    shift_cmd(dir.path())
        .args(["show", "--offset", "2"])
        .assert()
        .success();

    shift_cmd(dir.path())
        .args(["show", "--offset", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("up to 2 month"));
}

#[test]
fn test_past_months_are_reachable() {
    let dir = setup_workspace();

    shift_cmd(dir.path())
        .args(["show", "--month", "2019-04"])
        .assert()
        .success();
    shift_cmd(dir.path())
        .args(["show", "--offset", "-30"])
        .assert()
        .success();
}

#[test]
fn test_forward_limit_from_config() {
    let dir = setup_workspace();
    fs::write(
        dir.path().join(".shift/config.toml"),
        "forward_month_limit = 0\n",
    )
    .unwrap();

    shift_cmd(dir.path())
        .args(["show", "--offset", "1"])
        .assert()
        .failure();
}

#[test]
fn test_min_staff_from_config() {
    let dir = setup_workspace();
    fs::write(
        dir.path().join(".shift/config.toml"),
        "min_staff_per_day = 4\n",
    )
    .unwrap();

    let stats = json_of(dir.path(), &["stats", "--month", PAST_MONTH]);

    assert_eq!(stats["min_staff_per_day"], 4);
    assert_eq!(stats["understaffed_days"].as_array().unwrap().len(), 29);
}

// =============================================================================
// Staff Tests
// =============================================================================

#[test]
fn test_staff_add_rename_remove() {
    let dir = setup_workspace();

    let added = json_of(dir.path(), &["staff", "add", "高橋"]);
    let id = added["id"].as_str().unwrap().to_string();
    assert_eq!(added["name"], "高橋");

    shift_cmd(dir.path())
        .args(["staff", "rename", &id, "高田"])
        .assert()
        .success()
        .stdout(predicate::str::contains("高橋 -> 高田"));

    shift_cmd(dir.path())
        .args(["staff", "remove", "佐藤", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed staff"));

    let staff = json_of(dir.path(), &["staff", "list"]);
    let names: Vec<&str> = staff
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["田中", "鈴木", "高田"]);
}

#[test]
fn test_staff_add_uses_default_name() {
    let dir = setup_workspace();

    shift_cmd(dir.path())
        .args(["staff", "add"])
        .assert()
        .success()
        .stdout(predicate::str::contains("新規スタッフ"));
}

#[test]
fn test_new_staff_gets_fresh_ids() {
    let dir = setup_workspace();

    let first = json_of(dir.path(), &["staff", "add", "A"]);
    let second = json_of(dir.path(), &["staff", "add", "B"]);

    let first: u64 = first["id"].as_str().unwrap().parse().unwrap();
    let second: u64 = second["id"].as_str().unwrap().parse().unwrap();
    assert!(second > first);
}

#[test]
fn test_remove_can_be_declined() {
    let dir = setup_workspace();

    shift_cmd(dir.path())
        .args(["staff", "remove", "1"])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("roster unchanged"));

    shift_cmd(dir.path())
        .args(["staff", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("田中"));
}

#[test]
fn test_remove_confirmed_on_prompt() {
    let dir = setup_workspace();

    shift_cmd(dir.path())
        .args(["staff", "remove", "1"])
        .write_stdin("y\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("[y/N]"));

    let staff = json_of(dir.path(), &["staff", "list"]);
    assert_eq!(staff.as_array().unwrap().len(), 2);
}

// =============================================================================
// History Retention Tests
// =============================================================================

#[test]
fn test_history_survives_removal() {
    let dir = setup_workspace();

    shift_cmd(dir.path())
        .args(["toggle", "田中", "5", "--month", PAST_MONTH])
        .assert()
        .success();
    shift_cmd(dir.path())
        .args(["staff", "remove", "1", "--yes"])
        .assert()
        .success();

    let report = json_of(dir.path(), &["stats", "--month", PAST_MONTH]);
    assert_eq!(report["staff_count"], 2);
    assert_eq!(report["understaffed_days"].as_array().unwrap().len(), 29);

    let history = json_of(
        dir.path(),
        &["staff", "history", "1", "--month", PAST_MONTH],
    );
    assert_eq!(history["on_roster"], false);
    assert_eq!(history["days"][4], "OFF");
    assert_eq!(history["work_days"], 28);
}

#[test]
fn test_months_lists_stored_history() {
    let dir = setup_workspace();

    shift_cmd(dir.path())
        .args(["months"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No months stored"));

    shift_cmd(dir.path())
        .args(["show", "--month", PAST_MONTH])
        .assert()
        .success();
    shift_cmd(dir.path())
        .args(["show", "--month", "2023-12"])
        .assert()
        .success();

    let months = json_of(dir.path(), &["months"]);
    let keys: Vec<&str> = months
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["month"].as_str().unwrap())
        .collect();
    assert_eq!(keys, vec!["2023-12", PAST_MONTH]);
    assert_eq!(months[1]["entries"], 3);
}

// =============================================================================
// Export Tests
// =============================================================================

#[test]
fn test_export_csv_to_path() {
    let dir = setup_workspace();
    let out = dir.path().join("feb.csv");

    shift_cmd(dir.path())
        .args(["toggle", "佐藤", "1", "--month", PAST_MONTH])
        .assert()
        .success();
    shift_cmd(dir.path())
        .args(["export", "--month", PAST_MONTH, "--output"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 2024-02"));

    let csv = fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("スタッフ名,1日,2日"));
    assert!(lines[0].ends_with(",29日"));
    assert!(lines[1].starts_with("田中,出勤"));
    assert!(lines[2].starts_with("佐藤,休み,出勤"));
}

#[test]
fn test_export_default_path() {
    let dir = setup_workspace();

    shift_cmd(dir.path())
        .args(["export", "--month", PAST_MONTH])
        .assert()
        .success();

    assert!(dir.path().join("shift_schedule.csv").is_file());
}

// =============================================================================
// Persistence Tests
// =============================================================================

#[test]
fn test_corrupt_roster_recovers_with_notice() {
    let dir = setup_workspace();
    fs::write(dir.path().join(".shift/roster.json"), "{ not json").unwrap();

    shift_cmd(dir.path())
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("田中"))
        .stderr(predicate::str::contains("note:"));

    assert!(dir.path().join(".shift/roster.json.corrupt").is_file());
}

#[test]
fn test_missing_records_start_from_seed() {
    let dir = setup_workspace();
    fs::remove_file(dir.path().join(".shift/roster.json")).unwrap();
    fs::remove_file(dir.path().join(".shift/schedule.json")).unwrap();

    let staff = json_of(dir.path(), &["staff", "list"]);
    assert_eq!(staff.as_array().unwrap().len(), 3);
}

#[test]
fn test_verbose_logs_to_stderr() {
    let dir = setup_workspace();

    shift_cmd(dir.path())
        .args(["--verbose", "staff", "list"])
        .assert()
        .success()
        .stderr(predicate::str::contains("[verbose"));
}
