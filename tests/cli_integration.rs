//! CLI integration tests for todoit
//!
//! These tests drive the binary against a document in a temp directory,
//! checking both what is printed and what ends up in the file.

use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Get a command instance for the todoit binary, isolated from user config
fn todoit_cmd(dir: &Path) -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("todoit"));
    cmd.current_dir(dir)
        .env("XDG_CONFIG_HOME", dir.join(".config"))
        .env_remove("TODOIT_FILE")
        .env_remove("TODOIT_LOG");
    cmd
}

/// Create a temporary directory with an initialized document
fn setup_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    todoit_cmd(dir.path()).arg("init").assert().success();
    dir
}

fn read_doc(dir: &Path) -> serde_json::Value {
    let text = fs::read_to_string(dir.join("todo.todoit")).unwrap();
    serde_json::from_str(&text).unwrap()
}

fn active_tasks(doc: &serde_json::Value) -> Vec<serde_json::Value> {
    let active = doc["activeListId"].as_str().unwrap();
    doc["lists"]
        .as_array()
        .unwrap()
        .iter()
        .find(|l| l["id"] == active)
        .unwrap()["tasks"]
        .as_array()
        .unwrap()
        .clone()
}

fn texts(doc: &serde_json::Value) -> Vec<String> {
    active_tasks(doc)
        .iter()
        .map(|t| t["text"].as_str().unwrap().to_string())
        .collect()
}

// =============================================================================
// Initialization Tests
// =============================================================================

#[test]
fn test_init_creates_document_and_config() {
    let dir = TempDir::new().unwrap();

    todoit_cmd(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created"));

    assert!(dir.path().join("todoit.toml").is_file());
    let doc = read_doc(dir.path());
    assert_eq!(doc["activeListId"], "list-default");
    assert_eq!(doc["lists"][0]["name"], "Default");
    assert_eq!(doc["lists"][0]["statuses"].as_array().unwrap().len(), 3);
}

#[test]
fn test_init_is_idempotent() {
    let dir = setup_project();
    let before = fs::read_to_string(dir.path().join("todo.todoit")).unwrap();

    todoit_cmd(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));

    let after = fs::read_to_string(dir.path().join("todo.todoit")).unwrap();
    assert_eq!(before, after);
}

#[test]
fn test_init_leaves_legacy_file_alone() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("todo.todoit"), "[ ] old task\n").unwrap();

    todoit_cmd(dir.path())
        .args(["init", "--no-config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("legacy format"));

    assert_eq!(
        fs::read_to_string(dir.path().join("todo.todoit")).unwrap(),
        "[ ] old task\n"
    );
    assert!(!dir.path().join("todoit.toml").exists());
}

// =============================================================================
// Task Tests
// =============================================================================

#[test]
fn test_task_add_and_show() {
    let dir = setup_project();

    todoit_cmd(dir.path())
        .args(["task", "add", "  buy milk  "])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added task: buy milk"));

    todoit_cmd(dir.path())
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("Default (table, 1 task)"))
        .stdout(predicate::str::contains("To Do"))
        .stdout(predicate::str::contains("buy milk"));

    assert_eq!(texts(&read_doc(dir.path())), vec!["buy milk"]);
}

#[test]
fn test_blank_task_is_a_noop() {
    let dir = setup_project();
    let before = fs::read_to_string(dir.path().join("todo.todoit")).unwrap();

    todoit_cmd(dir.path())
        .args(["task", "add", "   "])
        .assert()
        .success()
        .stdout(predicate::str::contains("No change"));

    let after = fs::read_to_string(dir.path().join("todo.todoit")).unwrap();
    assert_eq!(before, after);
}

#[test]
fn test_task_edit_status_and_rm_by_position() {
    let dir = setup_project();
    for text in ["one", "two", "three"] {
        todoit_cmd(dir.path()).args(["task", "add", text]).assert().success();
    }

    todoit_cmd(dir.path()).args(["task", "edit", "2", "TWO"]).assert().success();
    todoit_cmd(dir.path()).args(["task", "status", "1", "Doing"]).assert().success();
    todoit_cmd(dir.path()).args(["task", "rm", "3"]).assert().success();

    let doc = read_doc(dir.path());
    assert_eq!(texts(&doc), vec!["one", "TWO"]);
    assert_eq!(active_tasks(&doc)[0]["statusId"], "doing");
}

#[test]
fn test_unknown_task_is_an_error() {
    let dir = setup_project();

    todoit_cmd(dir.path())
        .args(["task", "rm", "t-missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Task not found: t-missing"));
}

#[test]
fn test_task_move_before() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("todo.todoit"),
        "[ ] t1\n[x] t4\n[x] t5\n[ ] t6\n",
    )
    .unwrap();

    todoit_cmd(dir.path())
        .args(["task", "move", "1", "done", "--before", "task-2-t5"])
        .assert()
        .success();

    let doc = read_doc(dir.path());
    assert_eq!(texts(&doc), vec!["t4", "t1", "t5", "t6"]);
    assert_eq!(active_tasks(&doc)[1]["statusId"], "done");
}

#[test]
fn test_task_reorder() {
    let dir = setup_project();
    for text in ["a", "b", "c"] {
        todoit_cmd(dir.path()).args(["task", "add", text]).assert().success();
    }

    todoit_cmd(dir.path()).args(["task", "reorder", "1", "3"]).assert().success();
    assert_eq!(texts(&read_doc(dir.path())), vec!["b", "c", "a"]);

    todoit_cmd(dir.path())
        .args(["task", "reorder", "0", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Positions start at 1"));
}

// =============================================================================
// Legacy Format Tests
// =============================================================================

#[test]
fn test_show_reads_checkbox_lines_without_writing() {
    let dir = TempDir::new().unwrap();
    let legacy = "[ ] buy milk\n[*] write report\n[x] done thing\n";
    fs::write(dir.path().join("todo.todoit"), legacy).unwrap();

    todoit_cmd(dir.path())
        .args(["show", "--view", "kanban"])
        .assert()
        .success()
        .stdout(predicate::str::contains("To Do (1)"))
        .stdout(predicate::str::contains("Doing (1)"))
        .stdout(predicate::str::contains("Done (1)"));

    assert_eq!(fs::read_to_string(dir.path().join("todo.todoit")).unwrap(), legacy);
}

#[test]
fn test_first_edit_upgrades_legacy_file() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("todo.todoit"), "- [ ] eggs\n- [x] bread\n").unwrap();

    todoit_cmd(dir.path())
        .args(["task", "add", "butter"])
        .assert()
        .success();

    let doc = read_doc(dir.path());
    assert_eq!(texts(&doc), vec!["eggs", "bread", "butter"]);
    assert_eq!(active_tasks(&doc)[0]["id"], "task-0-eggs");
}

#[test]
fn test_upgrade_and_check() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("todo.todoit"), "[x] shipped\n").unwrap();

    todoit_cmd(dir.path())
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("checkbox-lines"))
        .stdout(predicate::str::contains("todoit upgrade"));

    todoit_cmd(dir.path())
        .arg("upgrade")
        .assert()
        .success()
        .stdout(predicate::str::contains("Upgraded"));

    todoit_cmd(dir.path())
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("structured"));

    todoit_cmd(dir.path())
        .arg("upgrade")
        .assert()
        .success()
        .stdout(predicate::str::contains("No change"));
}

#[test]
fn test_check_reports_violations() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("todo.todoit"),
        r#"{"lists": [{"id": "l1", "statuses": [{"id": "s1"}], "tasks": [{"id": "t1", "text": "x", "statusId": "gone"}]}], "activeListId": "l1"}"#,
    )
    .unwrap();

    todoit_cmd(dir.path())
        .arg("check")
        .assert()
        .failure()
        .stdout(predicate::str::contains("references missing status gone"))
        .stderr(predicate::str::contains("1 invariant violation(s) found"));
}

// =============================================================================
// List Tests
// =============================================================================

#[test]
fn test_list_lifecycle() {
    let dir = setup_project();

    todoit_cmd(dir.path()).args(["list", "add", "Work"]).assert().success();
    todoit_cmd(dir.path()).args(["task", "add", "ship it"]).assert().success();
    todoit_cmd(dir.path()).args(["list", "view", "kanban"]).assert().success();

    todoit_cmd(dir.path())
        .args(["list", "ls"])
        .assert()
        .success()
        .stdout(predicate::str::contains("kanban"))
        .stdout(predicate::str::contains("Work"));

    todoit_cmd(dir.path()).args(["list", "rename", "Work", "Office"]).assert().success();
    todoit_cmd(dir.path()).args(["list", "use", "Default"]).assert().success();
    assert_eq!(read_doc(dir.path())["activeListId"], "list-default");

    todoit_cmd(dir.path()).args(["list", "rm", "Office"]).assert().success();
    let doc = read_doc(dir.path());
    assert_eq!(doc["lists"].as_array().unwrap().len(), 1);
}

#[test]
fn test_list_add_uses_configured_name() {
    let dir = setup_project();
    fs::write(
        dir.path().join("todoit.toml"),
        "[document]\nnew_list_name = \"Inbox\"\n",
    )
    .unwrap();

    todoit_cmd(dir.path())
        .args(["list", "add"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added list: Inbox"));
}

#[test]
fn test_sole_list_cannot_be_deleted() {
    let dir = setup_project();

    todoit_cmd(dir.path())
        .args(["list", "rm", "list-default"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No change"));

    assert_eq!(read_doc(dir.path())["lists"].as_array().unwrap().len(), 1);
}

// =============================================================================
// Status Tests
// =============================================================================

#[test]
fn test_status_add_and_reorder() {
    let dir = setup_project();

    todoit_cmd(dir.path())
        .args(["status", "add", "Blocked", "--color", "#FF0000"])
        .assert()
        .success();
    todoit_cmd(dir.path()).args(["status", "reorder", "4", "1"]).assert().success();

    let doc = read_doc(dir.path());
    let labels: Vec<_> = doc["lists"][0]["statuses"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["label"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(labels, vec!["Blocked", "To Do", "Doing", "Done"]);
    assert_eq!(doc["lists"][0]["statuses"][0]["color"], "#FF0000");
}

#[test]
fn test_status_add_rejects_blank_label() {
    let dir = setup_project();
    let before = fs::read_to_string(dir.path().join("todo.todoit")).unwrap();

    todoit_cmd(dir.path())
        .args(["status", "add", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Status label must not be empty"));

    let after = fs::read_to_string(dir.path().join("todo.todoit")).unwrap();
    assert_eq!(before, after);
}

#[test]
fn test_status_rm_reassigns_tasks() {
    let dir = setup_project();
    todoit_cmd(dir.path()).args(["task", "add", "wip"]).assert().success();
    todoit_cmd(dir.path()).args(["task", "status", "1", "doing"]).assert().success();

    todoit_cmd(dir.path()).args(["status", "rm", "Doing"]).assert().success();

    let doc = read_doc(dir.path());
    assert_eq!(active_tasks(&doc)[0]["statusId"], "todo");
}

#[test]
fn test_status_update_keeps_unset_fields() {
    let dir = setup_project();

    todoit_cmd(dir.path())
        .args(["status", "update", "todo", "--label", "Backlog"])
        .assert()
        .success();

    let doc = read_doc(dir.path());
    assert_eq!(doc["lists"][0]["statuses"][0]["label"], "Backlog");
    assert_eq!(doc["lists"][0]["statuses"][0]["color"], "#808080");
}

// =============================================================================
// Output and Config Tests
// =============================================================================

#[test]
fn test_json_output() {
    let dir = setup_project();

    let output = todoit_cmd(dir.path())
        .args(["task", "add", "json task", "--format", "json"])
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    let json: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(json["op"], "add_task");
    assert_eq!(json["changed"], true);

    let output = todoit_cmd(dir.path())
        .args(["show", "--format", "json"])
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    let json: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(json["active"], true);
    assert_eq!(json["list"]["tasks"][0]["text"], "json task");
}

#[test]
fn test_file_flag_and_env() {
    let dir = TempDir::new().unwrap();

    todoit_cmd(dir.path())
        .args(["--file", "other.todoit", "task", "add", "elsewhere"])
        .assert()
        .success();
    assert!(dir.path().join("other.todoit").is_file());
    assert!(!dir.path().join("todo.todoit").exists());

    todoit_cmd(dir.path())
        .env("TODOIT_FILE", "other.todoit")
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("elsewhere"));
}

#[test]
fn test_config_document_file() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("todoit.toml"),
        "[document]\nfile = \"lists/main.todoit\"\n",
    )
    .unwrap();
    let sub = dir.path().join("sub");
    fs::create_dir_all(&sub).unwrap();

    todoit_cmd(&sub).args(["task", "add", "nested"]).assert().success();

    assert!(dir.path().join("lists/main.todoit").is_file());
}
