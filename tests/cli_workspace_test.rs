//! Integration tests for workspace scaffolding and root selection.

mod common;

use common::{TempDir, TestEnv};
use predicates::prelude::*;
use std::fs;

#[test]
fn test_workspace_lifecycle() {
    let env = TestEnv::new();

    let first = env.ok(&["init"]);
    assert!(first["message"].as_str().unwrap().contains("Initialized"));

    env.err(&["init"], "CONFLICT", 4);
    env.ok(&["init", "--update"]);
    env.ok(&["init", "--reset"]);
}

#[test]
fn test_init_scaffold_layout() {
    let env = TestEnv::init();
    let root = env.path();

    for dir in [".ananke/epics", ".ananke/tasks", ".ananke/deps", ".ananke/packs"] {
        assert!(root.join(dir).is_dir(), "missing {}", dir);
    }
    assert_eq!(fs::read_to_string(root.join(".ananke/deps/blocks.json")).unwrap().trim(), "[]");

    let index: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(root.join(".ananke/index.json")).unwrap()).unwrap();
    assert_eq!(index["next_epic"], 1);
    assert_eq!(index["next_task"], 1);

    assert!(root.join(".ananke/schema.json").is_file());
    assert!(root.join(".agents/skills/ananke/SKILL.md").is_file());
}

#[test]
fn test_init_update_refills_empty_files_and_keeps_data() {
    let env = TestEnv::init();
    let epic = env.epic("Keep me");
    fs::write(env.path().join(".ananke/deps/blocks.json"), "").unwrap();

    let value = env.ok(&["init", "--update"]);
    let created: Vec<&str> = value["data"]["created"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p.as_str().unwrap())
        .collect();
    assert!(created.contains(&".ananke/deps/blocks.json"), "{:?}", created);

    env.ok(&["epic", "show", &epic]);
}

#[test]
fn test_init_reset_discards_data() {
    let env = TestEnv::init();
    let epic = env.epic("Gone");

    env.ok(&["init", "--reset"]);
    env.err(&["epic", "show", &epic], "NOT_FOUND", 3);
    assert_eq!(env.epic("Fresh"), "EPC-001");
}

#[test]
fn test_init_update_and_reset_conflict() {
    let env = TestEnv::new();
    env.err(&["init", "--update", "--reset"], "INVALID_ARGS", 2);
    assert!(!env.path().join(".ananke").exists());
}

#[test]
fn test_commands_require_workspace() {
    let env = TestEnv::new();
    let value = env.err(&["ready"], "NOT_FOUND", 3);
    assert_eq!(
        value["error"]["message"],
        "Workspace not initialized. Run `ananke init` first."
    );
}

#[test]
fn test_root_isolation() {
    let a = TestEnv::init();
    let b = TestEnv::init();

    assert_eq!(a.epic("A"), "EPC-001");
    assert_eq!(b.epic("B"), "EPC-001");
    assert_eq!(a.epic("A2"), "EPC-002");
}

#[test]
fn test_root_flag_overrides_env() {
    let env = TestEnv::new();
    let other = TempDir::new().unwrap();

    env.ananke()
        .args(["--json", "--root"])
        .arg(other.path())
        .arg("init")
        .assert()
        .success();

    assert!(other.path().join(".ananke/index.json").is_file());
    assert!(!env.path().join(".ananke").exists());
}

#[test]
fn test_root_detected_from_git_ancestor() {
    let env = TestEnv::new();
    fs::create_dir(env.path().join(".git")).unwrap();
    let nested = env.path().join("src/deep");
    fs::create_dir_all(&nested).unwrap();

    env.ananke()
        .env_remove("ANANKE_ROOT")
        .current_dir(&nested)
        .args(["--json", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"ok\": true"));

    assert!(env.path().join(".ananke").is_dir());
    assert!(!nested.join(".ananke").exists());
}
