//! Common test utilities for ananke integration tests.
//!
//! Provides `TestEnv` for isolated test environments that never read the
//! user's real `~/.config/ananke/` or an enclosing workspace.

#![allow(dead_code)]

use assert_cmd::Command;
use serde_json::Value;
pub use tempfile::TempDir;

/// A test environment with an isolated workspace root.
///
/// Each `TestEnv` creates two temporary directories:
/// - `root_dir`: The workspace root (holds `.ananke/`)
/// - `config_dir`: Stands in for the per-user config directory
///
/// The `ananke()` method pins both per invocation, making tests parallel-safe.
pub struct TestEnv {
    pub root_dir: TempDir,
    pub config_dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            root_dir: TempDir::new().unwrap(),
            config_dir: TempDir::new().unwrap(),
        }
    }

    /// Create a new test environment and run `ananke init`.
    pub fn init() -> Self {
        let env = Self::new();
        env.ananke().arg("init").assert().success();
        env
    }

    /// Get a Command for the ananke binary bound to this environment.
    pub fn ananke(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_ananke"));
        cmd.current_dir(self.root_dir.path());
        cmd.env("ANANKE_ROOT", self.root_dir.path());
        cmd.env("ANANKE_CONFIG_DIR", self.config_dir.path());
        cmd.env_remove("ANANKE_LOG");
        cmd
    }

    pub fn path(&self) -> &std::path::Path {
        self.root_dir.path()
    }

    pub fn config_path(&self) -> &std::path::Path {
        self.config_dir.path()
    }

    /// Run with `--json`, returning the parsed envelope and the exit code.
    pub fn json(&self, args: &[&str]) -> (Value, i32) {
        let output = self.ananke().arg("--json").args(args).output().unwrap();
        let stdout = String::from_utf8_lossy(&output.stdout);
        let value: Value = serde_json::from_str(&stdout)
            .unwrap_or_else(|e| panic!("stdout is not JSON ({e}): {stdout}"));
        (value, output.status.code().unwrap_or(-1))
    }

    /// Run with `--json` and assert success; returns the envelope.
    pub fn ok(&self, args: &[&str]) -> Value {
        let (value, code) = self.json(args);
        assert_eq!(code, 0, "expected success for {:?}: {}", args, value);
        assert_eq!(value["ok"], true, "{}", value);
        value
    }

    /// Run with `--json` and assert the failure code and exit status.
    pub fn err(&self, args: &[&str], code: &str, exit: i32) -> Value {
        let (value, status) = self.json(args);
        assert_eq!(status, exit, "unexpected exit for {:?}: {}", args, value);
        assert_eq!(value["ok"], false, "{}", value);
        assert_eq!(value["error"]["code"], code, "{}", value);
        value
    }

    /// Create an epic and return its id.
    pub fn epic(&self, title: &str) -> String {
        let goal = format!("{} goal", title);
        let value = self.ok(&["epic", "create", "--title", title, "--goal", &goal]);
        value["data"]["epic"]["id"].as_str().unwrap().to_string()
    }

    /// Create a task with the given priority and return its id.
    pub fn task(&self, epic: &str, title: &str, priority: u8) -> String {
        let priority = priority.to_string();
        let value = self.ok(&[
            "task",
            "create",
            "--epic",
            epic,
            "--title",
            title,
            "--description",
            "desc",
            "--priority",
            &priority,
        ]);
        value["data"]["task"]["id"].as_str().unwrap().to_string()
    }

    /// Ids from `ready`, in order.
    pub fn ready_ids(&self, extra: &[&str]) -> Vec<String> {
        let mut args = vec!["ready"];
        args.extend_from_slice(extra);
        let value = self.ok(&args);
        value["data"]["tasks"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["id"].as_str().unwrap().to_string())
            .collect()
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
