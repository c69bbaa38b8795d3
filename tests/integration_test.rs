use std::path::PathBuf;
use std::process::Command;
use tempfile::TempDir;

/// Helper struct to manage test environment
struct TestEnv {
    _temp_dir: TempDir,
    work_dir: PathBuf,
    binary_path: PathBuf,
}

impl TestEnv {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let work_dir = temp_dir.path().to_path_buf();

        // Get the path to the compiled binary
        let mut binary_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        binary_path.push("target");
        binary_path.push("debug");
        binary_path.push("dp");

        Self {
            _temp_dir: temp_dir,
            work_dir,
            binary_path,
        }
    }

    /// Run a dayplan command and return the output
    fn run(&self, args: &[&str]) -> Result<String, String> {
        let output = Command::new(&self.binary_path)
            .args(args)
            .current_dir(&self.work_dir)
            // Keep the AI client out of play for non-interactive tests.
            .env_remove("DAYPLAN_API_KEY")
            .output()
            .expect("Failed to execute dayplan command");

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).to_string())
        } else {
            Err(String::from_utf8_lossy(&output.stderr).to_string())
        }
    }

    fn dayplan_dir_exists(&self) -> bool {
        self.work_dir.join(".dayplan").exists()
    }

    fn config_exists(&self) -> bool {
        self.work_dir.join(".dayplan").join("config.toml").exists()
    }

    fn data_dir_exists(&self) -> bool {
        self.work_dir.join(".dayplan").join("data").exists()
    }
}

#[test]
fn test_init_creates_dayplan_directory() {
    let env = TestEnv::new();

    assert!(
        !env.dayplan_dir_exists(),
        "Dayplan directory should not exist initially"
    );

    let output = env.run(&["init"]).expect("Init command failed");
    assert!(output.contains("Initialized dayplan"));

    assert!(
        env.dayplan_dir_exists(),
        "Dayplan directory should exist after init"
    );
    assert!(env.config_exists(), "Config file should exist after init");
    assert!(env.data_dir_exists(), "Data directory should exist after init");
}

#[test]
fn test_init_is_idempotent() {
    let env = TestEnv::new();

    env.run(&["init"]).expect("First init failed");
    let output = env.run(&["init"]).expect("Second init failed");

    assert!(output.contains("already initialized"));
}

#[test]
fn test_commands_fail_without_init() {
    let env = TestEnv::new();

    let result = env.run(&["feedback", "list"]);
    assert!(result.is_err(), "Commands should fail without init");
    assert!(result.unwrap_err().contains("not initialized"));
}

#[test]
fn test_starter_config_has_job_categories() {
    let env = TestEnv::new();
    env.run(&["init"]).expect("Init failed");

    let config =
        std::fs::read_to_string(env.work_dir.join(".dayplan").join("config.toml")).unwrap();
    assert!(config.contains("[[jobs]]"));
    assert!(config.contains("[ai]"));
}

#[test]
fn test_feedback_add_and_list() {
    let env = TestEnv::new();
    env.run(&["init"]).expect("Init failed");

    // Initially empty
    let output = env.run(&["feedback", "list"]).expect("List failed");
    assert!(output.contains("No feedback entries found"));

    let output = env
        .run(&["feedback", "add", "add a week view", "--no-ai"])
        .expect("Add failed");
    assert!(output.contains("Feedback recorded:"));

    let output = env.run(&["feedback", "list"]).expect("List failed");
    assert!(output.contains("add a week view"));
    assert!(output.contains("pending"));
    assert!(output.contains("Total: 1 entries"));
}

#[test]
fn test_feedback_status_update_persists() {
    let env = TestEnv::new();
    env.run(&["init"]).expect("Init failed");

    let output = env
        .run(&["feedback", "add", "faster startup", "--no-ai"])
        .expect("Add failed");

    // Extract the id from "✓ Feedback recorded: XXXXXXXX"
    let id = output
        .lines()
        .find(|line| line.contains("Feedback recorded:"))
        .and_then(|line| line.split_whitespace().last())
        .expect("Could not extract feedback id");
    assert_eq!(id.len(), 8, "Feedback id should be 8 characters");

    let output = env
        .run(&["feedback", "set-status", id, "implemented"])
        .expect("Set-status failed");
    assert!(output.contains("implemented"));

    // Status survives a fresh invocation.
    let output = env.run(&["feedback", "show", id]).expect("Show failed");
    assert!(output.contains("implemented"));
    assert!(output.contains("faster startup"));
}

#[test]
fn test_feedback_set_status_rejects_unknown_words() {
    let env = TestEnv::new();
    env.run(&["init"]).expect("Init failed");
    env.run(&["feedback", "add", "an idea", "--no-ai"])
        .expect("Add failed");

    let result = env.run(&["feedback", "set-status", "someid12", "done"]);
    assert!(result.is_err());
    assert!(result.unwrap_err().contains("Unknown status"));
}

#[test]
fn test_feedback_show_unknown_id_fails() {
    let env = TestEnv::new();
    env.run(&["init"]).expect("Init failed");

    let result = env.run(&["feedback", "show", "zzzzzzzz"]);
    assert!(result.is_err());
    assert!(result.unwrap_err().contains("not found"));
}

#[test]
fn test_status_without_plan() {
    let env = TestEnv::new();
    env.run(&["init"]).expect("Init failed");

    let output = env.run(&["status"]).expect("Status failed");
    assert!(output.contains("No plan yet for today"));
}

#[test]
fn test_status_rejects_malformed_date() {
    let env = TestEnv::new();
    env.run(&["init"]).expect("Init failed");

    let result = env.run(&["status", "--date", "not-a-date"]);
    assert!(result.is_err());
    assert!(result.unwrap_err().contains("Invalid date"));
}

#[test]
fn test_check_with_explicit_date_and_no_plan_fails() {
    let env = TestEnv::new();
    env.run(&["init"]).expect("Init failed");

    let result = env.run(&["check", "--date", "2026-01-01"]);
    assert!(result.is_err());
    assert!(result.unwrap_err().contains("No plan found for 2026-01-01"));
}

#[test]
fn test_plan_requires_api_key() {
    let env = TestEnv::new();
    env.run(&["init"]).expect("Init failed");

    let result = env.run(&["plan"]);
    assert!(result.is_err());
    assert!(result.unwrap_err().contains("DAYPLAN_API_KEY"));
}
