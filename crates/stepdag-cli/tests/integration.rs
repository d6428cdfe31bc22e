use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

fn stepdag(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("stepdag").unwrap();
    cmd.current_dir(dir.path()).env("STEPDAG_ROOT", dir.path());
    cmd
}

fn write_steps(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("steps.json");
    std::fs::write(&path, content).unwrap();
    path
}

const DIAMOND: &str = r#"[
    {"id": 1, "title": "Scaffold", "dependsOn": [], "parallelSafe": false, "module": "infra"},
    {"id": 2, "title": "API", "dependsOn": [1], "parallelSafe": false, "module": "backend"},
    {"id": 3, "title": "UI", "dependsOn": [1], "parallelSafe": true, "module": "frontend"},
    {"id": 4, "title": "Integrate", "dependsOn": [2, 3], "parallelSafe": false, "module": null}
]"#;

fn init_plan(dir: &TempDir) {
    let steps = write_steps(dir, DIAMOND);
    stepdag(dir)
        .arg("init")
        .arg(&steps)
        .args(["--project", "demo"])
        .assert()
        .success();
}

// ---------------------------------------------------------------------------
// stepdag init
// ---------------------------------------------------------------------------

#[test]
fn init_creates_plan_files() {
    let dir = TempDir::new().unwrap();
    let steps = write_steps(&dir, DIAMOND);
    stepdag(&dir)
        .arg("init")
        .arg(&steps)
        .args(["--project", "demo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("4 steps"));

    assert!(dir.path().join(".stepdag/steps.json").exists());
    assert!(dir.path().join(".stepdag/plan.json").exists());
}

#[test]
fn init_rejects_cyclic_declarations() {
    let dir = TempDir::new().unwrap();
    let steps = write_steps(
        &dir,
        r#"[
            {"id": 1, "title": "a", "dependsOn": [2]},
            {"id": 2, "title": "b", "dependsOn": [1]}
        ]"#,
    );
    stepdag(&dir)
        .arg("init")
        .arg(&steps)
        .assert()
        .failure()
        .stderr(predicate::str::contains("dependency cycle"));

    assert!(!dir.path().join(".stepdag/plan.json").exists());
}

#[test]
fn init_rejects_self_dependency() {
    let dir = TempDir::new().unwrap();
    let steps = write_steps(&dir, r#"[{"id": 2, "title": "loops", "dependsOn": [2]}]"#);
    stepdag(&dir)
        .arg("init")
        .arg(&steps)
        .assert()
        .failure()
        .stderr(predicate::str::contains("task 2 depends on itself"));
}

// ---------------------------------------------------------------------------
// stepdag status / next / available / parallel
// ---------------------------------------------------------------------------

#[test]
fn status_shows_progress() {
    let dir = TempDir::new().unwrap();
    init_plan(&dir);
    stepdag(&dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("demo: 0/4 steps complete (0%)"))
        .stdout(predicate::str::contains("Scaffold"));
}

#[test]
fn status_json_includes_rollups() {
    let dir = TempDir::new().unwrap();
    init_plan(&dir);
    stepdag(&dir)
        .args(["status", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"percentage\": 0"))
        .stdout(predicate::str::contains("\"byModule\""))
        .stdout(predicate::str::contains("\"other\""));
}

#[test]
fn next_is_first_available_step() {
    let dir = TempDir::new().unwrap();
    init_plan(&dir);
    stepdag(&dir)
        .arg("next")
        .assert()
        .success()
        .stdout(predicate::str::contains("Next step [1]: Scaffold"));
}

#[test]
fn complete_unblocks_dependents() {
    let dir = TempDir::new().unwrap();
    init_plan(&dir);
    stepdag(&dir)
        .args(["complete", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("unblocked [2] API"))
        .stdout(predicate::str::contains("unblocked [3] UI"));

    stepdag(&dir)
        .arg("next")
        .assert()
        .success()
        .stdout(predicate::str::contains("Next step [2]: API"));
}

#[test]
fn parallel_lists_only_flagged_steps() {
    let dir = TempDir::new().unwrap();
    init_plan(&dir);
    stepdag(&dir).args(["complete", "1"]).assert().success();
    stepdag(&dir)
        .arg("parallel")
        .assert()
        .success()
        .stdout(predicate::str::contains("UI"))
        .stdout(predicate::str::contains("API").not());
}

#[test]
fn all_steps_complete_message() {
    let dir = TempDir::new().unwrap();
    init_plan(&dir);
    for id in ["1", "2", "3", "4"] {
        stepdag(&dir).args(["complete", id]).assert().success();
    }
    stepdag(&dir)
        .arg("next")
        .assert()
        .success()
        .stdout(predicate::str::contains("All steps complete."));
}

// ---------------------------------------------------------------------------
// stepdag path / blocking
// ---------------------------------------------------------------------------

#[test]
fn path_shows_longest_chain() {
    let dir = TempDir::new().unwrap();
    init_plan(&dir);
    stepdag(&dir)
        .arg("path")
        .assert()
        .success()
        .stdout(predicate::str::contains("Critical path (3 steps): 1 -> 2 -> 4"));
}

#[test]
fn blocking_explains_unmet_dependencies() {
    let dir = TempDir::new().unwrap();
    init_plan(&dir);
    stepdag(&dir)
        .args(["blocking", "4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[2] API"))
        .stdout(predicate::str::contains("[3] UI"));

    stepdag(&dir)
        .args(["blocking", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ready to start"));
}

// ---------------------------------------------------------------------------
// transitions and errors
// ---------------------------------------------------------------------------

#[test]
fn prompt_marks_step() {
    let dir = TempDir::new().unwrap();
    init_plan(&dir);
    stepdag(&dir)
        .args(["prompt", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Prompted step [1]"));
    stepdag(&dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("prompted"));
}

#[test]
fn reset_restores_initial_state() {
    let dir = TempDir::new().unwrap();
    init_plan(&dir);
    stepdag(&dir).args(["complete", "1"]).assert().success();
    stepdag(&dir)
        .args(["reset", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Reset step [1] to ready"));
}

#[test]
fn assign_records_agent() {
    let dir = TempDir::new().unwrap();
    init_plan(&dir);
    stepdag(&dir)
        .args(["assign", "2", "backend-dev"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Assigned step [2] to backend-dev"));
    stepdag(&dir)
        .args(["status", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("backend-dev"));
}

#[test]
fn unknown_step_fails_cleanly() {
    let dir = TempDir::new().unwrap();
    init_plan(&dir);
    stepdag(&dir)
        .args(["complete", "99"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("task not found: 99"));

    // The plan is untouched by the failed transition.
    stepdag(&dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("0/4 steps complete"));
}

#[test]
fn missing_plan_reports_not_initialized() {
    let dir = TempDir::new().unwrap();
    stepdag(&dir)
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("run 'stepdag init'"));
}

#[test]
fn malformed_plan_is_reported() {
    let dir = TempDir::new().unwrap();
    init_plan(&dir);
    std::fs::write(dir.path().join(".stepdag/plan.json"), "{\"entries\": 42}").unwrap();
    stepdag(&dir)
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("malformed document"));
}
