use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const STEPDAG_DIR: &str = ".stepdag";
/// Copy of the upstream parser's step declarations; the graph is rebuilt
/// from this file on every invocation and never persisted itself.
pub const STEPS_FILE: &str = ".stepdag/steps.json";
/// The persisted plan document (task status is the only mutable state).
pub const PLAN_FILE: &str = ".stepdag/plan.json";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn stepdag_dir(root: &Path) -> PathBuf {
    root.join(STEPDAG_DIR)
}

pub fn steps_path(root: &Path) -> PathBuf {
    root.join(STEPS_FILE)
}

pub fn plan_path(root: &Path) -> PathBuf {
    root.join(PLAN_FILE)
}
