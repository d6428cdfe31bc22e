use crate::output::print_json;
use anyhow::Context;
use std::path::Path;
use stepdag_core::{decl, graph::TaskGraph, io, paths, store::TaskStore};

/// Validate the parser-output declarations, copy them into `.stepdag/`,
/// and seed a fresh plan document. Re-running is the full reset: all
/// recorded status is discarded.
pub fn run(root: &Path, steps_file: &Path, project: &str, json: bool) -> anyhow::Result<()> {
    let data = std::fs::read_to_string(steps_file)
        .with_context(|| format!("cannot read {}", steps_file.display()))?;
    let decls = decl::from_json(&data)?;
    let graph = TaskGraph::build(decls).context("invalid step declarations")?;

    io::ensure_dir(&paths::stepdag_dir(root))?;
    io::atomic_write(&paths::steps_path(root), data.as_bytes())?;
    let store = TaskStore::init(paths::plan_path(root), project, &graph)?;

    if json {
        print_json(&serde_json::json!({
            "project": project,
            "steps": store.records().len(),
        }))?;
    } else {
        println!(
            "Initialized plan '{}' with {} steps",
            project,
            store.records().len()
        );
    }
    Ok(())
}
