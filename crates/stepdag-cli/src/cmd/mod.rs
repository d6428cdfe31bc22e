pub mod init;
pub mod next;
pub mod path;
pub mod status;
pub mod task;

use anyhow::Context;
use std::path::Path;
use stepdag_core::{decl, graph::TaskGraph, paths, store::TaskStore};

/// Rebuild the dependency graph from the declarations copy and load the
/// plan document. The graph is never persisted; status is.
pub fn load_engine(root: &Path) -> anyhow::Result<(TaskGraph, TaskStore)> {
    let steps_path = paths::steps_path(root);
    let data = std::fs::read_to_string(&steps_path).with_context(|| {
        format!(
            "cannot read {}; run 'stepdag init' first",
            steps_path.display()
        )
    })?;
    let decls = decl::from_json(&data)?;
    let graph = TaskGraph::build(decls).context("invalid step declarations")?;
    let store = TaskStore::load(paths::plan_path(root))?;
    Ok((graph, store))
}
