use crate::output::{print_json, print_table};
use std::path::Path;
use stepdag_core::{critical_path, readiness, StepdagError};

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let (graph, store) = super::load_engine(root)?;
    let path = critical_path::critical_path(&graph);

    if json {
        print_json(&serde_json::json!({
            "criticalPath": path,
            "length": path.len(),
        }))?;
        return Ok(());
    }

    if path.is_empty() {
        println!("Plan is empty.");
        return Ok(());
    }

    let chain = path
        .iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(" -> ");
    println!("Critical path ({} steps): {}", path.len(), chain);

    let rows: Vec<Vec<String>> = path
        .iter()
        .map(|&id| {
            let title = graph.get(id).map(|d| d.title.clone()).unwrap_or_default();
            let status = store
                .record(id)
                .map(|r| r.status.to_string())
                .unwrap_or_default();
            vec![id.to_string(), status, title]
        })
        .collect();
    print_table(&["STEP", "STATUS", "TITLE"], rows);
    Ok(())
}

pub fn blocking(root: &Path, id: u32, json: bool) -> anyhow::Result<()> {
    let (graph, store) = super::load_engine(root)?;
    if !graph.contains(id) {
        return Err(StepdagError::TaskNotFound(id).into());
    }
    let completed = store.completed_ids();
    let blocking = readiness::blocking_dependencies(&graph, id, &completed);

    if json {
        print_json(&serde_json::json!({ "step": id, "blockedBy": blocking }))?;
        return Ok(());
    }

    if blocking.is_empty() {
        println!("Step [{id}] is ready to start.");
        return Ok(());
    }
    println!("Step [{id}] is waiting on:");
    for dep in blocking {
        let title = graph.get(dep).map(|d| d.title.as_str()).unwrap_or("");
        println!("  [{dep}] {title}");
    }
    Ok(())
}
