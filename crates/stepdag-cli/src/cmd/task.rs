use crate::output::print_json;
use std::path::Path;
use stepdag_core::types::{Tag, TaskStatus};

pub fn prompt(root: &Path, id: u32, json: bool) -> anyhow::Result<()> {
    let (_graph, mut store) = super::load_engine(root)?;
    let record = store.mark_prompted(id)?;

    if json {
        print_json(&record)?;
    } else if record.status == TaskStatus::Completed {
        println!("Step [{id}] is already completed; left unchanged.");
    } else {
        println!("Prompted step [{id}]: {}", record.title);
    }
    Ok(())
}

pub fn complete(root: &Path, id: u32, json: bool) -> anyhow::Result<()> {
    let (graph, mut store) = super::load_engine(root)?;
    let record = store.mark_completed(&graph, id)?;

    // Dependents can only be Ready now if this completion unblocked them.
    let unblocked: Vec<u32> = graph
        .dependents_of(id)
        .iter()
        .copied()
        .filter(|&dep| {
            store
                .record(dep)
                .map(|r| r.status == TaskStatus::Ready)
                .unwrap_or(false)
        })
        .collect();

    if json {
        print_json(&serde_json::json!({
            "record": record,
            "unblocked": unblocked,
        }))?;
        return Ok(());
    }

    println!("Completed step [{id}]: {}", record.title);
    for dep in unblocked {
        let title = graph.get(dep).map(|d| d.title.as_str()).unwrap_or("");
        println!("  unblocked [{dep}] {title}");
    }
    Ok(())
}

pub fn reset(root: &Path, id: u32, json: bool) -> anyhow::Result<()> {
    let (_graph, mut store) = super::load_engine(root)?;
    let record = store.reset(id)?;

    if json {
        print_json(&record)?;
    } else {
        println!("Reset step [{id}] to {}", record.status);
    }
    Ok(())
}

pub fn assign(root: &Path, id: u32, agent: &str, json: bool) -> anyhow::Result<()> {
    let (_graph, mut store) = super::load_engine(root)?;
    let record = store.assign(id, Tag::named(agent))?;

    if json {
        print_json(&record)?;
    } else {
        println!("Assigned step [{id}] to {}", record.agent);
    }
    Ok(())
}
