use crate::output::{print_json, print_table};
use std::path::Path;
use stepdag_core::progress;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let (_graph, store) = super::load_engine(root)?;
    let summary = progress::summary(&store);

    if json {
        print_json(&serde_json::json!({
            "project": store.document().project,
            "summary": summary,
            "byModule": progress::by_module(&store),
            "byAgent": progress::by_agent(&store),
        }))?;
        return Ok(());
    }

    println!(
        "{}: {}/{} steps complete ({}%)",
        store.document().project,
        summary.completed,
        summary.total,
        summary.percentage
    );
    if summary.total == 0 {
        return Ok(());
    }
    println!();

    let rows: Vec<Vec<String>> = store
        .records()
        .iter()
        .map(|r| {
            vec![
                r.step.to_string(),
                r.status.to_string(),
                r.title.clone(),
                r.module.to_string(),
                r.agent.to_string(),
            ]
        })
        .collect();
    print_table(&["STEP", "STATUS", "TITLE", "MODULE", "AGENT"], rows);
    Ok(())
}
