use crate::output::{print_json, print_table};
use std::path::Path;
use stepdag_core::decl::TaskDeclaration;
use stepdag_core::readiness;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let (graph, store) = super::load_engine(root)?;
    let completed = store.completed_ids();
    let candidates = readiness::available(&graph, &completed);
    let next = candidates.first();

    if json {
        print_json(&serde_json::json!({ "next": next }))?;
        return Ok(());
    }

    match next {
        Some(decl) => println!("Next step [{}]: {}", decl.id, decl.title),
        None if completed.len() == store.records().len() && !store.records().is_empty() => {
            println!("All steps complete.")
        }
        None => println!("No startable steps."),
    }
    Ok(())
}

pub fn available(root: &Path, json: bool) -> anyhow::Result<()> {
    let (graph, store) = super::load_engine(root)?;
    let completed = store.completed_ids();
    let candidates = readiness::available(&graph, &completed);
    print_candidates(&candidates, json, "No startable steps.")
}

pub fn parallel(root: &Path, json: bool) -> anyhow::Result<()> {
    let (graph, store) = super::load_engine(root)?;
    let completed = store.completed_ids();
    let candidates = readiness::parallel_candidates(&graph, &completed);
    print_candidates(&candidates, json, "No parallel-safe steps right now.")
}

fn print_candidates(
    candidates: &[&TaskDeclaration],
    json: bool,
    empty_message: &str,
) -> anyhow::Result<()> {
    if json {
        print_json(&candidates)?;
        return Ok(());
    }

    if candidates.is_empty() {
        println!("{empty_message}");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = candidates
        .iter()
        .map(|d| {
            vec![
                d.id.to_string(),
                d.title.clone(),
                d.module.to_string(),
                if d.parallel_safe { "yes" } else { "no" }.to_string(),
            ]
        })
        .collect();
    print_table(&["STEP", "TITLE", "MODULE", "PARALLEL"], rows);
    Ok(())
}
