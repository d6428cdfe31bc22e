use std::collections::HashSet;

use crate::decl::{TaskDeclaration, TaskId};
use crate::graph::TaskGraph;

/// Tasks that can be started right now: not yet completed, with every
/// dependency in `completed`. Result order is declaration order; callers
/// surface the first entry as "next", so it must stay stable.
pub fn available<'a>(
    graph: &'a TaskGraph,
    completed: &HashSet<TaskId>,
) -> Vec<&'a TaskDeclaration> {
    graph
        .declarations()
        .iter()
        .filter(|decl| !completed.contains(&decl.id) && can_start(graph, decl.id, completed))
        .collect()
}

/// The subset of [`available`] flagged safe for parallel execution.
pub fn parallel_candidates<'a>(
    graph: &'a TaskGraph,
    completed: &HashSet<TaskId>,
) -> Vec<&'a TaskDeclaration> {
    available(graph, completed)
        .into_iter()
        .filter(|decl| decl.parallel_safe)
        .collect()
}

/// True iff every dependency of `id` is completed. Unknown ids are not
/// startable rather than an error.
pub fn can_start(graph: &TaskGraph, id: TaskId, completed: &HashSet<TaskId>) -> bool {
    if !graph.contains(id) {
        return false;
    }
    graph
        .dependencies_of(id)
        .iter()
        .all(|dep| completed.contains(dep))
}

/// Dependencies of `id` not yet completed, in declaration order. Used for
/// "why can't I start this" messages; empty for unknown ids.
pub fn blocking_dependencies(
    graph: &TaskGraph,
    id: TaskId,
    completed: &HashSet<TaskId>,
) -> Vec<TaskId> {
    graph
        .dependencies_of(id)
        .iter()
        .copied()
        .filter(|dep| !completed.contains(dep))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
