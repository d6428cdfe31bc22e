use std::collections::HashMap;

use crate::decl::TaskId;
use crate::graph::TaskGraph;

/// Longest dependency chain length for every task.
///
/// `len(n) = 1` for a task with no dependencies, else
/// `1 + max(len(dep))`. Memoized over an explicit work stack; the graph
/// is acyclic by construction, so the walk terminates.
pub fn chain_lengths(graph: &TaskGraph) -> HashMap<TaskId, usize> {
    let mut memo: HashMap<TaskId, usize> = HashMap::with_capacity(graph.len());

    for root in graph.ids() {
        let mut stack = vec![root];
        while let Some(&id) = stack.last() {
            if memo.contains_key(&id) {
                stack.pop();
                continue;
            }
            let deps = graph.dependencies_of(id);
            let unresolved: Vec<TaskId> = deps
                .iter()
                .copied()
                .filter(|dep| !memo.contains_key(dep))
                .collect();
            if unresolved.is_empty() {
                let longest_dep = deps
                    .iter()
                    .filter_map(|dep| memo.get(dep))
                    .max()
                    .copied()
                    .unwrap_or(0);
                memo.insert(id, 1 + longest_dep);
                stack.pop();
            } else {
                stack.extend(unresolved);
            }
        }
    }

    memo
}

/// The longest dependency chain, ordered first task to last.
///
/// Ties are broken deterministically toward declaration order: the
/// first-declared task among global maxima, and at each step backward the
/// first-listed dependency among those with maximal chain length. Repeated
/// calls on the same graph return the same path. Empty graph, empty path.
pub fn critical_path(graph: &TaskGraph) -> Vec<TaskId> {
    let lengths = chain_lengths(graph);

    let mut tail: Option<TaskId> = None;
    let mut best = 0;
    for id in graph.ids() {
        let len = lengths.get(&id).copied().unwrap_or(0);
        if len > best {
            best = len;
            tail = Some(id);
        }
    }
    let Some(mut current) = tail else {
        return Vec::new();
    };

    let mut path = Vec::with_capacity(best);
    loop {
        path.push(current);
        let deps = graph.dependencies_of(current);
        let Some(&first) = deps.first() else {
            break;
        };
        let mut next = first;
        let mut next_len = lengths.get(&first).copied().unwrap_or(0);
        for &dep in &deps[1..] {
            let len = lengths.get(&dep).copied().unwrap_or(0);
            if len > next_len {
                next = dep;
                next_len = len;
            }
        }
        current = next;
    }
    path.reverse();
    path
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decl::TaskDeclaration as Decl;

    #[test]
    fn empty_graph_empty_path() {
        let graph = TaskGraph::build(Vec::new()).unwrap();
        assert!(critical_path(&graph).is_empty());
        assert!(chain_lengths(&graph).is_empty());
    }

    #[test]
    fn single_task() {
        let graph = TaskGraph::build(vec![Decl::new(1, "only")]).unwrap();
        assert_eq!(critical_path(&graph), vec![1]);
    }

    #[test]
    fn linear_chain() {
        let graph = TaskGraph::build(vec![
            Decl::new(1, "a"),
            Decl::new(2, "b").with_deps(&[1]),
            Decl::new(3, "c").with_deps(&[2]),
        ])
        .unwrap();
        assert_eq!(critical_path(&graph), vec![1, 2, 3]);
        assert_eq!(chain_lengths(&graph)[&3], 3);
    }

    #[test]
    fn diamond_tie_breaks_to_first_listed_dependency() {
        let graph = TaskGraph::build(vec![
            Decl::new(1, "scaffold"),
            Decl::new(2, "api").with_deps(&[1]),
            Decl::new(3, "ui").with_deps(&[1]),
            Decl::new(4, "integrate").with_deps(&[2, 3]),
        ])
        .unwrap();
        // 2 and 3 tie at length 2; 2 is listed first in 4's dependsOn.
        assert_eq!(critical_path(&graph), vec![1, 2, 4]);
        assert_eq!(chain_lengths(&graph)[&4], 3);
    }

    #[test]
    fn strictly_longer_branch_wins_over_listing_order() {
        let graph = TaskGraph::build(vec![
            Decl::new(1, "a"),
            Decl::new(2, "short").with_deps(&[1]),
            Decl::new(3, "mid").with_deps(&[1]),
            Decl::new(4, "long").with_deps(&[3]),
            Decl::new(5, "join").with_deps(&[2, 4]),
        ])
        .unwrap();
        assert_eq!(critical_path(&graph), vec![1, 3, 4, 5]);
    }

    #[test]
    fn global_tie_breaks_to_first_declared() {
        let graph = TaskGraph::build(vec![
            Decl::new(10, "a"),
            Decl::new(20, "b").with_deps(&[10]),
            Decl::new(30, "c"),
            Decl::new(40, "d").with_deps(&[30]),
        ])
        .unwrap();
        // Both chains have length 2; 20 is declared before 40.
        assert_eq!(critical_path(&graph), vec![10, 20]);
    }

    #[test]
    fn stable_across_calls() {
        let graph = TaskGraph::build(vec![
            Decl::new(1, "a"),
            Decl::new(2, "b").with_deps(&[1]),
            Decl::new(3, "c").with_deps(&[1]),
            Decl::new(4, "d").with_deps(&[3, 2]),
        ])
        .unwrap();
        let first = critical_path(&graph);
        for _ in 0..5 {
            assert_eq!(critical_path(&graph), first);
        }
        // 3 is listed before 2 in 4's dependsOn, so the tie goes to 3.
        assert_eq!(first, vec![1, 3, 4]);
    }

    #[test]
    fn disconnected_components() {
        let graph = TaskGraph::build(vec![
            Decl::new(1, "island"),
            Decl::new(2, "a"),
            Decl::new(3, "b").with_deps(&[2]),
            Decl::new(4, "c").with_deps(&[3]),
        ])
        .unwrap();
        assert_eq!(critical_path(&graph), vec![2, 3, 4]);
    }
}
