use std::collections::{HashMap, HashSet};

use crate::decl::{TaskDeclaration, TaskId};
use crate::error::{Result, StepdagError};

/// Validated task dependency DAG.
///
/// Holds the declarations in their original order plus forward edges
/// (ids a task depends on) and reverse edges (ids that depend on it).
/// Construction rejects duplicate ids, dangling references,
/// self-dependencies, and cycles; a value of this type is acyclic.
#[derive(Debug, Clone)]
pub struct TaskGraph {
    decls: Vec<TaskDeclaration>,
    index: HashMap<TaskId, usize>,
    forward: HashMap<TaskId, Vec<TaskId>>,
    reverse: HashMap<TaskId, Vec<TaskId>>,
}

impl TaskGraph {
    pub fn build(decls: Vec<TaskDeclaration>) -> Result<Self> {
        let mut index = HashMap::with_capacity(decls.len());
        for (i, decl) in decls.iter().enumerate() {
            if index.insert(decl.id, i).is_some() {
                return Err(StepdagError::DuplicateTaskId(decl.id));
            }
        }

        let mut forward: HashMap<TaskId, Vec<TaskId>> = HashMap::with_capacity(decls.len());
        let mut reverse: HashMap<TaskId, Vec<TaskId>> = HashMap::with_capacity(decls.len());
        for decl in &decls {
            reverse.entry(decl.id).or_default();
        }

        for decl in &decls {
            // Duplicate entries within one dependsOn list collapse into the
            // first occurrence; list order is kept for tie-breaking.
            let mut seen = HashSet::new();
            let mut deps = Vec::with_capacity(decl.depends_on.len());
            for &dep in &decl.depends_on {
                if !seen.insert(dep) {
                    continue;
                }
                if dep == decl.id {
                    return Err(StepdagError::SelfDependency(decl.id));
                }
                if !index.contains_key(&dep) {
                    return Err(StepdagError::DanglingDependency {
                        task: decl.id,
                        missing: dep,
                    });
                }
                reverse.entry(dep).or_default().push(decl.id);
                deps.push(dep);
            }
            forward.insert(decl.id, deps);
        }

        let graph = Self {
            decls,
            index,
            forward,
            reverse,
        };
        graph.check_acyclic()?;
        Ok(graph)
    }

    /// Explicit cycle check: iterative DFS over forward edges with a
    /// three-color map (unvisited / in-progress / done). A back-edge to an
    /// in-progress node is a cycle; the error carries the offending path.
    fn check_acyclic(&self) -> Result<()> {
        #[derive(Clone, Copy, PartialEq)]
        enum Color {
            White,
            Gray,
            Black,
        }

        let mut color: HashMap<TaskId, Color> =
            self.ids().map(|id| (id, Color::White)).collect();

        for root in self.ids() {
            if color.get(&root) != Some(&Color::White) {
                continue;
            }
            // Stack frames are (task, next dependency cursor).
            let mut stack: Vec<(TaskId, usize)> = vec![(root, 0)];
            color.insert(root, Color::Gray);

            while let Some(&(id, cursor)) = stack.last() {
                let deps = self.dependencies_of(id);
                if cursor < deps.len() {
                    if let Some(top) = stack.last_mut() {
                        top.1 += 1;
                    }
                    let next = deps[cursor];
                    match color.get(&next).copied().unwrap_or(Color::White) {
                        Color::White => {
                            color.insert(next, Color::Gray);
                            stack.push((next, 0));
                        }
                        Color::Gray => {
                            let start = stack
                                .iter()
                                .position(|&(n, _)| n == next)
                                .unwrap_or(0);
                            let path = stack[start..].iter().map(|&(n, _)| n).collect();
                            return Err(StepdagError::CycleDetected(path));
                        }
                        Color::Black => {}
                    }
                } else {
                    color.insert(id, Color::Black);
                    stack.pop();
                }
            }
        }

        Ok(())
    }

    pub fn declarations(&self) -> &[TaskDeclaration] {
        &self.decls
    }

    pub fn get(&self, id: TaskId) -> Option<&TaskDeclaration> {
        self.index.get(&id).map(|&i| &self.decls[i])
    }

    pub fn contains(&self, id: TaskId) -> bool {
        self.index.contains_key(&id)
    }

    /// Ids in declaration order.
    pub fn ids(&self) -> impl Iterator<Item = TaskId> + '_ {
        self.decls.iter().map(|d| d.id)
    }

    /// Ids `id` depends on, in declaration order. Empty for unknown ids.
    pub fn dependencies_of(&self, id: TaskId) -> &[TaskId] {
        self.forward.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Ids that depend on `id`. Empty for unknown ids.
    pub fn dependents_of(&self, id: TaskId) -> &[TaskId] {
        self.reverse.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decl::TaskDeclaration as Decl;

    fn diamond() -> Vec<Decl> {
        vec![
            Decl::new(1, "scaffold"),
            Decl::new(2, "api").with_deps(&[1]),
            Decl::new(3, "ui").with_deps(&[1]),
            Decl::new(4, "integrate").with_deps(&[2, 3]),
        ]
    }

    #[test]
    fn builds_forward_and_reverse_edges() {
        let graph = TaskGraph::build(diamond()).unwrap();
        assert_eq!(graph.len(), 4);
        assert_eq!(graph.dependencies_of(4), &[2, 3]);
        assert_eq!(graph.dependencies_of(1), &[] as &[TaskId]);
        assert_eq!(graph.dependents_of(1), &[2, 3]);
        assert_eq!(graph.dependents_of(4), &[] as &[TaskId]);
    }

    #[test]
    fn duplicate_id_rejected() {
        let decls = vec![Decl::new(1, "a"), Decl::new(1, "b")];
        assert!(matches!(
            TaskGraph::build(decls),
            Err(StepdagError::DuplicateTaskId(1))
        ));
    }

    #[test]
    fn dangling_dependency_rejected() {
        let decls = vec![Decl::new(1, "a").with_deps(&[9])];
        assert!(matches!(
            TaskGraph::build(decls),
            Err(StepdagError::DanglingDependency { task: 1, missing: 9 })
        ));
    }

    #[test]
    fn self_dependency_rejected() {
        let decls = vec![Decl::new(2, "loops").with_deps(&[2])];
        assert!(matches!(
            TaskGraph::build(decls),
            Err(StepdagError::SelfDependency(2))
        ));
    }

    #[test]
    fn two_cycle_detected_with_path() {
        let decls = vec![
            Decl::new(1, "a").with_deps(&[2]),
            Decl::new(2, "b").with_deps(&[1]),
        ];
        match TaskGraph::build(decls) {
            Err(StepdagError::CycleDetected(path)) => {
                assert_eq!(path, vec![1, 2]);
            }
            other => panic!("expected CycleDetected, got {other:?}"),
        }
    }

    #[test]
    fn longer_cycle_detected() {
        let decls = vec![
            Decl::new(1, "a"),
            Decl::new(2, "b").with_deps(&[1, 4]),
            Decl::new(3, "c").with_deps(&[2]),
            Decl::new(4, "d").with_deps(&[3]),
        ];
        match TaskGraph::build(decls) {
            Err(StepdagError::CycleDetected(path)) => {
                // The reported path covers exactly the 2-3-4 loop.
                assert_eq!(path.len(), 3);
                for id in [2, 3, 4] {
                    assert!(path.contains(&id), "path {path:?} missing {id}");
                }
            }
            other => panic!("expected CycleDetected, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_deps_collapse() {
        let decls = vec![
            Decl::new(1, "a"),
            Decl::new(2, "b").with_deps(&[1, 1, 1]),
        ];
        let graph = TaskGraph::build(decls).unwrap();
        assert_eq!(graph.dependencies_of(2), &[1]);
        assert_eq!(graph.dependents_of(1), &[2]);
    }

    #[test]
    fn empty_graph_builds() {
        let graph = TaskGraph::build(Vec::new()).unwrap();
        assert!(graph.is_empty());
        assert!(!graph.contains(1));
    }
}
