use serde::{Deserialize, Serialize};

use crate::error::{Result, StepdagError};
use crate::types::Tag;

pub type TaskId = u32;

/// One step as declared by the upstream plan parser.
///
/// Field names on the wire follow the parser's output contract
/// (`dependsOn`, `parallelSafe`). Declaration order is load-bearing: it
/// drives the ordering of readiness results and the critical-path
/// tie-break, so callers must not re-sort the list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDeclaration {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub depends_on: Vec<TaskId>,
    #[serde(default)]
    pub parallel_safe: bool,
    #[serde(default)]
    pub module: Tag,
}

impl TaskDeclaration {
    pub fn new(id: TaskId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            depends_on: Vec::new(),
            parallel_safe: false,
            module: Tag::Unassigned,
        }
    }

    pub fn with_deps(mut self, deps: &[TaskId]) -> Self {
        self.depends_on = deps.to_vec();
        self
    }

    pub fn parallel(mut self) -> Self {
        self.parallel_safe = true;
        self
    }

    pub fn in_module(mut self, name: impl Into<String>) -> Self {
        self.module = Tag::named(name);
        self
    }
}

/// Parse the upstream parser's output: a JSON array of declarations.
pub fn from_json(data: &str) -> Result<Vec<TaskDeclaration>> {
    serde_json::from_str(data)
        .map_err(|e| StepdagError::MalformedDocument(format!("step declarations: {e}")))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
