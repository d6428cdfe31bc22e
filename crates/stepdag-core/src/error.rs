use thiserror::Error;

use crate::decl::TaskId;

#[derive(Debug, Error)]
pub enum StepdagError {
    #[error("not initialized: run 'stepdag init'")]
    NotInitialized,

    #[error("duplicate task id: {0}")]
    DuplicateTaskId(TaskId),

    #[error("task {task} depends on unknown task {missing}")]
    DanglingDependency { task: TaskId, missing: TaskId },

    #[error("task {0} depends on itself")]
    SelfDependency(TaskId),

    #[error("dependency cycle: {}", fmt_cycle(.0))]
    CycleDetected(Vec<TaskId>),

    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    #[error("invalid status: {0}")]
    InvalidStatus(String),

    #[error("malformed document: {0}")]
    MalformedDocument(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn fmt_cycle(ids: &[TaskId]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}

pub type Result<T> = std::result::Result<T, StepdagError>;
