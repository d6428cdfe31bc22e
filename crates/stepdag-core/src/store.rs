//! Persisted task records and the status state machine.
//!
//! The plan document is the only shared state: it is read once at process
//! start and rewritten atomically after each mutation. There is no lock
//! and no optimistic-concurrency check, so two processes mutating the
//! same document race as last-writer-wins. The tool assumes a single user
//! running one invocation at a time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::decl::TaskId;
use crate::error::{Result, StepdagError};
use crate::graph::TaskGraph;
use crate::io;
use crate::readiness;
use crate::types::{Tag, TaskStatus};

// ---------------------------------------------------------------------------
// TaskRecord
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    pub step: TaskId,
    pub title: String,
    pub depends_on: Vec<TaskId>,
    pub module: Tag,
    pub agent: Tag,
    pub status: TaskStatus,
    pub prompted_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl TaskRecord {
    /// Initial status: `Ready` when there is nothing to wait for.
    fn initial_status(depends_on: &[TaskId]) -> TaskStatus {
        if depends_on.is_empty() {
            TaskStatus::Ready
        } else {
            TaskStatus::Pending
        }
    }
}

// ---------------------------------------------------------------------------
// PlanDocument
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanDocument {
    pub generated_at: DateTime<Utc>,
    pub project: String,
    pub total_steps: usize,
    pub entries: Vec<TaskRecord>,
}

// ---------------------------------------------------------------------------
// TaskStore
// ---------------------------------------------------------------------------

/// Owner of the persisted plan document and of every status transition.
///
/// Constructed once per invocation and passed by reference; no ambient
/// state. All mutating operations rewrite the whole document atomically
/// before returning, and abort without touching memory or disk when the
/// task id is unknown.
#[derive(Debug)]
pub struct TaskStore {
    path: PathBuf,
    doc: PlanDocument,
}

impl TaskStore {
    /// Create a fresh plan from a validated graph and persist it.
    ///
    /// Re-initializing over an existing document is the "full reset": all
    /// prior status is discarded.
    pub fn init(path: impl Into<PathBuf>, project: impl Into<String>, graph: &TaskGraph) -> Result<Self> {
        let entries: Vec<TaskRecord> = graph
            .declarations()
            .iter()
            .map(|decl| {
                let deps = graph.dependencies_of(decl.id);
                TaskRecord {
                    step: decl.id,
                    title: decl.title.clone(),
                    depends_on: deps.to_vec(),
                    module: decl.module.clone(),
                    agent: Tag::Unassigned,
                    status: TaskRecord::initial_status(deps),
                    prompted_at: None,
                    completed_at: None,
                }
            })
            .collect();

        let store = Self {
            path: path.into(),
            doc: PlanDocument {
                generated_at: Utc::now(),
                project: project.into(),
                total_steps: entries.len(),
                entries,
            },
        };
        store.save()?;
        Ok(store)
    }

    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            return Err(StepdagError::NotInitialized);
        }
        let data = std::fs::read_to_string(&path)?;
        let doc: PlanDocument = serde_json::from_str(&data)
            .map_err(|e| StepdagError::MalformedDocument(format!("plan {}: {e}", path.display())))?;
        Ok(Self { path, doc })
    }

    pub fn save(&self) -> Result<()> {
        let data = serde_json::to_string_pretty(&self.doc)?;
        io::atomic_write(&self.path, data.as_bytes())
    }

    // ---------------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------------

    pub fn document(&self) -> &PlanDocument {
        &self.doc
    }

    pub fn records(&self) -> &[TaskRecord] {
        &self.doc.entries
    }

    pub fn record(&self, id: TaskId) -> Option<&TaskRecord> {
        self.doc.entries.iter().find(|r| r.step == id)
    }

    /// Ids of every completed task, the `completed` set the readiness
    /// queries take.
    pub fn completed_ids(&self) -> HashSet<TaskId> {
        self.doc
            .entries
            .iter()
            .filter(|r| r.status == TaskStatus::Completed)
            .map(|r| r.step)
            .collect()
    }

    // ---------------------------------------------------------------------------
    // Transitions
    // ---------------------------------------------------------------------------

    /// Mark a task as prompted and stamp `promptedAt`.
    ///
    /// Completed tasks are left untouched (no write). Re-prompting a
    /// prompted task refreshes the timestamp.
    pub fn mark_prompted(&mut self, id: TaskId) -> Result<TaskRecord> {
        let idx = self.index_of(id)?;
        if self.doc.entries[idx].status == TaskStatus::Completed {
            debug!(task = id, "mark_prompted on completed task; no-op");
            return Ok(self.doc.entries[idx].clone());
        }
        self.doc.entries[idx].status = TaskStatus::Prompted;
        self.doc.entries[idx].prompted_at = Some(Utc::now());
        debug!(task = id, "task prompted");
        self.save()?;
        Ok(self.doc.entries[idx].clone())
    }

    /// Mark a task as completed and promote any dependent whose full
    /// dependency set is now satisfied from `Pending` to `Ready`. This is
    /// the only transition that cascades.
    pub fn mark_completed(&mut self, graph: &TaskGraph, id: TaskId) -> Result<TaskRecord> {
        let idx = self.index_of(id)?;
        self.doc.entries[idx].status = TaskStatus::Completed;
        self.doc.entries[idx].completed_at = Some(Utc::now());
        debug!(task = id, "task completed");

        let completed = self.completed_ids();
        for &dependent in graph.dependents_of(id) {
            let Some(i) = self.doc.entries.iter().position(|r| r.step == dependent) else {
                continue;
            };
            if self.doc.entries[i].status == TaskStatus::Pending
                && readiness::can_start(graph, dependent, &completed)
            {
                self.doc.entries[i].status = TaskStatus::Ready;
                debug!(task = dependent, unblocked_by = id, "task promoted to ready");
            }
        }

        self.save()?;
        Ok(self.doc.entries[idx].clone())
    }

    /// Put a task back to its initial state (`Ready` with no dependencies,
    /// else `Pending`) and clear both timestamps. Never cascades; only
    /// `mark_completed` re-promotes dependents.
    pub fn reset(&mut self, id: TaskId) -> Result<TaskRecord> {
        let idx = self.index_of(id)?;
        let record = &mut self.doc.entries[idx];
        record.status = TaskRecord::initial_status(&record.depends_on);
        record.prompted_at = None;
        record.completed_at = None;
        debug!(task = id, status = %record.status, "task reset");
        self.save()?;
        Ok(self.doc.entries[idx].clone())
    }

    /// Assign a collaborator tag to a task.
    pub fn assign(&mut self, id: TaskId, agent: Tag) -> Result<TaskRecord> {
        let idx = self.index_of(id)?;
        self.doc.entries[idx].agent = agent;
        self.save()?;
        Ok(self.doc.entries[idx].clone())
    }

    fn index_of(&self, id: TaskId) -> Result<usize> {
        self.doc
            .entries
            .iter()
            .position(|r| r.step == id)
            .ok_or(StepdagError::TaskNotFound(id))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
