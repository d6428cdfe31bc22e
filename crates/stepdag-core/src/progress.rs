use serde::Serialize;
use std::collections::BTreeMap;

use crate::store::{TaskRecord, TaskStore};
use crate::types::TaskStatus;

/// Bucket for tasks with no module assignment.
pub const MODULE_FALLBACK: &str = "other";
/// Bucket for tasks with no agent assignment.
pub const AGENT_FALLBACK: &str = "generic";

// ---------------------------------------------------------------------------
// ProgressSummary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProgressSummary {
    pub total: usize,
    pub completed: usize,
    pub ready: usize,
    pub pending: usize,
    pub prompted: usize,
    pub percentage: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GroupProgress {
    pub total: usize,
    pub completed: usize,
    pub ready: usize,
    pub pending: usize,
    pub prompted: usize,
}

impl GroupProgress {
    fn tally(&mut self, status: TaskStatus) {
        self.total += 1;
        match status {
            TaskStatus::Pending => self.pending += 1,
            TaskStatus::Ready => self.ready += 1,
            TaskStatus::Prompted => self.prompted += 1,
            TaskStatus::Completed => self.completed += 1,
        }
    }
}

// ---------------------------------------------------------------------------
// Rollups
// ---------------------------------------------------------------------------

/// Whole-plan counts. Zeroed (not an error) for an empty plan.
pub fn summary(store: &TaskStore) -> ProgressSummary {
    let records = store.records();
    let count = |status: TaskStatus| records.iter().filter(|r| r.status == status).count();

    let total = records.len();
    let completed = count(TaskStatus::Completed);
    let percentage = if total == 0 {
        0
    } else {
        (completed as f64 / total as f64 * 100.0).round() as u32
    };

    ProgressSummary {
        total,
        completed,
        ready: count(TaskStatus::Ready),
        pending: count(TaskStatus::Pending),
        prompted: count(TaskStatus::Prompted),
        percentage,
    }
}

/// Counts grouped by module tag, `"other"` for unassigned.
pub fn by_module(store: &TaskStore) -> BTreeMap<String, GroupProgress> {
    group_by(store, |r| r.module.bucket_or(MODULE_FALLBACK))
}

/// Counts grouped by agent tag, `"generic"` for unassigned.
pub fn by_agent(store: &TaskStore) -> BTreeMap<String, GroupProgress> {
    group_by(store, |r| r.agent.bucket_or(AGENT_FALLBACK))
}

fn group_by<'a, F>(store: &'a TaskStore, bucket: F) -> BTreeMap<String, GroupProgress>
where
    F: Fn(&'a TaskRecord) -> &'a str,
{
    let mut groups: BTreeMap<String, GroupProgress> = BTreeMap::new();
    for record in store.records() {
        groups
            .entry(bucket(record).to_string())
            .or_default()
            .tally(record.status);
    }
    groups
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
