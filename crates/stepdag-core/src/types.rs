use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// TaskStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Ready,
    Prompted,
    Completed,
}

impl TaskStatus {
    pub fn all() -> &'static [TaskStatus] {
        &[
            TaskStatus::Pending,
            TaskStatus::Ready,
            TaskStatus::Prompted,
            TaskStatus::Completed,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Ready => "ready",
            TaskStatus::Prompted => "prompted",
            TaskStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = crate::error::StepdagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TaskStatus::Pending),
            "ready" => Ok(TaskStatus::Ready),
            "prompted" => Ok(TaskStatus::Prompted),
            "completed" => Ok(TaskStatus::Completed),
            _ => Err(crate::error::StepdagError::InvalidStatus(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Tag
// ---------------------------------------------------------------------------

/// Module or agent assignment for a task.
///
/// Free-form string keys with ad hoc fallbacks are normalized at the
/// ingestion boundary: missing, null, and blank values all collapse into
/// `Unassigned`. On the wire a tag is `string | null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum Tag {
    Named(String),
    #[default]
    Unassigned,
}

impl Tag {
    pub fn named(name: impl Into<String>) -> Self {
        Tag::from(Some(name.into()))
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Tag::Named(s) => Some(s),
            Tag::Unassigned => None,
        }
    }

    /// Bucket key for progress grouping (`fallback` for unassigned tags).
    pub fn bucket_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.name().unwrap_or(fallback)
    }
}

impl From<Option<String>> for Tag {
    fn from(raw: Option<String>) -> Self {
        match raw {
            Some(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    Tag::Unassigned
                } else {
                    Tag::Named(trimmed.to_string())
                }
            }
            None => Tag::Unassigned,
        }
    }
}

impl From<Tag> for Option<String> {
    fn from(tag: Tag) -> Self {
        match tag {
            Tag::Named(s) => Some(s),
            Tag::Unassigned => None,
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name().unwrap_or("-"))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
