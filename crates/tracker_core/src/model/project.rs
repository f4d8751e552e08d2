//! Project and task domain model.
//!
//! # Responsibility
//! - Define the records persisted in the `projects` collection.
//! - Own the progress invariant so every caller recomputes it the same way.
//!
//! # Invariants
//! - `id` is stable and never reused for another project or task.
//! - `progress == round(100 * completed / total)`, and `0` with no tasks.
//! - `title` is never empty after trimming.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type ProjectId = Uuid;
pub type TaskId = Uuid;

/// Upper bound for `Project::progress`.
pub const MAX_PROGRESS: u8 = 100;

/// Task urgency shown next to a task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Parses a user-supplied priority label (case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation failures for project and task records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Title is empty or whitespace-only.
    EmptyTitle,
    /// Stored progress is outside `0..=100`.
    ProgressOutOfRange(u8),
    /// Two records in one collection share an id.
    DuplicateId(Uuid),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title cannot be empty"),
            Self::ProgressOutOfRange(value) => {
                write!(f, "progress ({value}) must be within 0..={MAX_PROGRESS}")
            }
            Self::DuplicateId(id) => write!(f, "duplicate id in collection: {id}"),
        }
    }
}

impl Error for ValidationError {}

/// Unit of work inside a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub deadline: NaiveDate,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Creates an incomplete task with a generated id.
    pub fn new(title: impl Into<String>, deadline: NaiveDate, priority: Priority) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: String::new(),
            deadline,
            priority,
            completed: false,
            created_at: Utc::now(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_title(&self.title)
    }
}

/// Top-level work item with a deadline and nested tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub deadline: NaiveDate,
    #[serde(default)]
    pub progress: u8,
    #[serde(default)]
    pub tasks: Vec<Task>,
    pub created_at: DateTime<Utc>,
}

impl Project {
    /// Creates an empty project with a generated id and `progress = 0`.
    pub fn new(title: impl Into<String>, deadline: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: String::new(),
            deadline,
            progress: 0,
            tasks: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn completed_task_count(&self) -> usize {
        self.tasks.iter().filter(|task| task.completed).count()
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn task_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| task.id == id)
    }

    /// Appends a task and keeps `progress` consistent.
    pub fn push_task(&mut self, task: Task) {
        self.tasks.push(task);
        self.recompute_progress();
    }

    /// Removes a task by id and keeps `progress` consistent.
    pub fn remove_task(&mut self, id: TaskId) -> Option<Task> {
        let index = self.tasks.iter().position(|task| task.id == id)?;
        let removed = self.tasks.remove(index);
        self.recompute_progress();
        Some(removed)
    }

    /// Flips completion of one task and returns the new completion state.
    ///
    /// Returns `None` when the task does not belong to this project.
    pub fn toggle_task(&mut self, id: TaskId) -> Option<bool> {
        let task = self.task_mut(id)?;
        task.completed = !task.completed;
        let completed = task.completed;
        self.recompute_progress();
        Some(completed)
    }

    pub fn recompute_progress(&mut self) {
        self.progress = progress_percent(self.completed_task_count(), self.tasks.len());
    }

    /// Checks record-level invariants, including every nested task.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_title(&self.title)?;
        if self.progress > MAX_PROGRESS {
            return Err(ValidationError::ProgressOutOfRange(self.progress));
        }
        let mut seen = std::collections::HashSet::with_capacity(self.tasks.len());
        for task in &self.tasks {
            task.validate()?;
            if !seen.insert(task.id) {
                return Err(ValidationError::DuplicateId(task.id));
            }
        }
        Ok(())
    }
}

/// Rounds `100 * completed / total` half-up; `0` when `total == 0`.
pub fn progress_percent(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let completed = completed.min(total) as u64;
    let total = total as u64;
    ((200 * completed + total) / (2 * total)) as u8
}

fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    Ok(())
}
