//! Dashboard aggregates across all projects.

use crate::deadline::classifier::diff_days;
use crate::model::project::Project;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

/// Upper bound (inclusive) of the dashboard "upcoming" window, in days.
pub const UPCOMING_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub pending_tasks: usize,
    /// Projects plus tasks (completed or not) due within the next week.
    pub upcoming_deadlines: usize,
}

/// Badge bucket for a project's progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressBand {
    NotStarted,
    Started,
    OnTrack,
    Complete,
}

impl ProgressBand {
    pub fn from_progress(progress: u8) -> Self {
        match progress {
            100.. => Self::Complete,
            50..=99 => Self::OnTrack,
            1..=49 => Self::Started,
            0 => Self::NotStarted,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "not started",
            Self::Started => "started",
            Self::OnTrack => "on track",
            Self::Complete => "complete",
        }
    }
}

pub fn dashboard_stats(projects: &[Project], now: DateTime<Utc>) -> DashboardStats {
    let is_upcoming =
        |deadline: NaiveDate| (0..=UPCOMING_WINDOW_DAYS).contains(&diff_days(deadline, now));

    let mut stats = DashboardStats::default();
    for project in projects {
        stats.total_tasks += project.tasks.len();
        stats.completed_tasks += project.completed_task_count();
        stats.upcoming_deadlines += usize::from(is_upcoming(project.deadline));
        stats.upcoming_deadlines += project
            .tasks
            .iter()
            .filter(|task| is_upcoming(task.deadline))
            .count();
    }
    stats.pending_tasks = stats.total_tasks - stats.completed_tasks;
    stats
}
