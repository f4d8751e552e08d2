//! Deadline classification for projects and incomplete tasks.
//!
//! # Responsibility
//! - Bucket items into overdue and nearing-deadline notifications.
//! - Provide the day-difference arithmetic shared with dashboard stats.
//!
//! # Invariants
//! - `diff_days = ceil((deadline - now) / 1 day)`, with `deadline` taken as
//!   UTC midnight at the start of the deadline date.
//! - Completed tasks never produce a notification; projects always do when
//!   their deadline falls in a bucket.
//! - Both buckets are sorted ascending by deadline; ties keep input order.

use crate::model::project::{Project, ProjectId, Task};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Serialize;
use uuid::Uuid;

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Upper bound (inclusive) of the nearing-deadline window, in days.
pub const NEARING_WINDOW_DAYS: i64 = 3;

/// Where a notification comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NotificationSource {
    Project,
    Task {
        project_id: ProjectId,
        project_title: String,
    },
}

/// Bucket assigned to an item by its day difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeadlineStatus {
    Overdue,
    NearingDeadline,
    OnSchedule,
}

impl DeadlineStatus {
    pub fn from_diff_days(diff_days: i64) -> Self {
        if diff_days < 0 {
            Self::Overdue
        } else if diff_days <= NEARING_WINDOW_DAYS {
            Self::NearingDeadline
        } else {
            Self::OnSchedule
        }
    }
}

/// One overdue or nearing-deadline entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    /// Project id or task id, depending on `source`.
    pub id: Uuid,
    pub title: String,
    pub deadline: NaiveDate,
    pub diff_days: i64,
    pub source: NotificationSource,
}

impl Notification {
    pub fn is_task(&self) -> bool {
        matches!(self.source, NotificationSource::Task { .. })
    }

    /// Project that owns this item (the project itself for project entries).
    pub fn project_id(&self) -> ProjectId {
        match &self.source {
            NotificationSource::Project => self.id,
            NotificationSource::Task { project_id, .. } => *project_id,
        }
    }

    /// Short description displayed under the title.
    pub fn message(&self) -> &'static str {
        match (self.is_task(), self.diff_days < 0) {
            (false, true) => "Project deadline has passed",
            (false, false) => "Project deadline is approaching",
            (true, true) => "Task is overdue",
            (true, false) => "Task deadline is approaching",
        }
    }

    pub fn time_remaining(&self) -> String {
        time_remaining_label(self.diff_days)
    }
}

/// Classifier output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeadlineReport {
    pub overdue: Vec<Notification>,
    pub nearing_deadline: Vec<Notification>,
}

impl DeadlineReport {
    /// Badge count: every overdue or nearing item.
    pub fn notification_count(&self) -> usize {
        self.overdue.len() + self.nearing_deadline.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notification_count() == 0
    }
}

/// Classifies projects and their incomplete tasks relative to `now`.
pub struct DeadlineClassifier {
    now: DateTime<Utc>,
}

impl DeadlineClassifier {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    pub fn diff_days(&self, deadline: NaiveDate) -> i64 {
        diff_days(deadline, self.now)
    }

    pub fn classify(&self, projects: &[Project]) -> DeadlineReport {
        let mut report = DeadlineReport::default();

        for project in projects {
            let notification = project_notification(project, self.diff_days(project.deadline));
            self.place(&mut report, notification);

            for task in project.tasks.iter().filter(|task| !task.completed) {
                let notification = task_notification(project, task, self.diff_days(task.deadline));
                self.place(&mut report, notification);
            }
        }

        // sort_by_key is stable, so equal deadlines keep input order.
        report.overdue.sort_by_key(|item| item.deadline);
        report.nearing_deadline.sort_by_key(|item| item.deadline);
        report
    }

    fn place(&self, report: &mut DeadlineReport, notification: Notification) {
        match DeadlineStatus::from_diff_days(notification.diff_days) {
            DeadlineStatus::Overdue => report.overdue.push(notification),
            DeadlineStatus::NearingDeadline => report.nearing_deadline.push(notification),
            DeadlineStatus::OnSchedule => {}
        }
    }
}

/// Convenience wrapper for one-off classification.
pub fn classify(projects: &[Project], now: DateTime<Utc>) -> DeadlineReport {
    DeadlineClassifier::new(now).classify(projects)
}

/// Whole days from `now` until the start of `deadline`, rounded up.
pub fn diff_days(deadline: NaiveDate, now: DateTime<Utc>) -> i64 {
    let due = deadline.and_time(NaiveTime::MIN).and_utc();
    let millis = (due - now).num_milliseconds();
    let days = millis.div_euclid(MILLIS_PER_DAY);
    if millis.rem_euclid(MILLIS_PER_DAY) == 0 {
        days
    } else {
        days + 1
    }
}

/// Human-readable distance to a deadline.
pub fn time_remaining_label(diff_days: i64) -> String {
    match diff_days {
        d if d < 0 => format!("{} days overdue", d.unsigned_abs()),
        0 => "Due today".to_string(),
        1 => "Due tomorrow".to_string(),
        d => format!("Due in {d} days"),
    }
}

fn project_notification(project: &Project, diff_days: i64) -> Notification {
    Notification {
        id: project.id,
        title: project.title.clone(),
        deadline: project.deadline,
        diff_days,
        source: NotificationSource::Project,
    }
}

fn task_notification(project: &Project, task: &Task, diff_days: i64) -> Notification {
    Notification {
        id: task.id,
        title: task.title.clone(),
        deadline: task.deadline,
        diff_days,
        source: NotificationSource::Task {
            project_id: project.id,
            project_title: project.title.clone(),
        },
    }
}
