use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use tracker_core::{
    classify, dashboard_stats, DeadlineClassifier, NotificationSource, Priority, Project, Task,
};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 18, 9, 30, 0).unwrap()
}

fn due_in(days: i64) -> NaiveDate {
    now().date_naive() + Duration::days(days)
}

fn project_with_tasks(project_due_in: i64, task_offsets: &[i64]) -> Project {
    let mut project = Project::new("release", due_in(project_due_in));
    for offset in task_offsets {
        project.push_task(Task::new(
            format!("task {offset}"),
            due_in(*offset),
            Priority::Medium,
        ));
    }
    project
}

#[test]
fn empty_input_yields_empty_report() {
    let report = classify(&[], now());
    assert!(report.overdue.is_empty());
    assert!(report.nearing_deadline.is_empty());
    assert_eq!(report.notification_count(), 0);
}

#[test]
fn tasks_due_in_minus_one_zero_two_five_days() {
    let project = project_with_tasks(30, &[-1, 0, 2, 5]);
    let report = classify(&[project.clone()], now());

    let overdue: Vec<_> = report.overdue.iter().map(|n| n.diff_days).collect();
    let nearing: Vec<_> = report.nearing_deadline.iter().map(|n| n.diff_days).collect();
    assert_eq!(overdue, vec![-1]);
    assert_eq!(nearing, vec![0, 2]);

    let listed: Vec<_> = report
        .overdue
        .iter()
        .chain(report.nearing_deadline.iter())
        .map(|n| n.title.as_str())
        .collect();
    assert!(!listed.contains(&"task 5"));
    assert!(report
        .nearing_deadline
        .iter()
        .all(|n| n.project_id() == project.id));
}

#[test]
fn deadline_today_is_nearing_not_overdue() {
    let project = project_with_tasks(30, &[0]);
    let report = classify(&[project], now());
    assert!(report.overdue.is_empty());
    assert_eq!(report.nearing_deadline.len(), 1);
    assert_eq!(report.nearing_deadline[0].time_remaining(), "Due today");
}

#[test]
fn deadline_four_days_out_is_ignored_and_three_is_nearing() {
    let project = project_with_tasks(30, &[4, 3]);
    let report = classify(&[project], now());
    assert!(report.overdue.is_empty());
    assert_eq!(report.nearing_deadline.len(), 1);
    assert_eq!(report.nearing_deadline[0].title, "task 3");
}

#[test]
fn completed_tasks_are_skipped_but_projects_are_not() {
    let mut project = project_with_tasks(-2, &[-1]);
    let task_id = project.tasks[0].id;
    project.toggle_task(task_id).unwrap();

    let report = classify(&[project.clone()], now());
    assert_eq!(report.overdue.len(), 1);
    assert_eq!(report.overdue[0].source, NotificationSource::Project);
    assert_eq!(report.overdue[0].id, project.id);
    assert_eq!(report.overdue[0].message(), "Project deadline has passed");
}

#[test]
fn task_entries_carry_parent_project() {
    let project = project_with_tasks(30, &[1]);
    let report = classify(&[project.clone()], now());

    let entry = &report.nearing_deadline[0];
    assert!(entry.is_task());
    assert_eq!(
        entry.source,
        NotificationSource::Task {
            project_id: project.id,
            project_title: "release".to_string(),
        }
    );
    assert_eq!(entry.message(), "Task deadline is approaching");
    assert_eq!(entry.time_remaining(), "Due tomorrow");
}

#[test]
fn buckets_are_sorted_ascending_by_deadline_across_projects() {
    let first = project_with_tasks(3, &[-1, 2, -5]);
    let second = project_with_tasks(1, &[-3, 0]);
    let report = DeadlineClassifier::new(now()).classify(&[first, second]);

    let overdue: Vec<_> = report.overdue.iter().map(|n| n.deadline).collect();
    let nearing: Vec<_> = report.nearing_deadline.iter().map(|n| n.deadline).collect();
    assert_eq!(overdue, vec![due_in(-5), due_in(-3), due_in(-1)]);
    assert_eq!(nearing, vec![due_in(0), due_in(1), due_in(2), due_in(3)]);
    assert!(overdue.windows(2).all(|pair| pair[0] <= pair[1]));
    assert_eq!(report.notification_count(), 7);
}

#[test]
fn equal_deadlines_keep_project_then_task_order() {
    let project = project_with_tasks(1, &[1]);
    let report = classify(&[project], now());
    assert_eq!(report.nearing_deadline[0].source, NotificationSource::Project);
    assert!(report.nearing_deadline[1].is_task());
}

#[test]
fn dashboard_stats_count_tasks_and_upcoming_week() {
    let mut alpha = project_with_tasks(7, &[0, 8, -1]);
    let done = alpha.tasks[0].id;
    alpha.toggle_task(done).unwrap();
    let beta = project_with_tasks(20, &[]);

    let stats = dashboard_stats(&[alpha, beta], now());
    assert_eq!(stats.total_tasks, 3);
    assert_eq!(stats.completed_tasks, 1);
    assert_eq!(stats.pending_tasks, 2);
    // alpha project (7 days) + completed task due today.
    assert_eq!(stats.upcoming_deadlines, 2);
}
