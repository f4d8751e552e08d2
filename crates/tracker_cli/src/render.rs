//! Plain-text output for the `tracker` subcommands.

use tracker_core::{
    DashboardStats, DeadlineReport, Notification, NotificationSetting, NotificationSnapshot,
    NotificationSource, ProgressBand, Project, Task, UserProfile,
};

pub fn project_list(projects: &[Project]) {
    if projects.is_empty() {
        println!("No projects yet.");
        return;
    }
    for project in projects {
        println!(
            "{}  {:<32} due {}  {:>3}% ({}/{} tasks)",
            project.id,
            project.title,
            project.deadline,
            project.progress,
            project.completed_task_count(),
            project.tasks.len()
        );
    }
}

pub fn project(project: &Project) {
    println!("{} [{}]", project.title, project.id);
    if !project.description.is_empty() {
        println!("  {}", project.description);
    }
    println!("  deadline: {}", project.deadline);
    println!(
        "  progress: {}% ({})",
        project.progress,
        ProgressBand::from_progress(project.progress).as_str()
    );
    if project.tasks.is_empty() {
        println!("  no tasks");
        return;
    }
    println!("  tasks:");
    for task in &project.tasks {
        print!("    ");
        self::task(task);
    }
}

pub fn task(task: &Task) {
    let mark = if task.completed { 'x' } else { ' ' };
    println!(
        "[{mark}] {} ({} priority, due {}) {}",
        task.title, task.priority, task.deadline, task.id
    );
}

pub fn stats(stats: &DashboardStats, projects: &[Project]) {
    println!("Total tasks:        {}", stats.total_tasks);
    println!("Completed tasks:    {}", stats.completed_tasks);
    println!("Pending tasks:      {}", stats.pending_tasks);
    println!("Upcoming deadlines: {}", stats.upcoming_deadlines);
    if projects.is_empty() {
        return;
    }
    println!();
    for project in projects {
        println!(
            "{:>3}% {:<9} {}",
            project.progress,
            ProgressBand::from_progress(project.progress).as_str(),
            project.title
        );
    }
}

pub fn report(report: &DeadlineReport) {
    if report.is_empty() {
        println!("No notifications at this time.");
        return;
    }
    section("Overdue", &report.overdue);
    section("Nearing Deadline", &report.nearing_deadline);
}

pub fn snapshot(snapshot: &NotificationSnapshot) {
    println!(
        "== {} notification(s) at {} ==",
        snapshot.count(),
        snapshot.taken_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    report(&snapshot.report);
}

pub fn profile(profile: &UserProfile) {
    let or_unset = |value: &str| {
        if value.is_empty() {
            "(not set)".to_string()
        } else {
            value.to_string()
        }
    };
    println!("name:  {}", or_unset(&profile.name));
    println!("email: {}", or_unset(&profile.email));
    for setting in NotificationSetting::ALL {
        let state = if profile.notification_settings.get(setting) {
            "on"
        } else {
            "off"
        };
        println!("  {:<20} {state}", setting.as_str());
    }
}

fn section(heading: &str, entries: &[Notification]) {
    if entries.is_empty() {
        return;
    }
    println!("{heading} ({})", entries.len());
    for entry in entries {
        let origin = match &entry.source {
            NotificationSource::Project => "project".to_string(),
            NotificationSource::Task { project_title, .. } => format!("task in {project_title}"),
        };
        println!(
            "  {} [{origin}] {}: {}",
            entry.title,
            entry.message(),
            entry.time_remaining()
        );
    }
}
