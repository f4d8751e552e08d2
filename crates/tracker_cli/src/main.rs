//! `tracker` command-line front-end.
//!
//! # Responsibility
//! - Map subcommands onto `tracker_core` use cases.
//! - Resolve configuration (environment first, then flags) and start logging.

mod render;

use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use log::info;
use std::error::Error;
use std::future::Future;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracker_core::db::open_db;
use tracker_core::{
    classify, dashboard_stats, init_logging, NewProject, NewTask, NotificationPoller,
    NotificationSetting, Priority, ProfileService, ProfileStore, ProjectEdit, ProjectService,
    ProjectStore, SqliteKeyValueStore, TaskEdit, TrackerConfig,
};
use uuid::Uuid;

type CliResult<T> = Result<T, Box<dyn Error>>;

#[derive(Parser, Debug)]
#[command(name = "tracker", version, about = "Local project and deadline tracker")]
struct Cli {
    /// SQLite file holding tracker state (overrides TRACKER_DB_PATH).
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    /// Directory for rolling log files (overrides TRACKER_LOG_DIR).
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Create, edit, remove and inspect projects.
    #[command(subcommand)]
    Project(ProjectCommand),
    /// Create, edit, remove and complete tasks.
    #[command(subcommand)]
    Task(TaskCommand),
    /// Show dashboard totals and every project's progress.
    Stats,
    /// List overdue and nearing-deadline items.
    Notifications,
    /// Keep refreshing notifications until interrupted.
    Watch,
    /// Show or change the user profile.
    #[command(subcommand)]
    Profile(ProfileCommand),
}

#[derive(Debug, Subcommand)]
enum ProjectCommand {
    Add(ProjectFields),
    Edit {
        id: Uuid,
        #[command(flatten)]
        fields: ProjectEditFields,
    },
    Rm {
        id: Uuid,
    },
    List,
    Show {
        id: Uuid,
    },
}

#[derive(Debug, Args)]
struct ProjectFields {
    #[arg(long)]
    title: String,
    #[arg(long, default_value = "")]
    description: String,
    /// Due date as YYYY-MM-DD.
    #[arg(long)]
    deadline: NaiveDate,
}

#[derive(Debug, Args)]
struct ProjectEditFields {
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    deadline: Option<NaiveDate>,
}

#[derive(Debug, Subcommand)]
enum TaskCommand {
    Add {
        project_id: Uuid,
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        deadline: NaiveDate,
        #[arg(long, value_parser = parse_priority, default_value = "medium")]
        priority: Priority,
    },
    Edit {
        project_id: Uuid,
        task_id: Uuid,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        deadline: Option<NaiveDate>,
        #[arg(long, value_parser = parse_priority)]
        priority: Option<Priority>,
    },
    Rm {
        project_id: Uuid,
        task_id: Uuid,
    },
    /// Flip completion and print the project's new progress.
    Toggle {
        project_id: Uuid,
        task_id: Uuid,
    },
}

#[derive(Debug, Subcommand)]
enum ProfileCommand {
    Show,
    Set {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    /// Flip one notification setting.
    Toggle {
        #[arg(value_parser = parse_setting)]
        setting: NotificationSetting,
    },
}

fn main() -> CliResult<()> {
    let args = Cli::parse();

    let mut config = TrackerConfig::from_env()?;
    if let Some(db) = args.db {
        config.db_path = db;
    }
    if let Some(log_dir) = args.log_dir {
        config.log_dir = Some(log_dir);
    }
    if let Some(log_dir) = &config.log_dir {
        let log_dir = std::env::current_dir()?.join(log_dir);
        init_logging(config.log_level, log_dir)?;
    }

    match args.command {
        Commands::Project(command) => run_project(&config.db_path, command),
        Commands::Task(command) => run_task(&config.db_path, command),
        Commands::Stats => {
            let conn = open_db(&config.db_path)?;
            let projects = ProjectStore::new(SqliteKeyValueStore::new(&conn)).load()?;
            render::stats(&dashboard_stats(&projects, Utc::now()), &projects);
            Ok(())
        }
        Commands::Notifications => {
            let conn = open_db(&config.db_path)?;
            let projects = ProjectStore::new(SqliteKeyValueStore::new(&conn)).load()?;
            render::report(&classify(&projects, Utc::now()));
            Ok(())
        }
        Commands::Watch => {
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(watch(config, async {
                let _ = tokio::signal::ctrl_c().await;
            }))
        }
        Commands::Profile(command) => run_profile(&config.db_path, command),
    }
}

fn run_project(db_path: &Path, command: ProjectCommand) -> CliResult<()> {
    let conn = open_db(db_path)?;
    let service = ProjectService::new(ProjectStore::new(SqliteKeyValueStore::new(&conn)));

    match command {
        ProjectCommand::Add(fields) => {
            let project = service.create_project(NewProject {
                title: fields.title,
                description: fields.description,
                deadline: fields.deadline,
            })?;
            println!("Project created with ID {}", project.id);
        }
        ProjectCommand::Edit { id, fields } => {
            let project = service.update_project(
                id,
                ProjectEdit {
                    title: fields.title,
                    description: fields.description,
                    deadline: fields.deadline,
                },
            )?;
            render::project(&project);
        }
        ProjectCommand::Rm { id } => {
            let removed = service.delete_project(id)?;
            println!(
                "Deleted project \"{}\" and {} task(s)",
                removed.title,
                removed.tasks.len()
            );
        }
        ProjectCommand::List => render::project_list(&service.list_projects()?),
        ProjectCommand::Show { id } => render::project(&service.get_project(id)?),
    }
    Ok(())
}

fn run_task(db_path: &Path, command: TaskCommand) -> CliResult<()> {
    let conn = open_db(db_path)?;
    let service = ProjectService::new(ProjectStore::new(SqliteKeyValueStore::new(&conn)));

    match command {
        TaskCommand::Add {
            project_id,
            title,
            description,
            deadline,
            priority,
        } => {
            let task = service.add_task(
                project_id,
                NewTask {
                    title,
                    description,
                    deadline,
                    priority,
                },
            )?;
            println!("Task added with ID {}", task.id);
        }
        TaskCommand::Edit {
            project_id,
            task_id,
            title,
            description,
            deadline,
            priority,
        } => {
            let task = service.update_task(
                project_id,
                task_id,
                TaskEdit {
                    title,
                    description,
                    deadline,
                    priority,
                },
            )?;
            render::task(&task);
        }
        TaskCommand::Rm {
            project_id,
            task_id,
        } => {
            let removed = service.delete_task(project_id, task_id)?;
            println!("Deleted task \"{}\"", removed.title);
        }
        TaskCommand::Toggle {
            project_id,
            task_id,
        } => {
            let outcome = service.toggle_task(project_id, task_id)?;
            let state = if outcome.completed { "completed" } else { "reopened" };
            println!("Task {state}; project progress is now {}%", outcome.progress);
        }
    }
    Ok(())
}

fn run_profile(db_path: &Path, command: ProfileCommand) -> CliResult<()> {
    let conn = open_db(db_path)?;
    let service = ProfileService::new(ProfileStore::new(SqliteKeyValueStore::new(&conn)));

    match command {
        ProfileCommand::Show => render::profile(&service.get_profile()?),
        ProfileCommand::Set { name, email } => {
            render::profile(&service.update_identity(name, email)?);
        }
        ProfileCommand::Toggle { setting } => {
            let enabled = service.toggle_setting(setting)?;
            let state = if enabled { "on" } else { "off" };
            println!("{} is now {state}", setting.as_str());
        }
    }
    Ok(())
}

/// Prints each new snapshot until `shutdown` resolves or the poller stops.
async fn watch(config: TrackerConfig, shutdown: impl Future<Output = ()>) -> CliResult<()> {
    let db_path = config.db_path.clone();
    let poller = NotificationPoller::new(
        move || {
            let conn = open_db(&db_path).map_err(|err| err.to_string())?;
            ProjectStore::new(SqliteKeyValueStore::new(&conn))
                .load()
                .map_err(|err| err.to_string())
        },
        CancellationToken::new(),
    )
    .with_poll_interval(config.poll_interval);

    let handle = poller.spawn();
    let mut updates = handle.subscribe();
    info!(
        "event=watch_start module=cli status=ok db_path={}",
        config.db_path.display()
    );

    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = updates.borrow_and_update().clone();
                if let Some(snapshot) = snapshot {
                    render::snapshot(&snapshot);
                }
            }
        }
    }

    handle.shutdown().await;
    Ok(())
}

fn parse_priority(value: &str) -> Result<Priority, String> {
    Priority::parse(value)
        .ok_or_else(|| format!("unknown priority `{value}`; expected low|medium|high"))
}

fn parse_setting(value: &str) -> Result<NotificationSetting, String> {
    NotificationSetting::parse(value).ok_or_else(|| {
        let known: Vec<_> = NotificationSetting::ALL
            .iter()
            .map(|setting| setting.as_str())
            .collect();
        format!("unknown setting `{value}`; expected one of {}", known.join("|"))
    })
}
