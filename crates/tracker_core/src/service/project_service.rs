//! Project and task use-case service.
//!
//! # Responsibility
//! - Provide create/edit/delete/toggle entry points for core callers.
//! - Route every write through `ProjectStore::mutate`.
//!
//! # Invariants
//! - Service APIs never write a partial collection.
//! - Project progress is recomputed on every change to its task set.
//! - Titles are trimmed before they are stored.

use crate::model::project::{Priority, Project, ProjectId, Task, TaskId, ValidationError};
use crate::store::kv_store::KeyValueStore;
use crate::store::project_store::ProjectStore;
use crate::store::StoreError;
use chrono::NaiveDate;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for project/task use cases.
#[derive(Debug)]
pub enum ServiceError {
    ProjectNotFound(ProjectId),
    TaskNotFound {
        project_id: ProjectId,
        task_id: TaskId,
    },
    Validation(ValidationError),
    Store(StoreError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ProjectNotFound(id) => write!(f, "project not found: {id}"),
            Self::TaskNotFound {
                project_id,
                task_id,
            } => write!(f, "task {task_id} not found in project {project_id}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Validation(err) => Self::Validation(err),
            other => Self::Store(other),
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Input for creating a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProject {
    pub title: String,
    pub description: String,
    pub deadline: NaiveDate,
}

/// Partial edit of project fields; `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectEdit {
    pub title: Option<String>,
    pub description: Option<String>,
    pub deadline: Option<NaiveDate>,
}

/// Input for adding a task to a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub deadline: NaiveDate,
    pub priority: Priority,
}

/// Partial edit of task fields; `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskEdit {
    pub title: Option<String>,
    pub description: Option<String>,
    pub deadline: Option<NaiveDate>,
    pub priority: Option<Priority>,
}

/// Result of a completion toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleOutcome {
    pub completed: bool,
    pub progress: u8,
}

pub struct ProjectService<S: KeyValueStore> {
    store: ProjectStore<S>,
}

impl<S: KeyValueStore> ProjectService<S> {
    pub fn new(store: ProjectStore<S>) -> Self {
        Self { store }
    }

    /// Lists all projects in stored order.
    pub fn list_projects(&self) -> ServiceResult<Vec<Project>> {
        Ok(self.store.load()?)
    }

    pub fn get_project(&self, id: ProjectId) -> ServiceResult<Project> {
        self.store
            .load()?
            .into_iter()
            .find(|project| project.id == id)
            .ok_or(ServiceError::ProjectNotFound(id))
    }

    /// Creates an empty project (`progress = 0`) at the end of the list.
    pub fn create_project(&self, input: NewProject) -> ServiceResult<Project> {
        let project = Project::new(input.title.trim(), input.deadline)
            .with_description(input.description.trim());
        project.validate()?;

        let created = self.store.mutate(|projects| -> ServiceResult<Project> {
            projects.push(project.clone());
            Ok(project)
        })?;
        info!(
            "event=project_create module=service status=ok project_id={}",
            created.id
        );
        Ok(created)
    }

    pub fn update_project(&self, id: ProjectId, edit: ProjectEdit) -> ServiceResult<Project> {
        self.store.mutate(|projects| -> ServiceResult<Project> {
            let project = find_project(projects, id)?;
            if let Some(title) = edit.title {
                project.title = title.trim().to_string();
            }
            if let Some(description) = edit.description {
                project.description = description.trim().to_string();
            }
            if let Some(deadline) = edit.deadline {
                project.deadline = deadline;
            }
            project.validate()?;
            Ok(project.clone())
        })
    }

    pub fn delete_project(&self, id: ProjectId) -> ServiceResult<Project> {
        let removed = self.store.mutate(|projects| -> ServiceResult<Project> {
            let index = projects
                .iter()
                .position(|project| project.id == id)
                .ok_or(ServiceError::ProjectNotFound(id))?;
            Ok(projects.remove(index))
        })?;
        info!("event=project_delete module=service status=ok project_id={id}");
        Ok(removed)
    }

    /// Appends an incomplete task and returns it.
    pub fn add_task(&self, project_id: ProjectId, input: NewTask) -> ServiceResult<Task> {
        let task = Task::new(input.title.trim(), input.deadline, input.priority)
            .with_description(input.description.trim());
        task.validate()?;

        self.store.mutate(|projects| -> ServiceResult<Task> {
            let project = find_project(projects, project_id)?;
            project.push_task(task.clone());
            Ok(task)
        })
    }

    pub fn update_task(
        &self,
        project_id: ProjectId,
        task_id: TaskId,
        edit: TaskEdit,
    ) -> ServiceResult<Task> {
        self.store.mutate(|projects| -> ServiceResult<Task> {
            let project = find_project(projects, project_id)?;
            let task = project
                .task_mut(task_id)
                .ok_or(ServiceError::TaskNotFound {
                    project_id,
                    task_id,
                })?;
            if let Some(title) = edit.title {
                task.title = title.trim().to_string();
            }
            if let Some(description) = edit.description {
                task.description = description.trim().to_string();
            }
            if let Some(deadline) = edit.deadline {
                task.deadline = deadline;
            }
            if let Some(priority) = edit.priority {
                task.priority = priority;
            }
            task.validate()?;
            Ok(task.clone())
        })
    }

    pub fn delete_task(&self, project_id: ProjectId, task_id: TaskId) -> ServiceResult<Task> {
        self.store.mutate(|projects| -> ServiceResult<Task> {
            find_project(projects, project_id)?
                .remove_task(task_id)
                .ok_or(ServiceError::TaskNotFound {
                    project_id,
                    task_id,
                })
        })
    }

    /// Flips task completion and recomputes the owning project's progress.
    pub fn toggle_task(
        &self,
        project_id: ProjectId,
        task_id: TaskId,
    ) -> ServiceResult<ToggleOutcome> {
        let outcome = self.store.mutate(|projects| -> ServiceResult<ToggleOutcome> {
            let project = find_project(projects, project_id)?;
            let completed = project
                .toggle_task(task_id)
                .ok_or(ServiceError::TaskNotFound {
                    project_id,
                    task_id,
                })?;
            Ok(ToggleOutcome {
                completed,
                progress: project.progress,
            })
        })?;
        info!(
            "event=task_toggle module=service status=ok project_id={} task_id={} completed={} progress={}",
            project_id, task_id, outcome.completed, outcome.progress
        );
        Ok(outcome)
    }
}

fn find_project(projects: &mut [Project], id: ProjectId) -> ServiceResult<&mut Project> {
    projects
        .iter_mut()
        .find(|project| project.id == id)
        .ok_or(ServiceError::ProjectNotFound(id))
}
