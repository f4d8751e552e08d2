//! Core domain logic for the deadline tracker.
//! This crate is the single source of truth for business invariants.

pub mod config;
pub mod db;
pub mod deadline;
pub mod logging;
pub mod model;
pub mod poller;
pub mod service;
pub mod store;

pub use config::{ConfigError, TrackerConfig};
pub use deadline::classifier::{
    classify, diff_days, time_remaining_label, DeadlineClassifier, DeadlineReport, DeadlineStatus,
    Notification, NotificationSource,
};
pub use deadline::stats::{dashboard_stats, DashboardStats, ProgressBand};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::profile::{NotificationSetting, NotificationSettings, UserProfile};
pub use model::project::{
    progress_percent, Priority, Project, ProjectId, Task, TaskId, ValidationError,
};
pub use poller::{NotificationPoller, NotificationSnapshot, PollerHandle, SnapshotReceiver};
pub use service::profile_service::{ProfileService, ProfileServiceError};
pub use service::project_service::{
    NewProject, NewTask, ProjectEdit, ProjectService, ServiceError, ServiceResult, TaskEdit,
    ToggleOutcome,
};
pub use store::kv_store::{KeyValueStore, SqliteKeyValueStore};
pub use store::profile_store::{ProfileStore, PROFILE_KEY};
pub use store::project_store::{ProjectStore, PROJECTS_KEY};
pub use store::{StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
