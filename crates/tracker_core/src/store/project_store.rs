//! Whole-collection project store.
//!
//! # Responsibility
//! - Read and write the full project list under one fixed key.
//! - Provide the single mutation entry point used by every write path.
//!
//! # Invariants
//! - Every write serializes the complete collection (read-modify-write).
//! - A collection is validated before it is written; a failing mutation
//!   leaves the stored document untouched.
//! - Missing, undecodable or invalid stored state loads as an empty list.
//! - Loaded progress is always derived from the loaded tasks.

use crate::model::project::{Project, ValidationError};
use crate::store::kv_store::KeyValueStore;
use crate::store::{decode_or_default, StoreError, StoreResult};
use log::{debug, warn};
use std::collections::HashSet;

/// Fixed key holding the serialized project array.
pub const PROJECTS_KEY: &str = "projects";

pub struct ProjectStore<S: KeyValueStore> {
    kv: S,
}

impl<S: KeyValueStore> ProjectStore<S> {
    pub fn new(kv: S) -> Self {
        Self { kv }
    }

    /// Loads the full project collection.
    ///
    /// # Errors
    /// - Only storage transport failures; bad documents load as empty.
    pub fn load(&self) -> StoreResult<Vec<Project>> {
        let raw = self.kv.get(PROJECTS_KEY)?;
        let mut projects: Vec<Project> = decode_or_default(PROJECTS_KEY, raw.as_deref());
        if let Err(err) = validate_collection(&projects) {
            warn!(
                "event=projects_load module=store status=fallback reason=invalid error={}",
                err
            );
            return Ok(Vec::new());
        }
        for project in &mut projects {
            let stored = project.progress;
            project.recompute_progress();
            if project.progress != stored {
                debug!(
                    "event=projects_load module=store status=repaired project_id={} stored_progress={} progress={}",
                    project.id, stored, project.progress
                );
            }
        }
        Ok(projects)
    }

    /// Applies `f` to the loaded collection and writes the result back whole.
    ///
    /// When `f` returns an error nothing is written and the error is
    /// returned unchanged.
    pub fn mutate<T, E>(&self, f: impl FnOnce(&mut Vec<Project>) -> Result<T, E>) -> Result<T, E>
    where
        E: From<StoreError>,
    {
        let mut projects = self.load()?;
        let output = f(&mut projects)?;
        self.replace_all(&projects)?;
        Ok(output)
    }

    /// Overwrites the stored collection.
    pub fn replace_all(&self, projects: &[Project]) -> StoreResult<()> {
        validate_collection(projects)?;
        let encoded = serde_json::to_string(projects).map_err(StoreError::Encode)?;
        self.kv.set(PROJECTS_KEY, &encoded)?;
        debug!(
            "event=projects_write module=store status=ok count={} bytes={}",
            projects.len(),
            encoded.len()
        );
        Ok(())
    }
}

fn validate_collection(projects: &[Project]) -> Result<(), ValidationError> {
    let mut seen = HashSet::with_capacity(projects.len());
    for project in projects {
        project.validate()?;
        if !seen.insert(project.id) {
            return Err(ValidationError::DuplicateId(project.id));
        }
    }
    Ok(())
}
