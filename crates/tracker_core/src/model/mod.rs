//! Domain model for projects, tasks and the user profile.
//!
//! # Responsibility
//! - Define canonical records persisted in the key-value store.
//! - Keep derived fields (project progress) consistent with their inputs.
//!
//! # Invariants
//! - Every project and task is identified by a stable UUID.
//! - Deletion is a hard removal from the owning collection.

pub mod profile;
pub mod project;
