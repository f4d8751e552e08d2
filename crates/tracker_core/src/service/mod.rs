//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store calls into use-case level APIs.
//! - Keep CLI callers decoupled from storage details.

pub mod profile_service;
pub mod project_service;
