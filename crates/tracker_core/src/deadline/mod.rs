//! Deadline-derived views: notification buckets and dashboard aggregates.
//!
//! Every computation takes `now` explicitly so results are reproducible.

pub mod classifier;
pub mod stats;
