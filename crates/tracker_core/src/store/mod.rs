//! Local key-value persistence for whole-collection documents.
//!
//! # Responsibility
//! - Define the key-value contract the stores are written against.
//! - Keep JSON encode/decode and the "missing or malformed means empty"
//!   policy in one place.
//!
//! # Invariants
//! - Documents are read and written wholesale; there are no partial updates.
//! - A missing or undecodable document never surfaces as an error.

use crate::db::DbError;
use crate::model::project::ValidationError;
use log::warn;
use serde::de::DeserializeOwned;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod kv_store;
pub mod profile_store;
pub mod project_store;

pub type StoreResult<T> = Result<T, StoreError>;

/// Store-level failure for document reads and writes.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    Encode(serde_json::Error),
    Validation(ValidationError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode document: {err}"),
            Self::Validation(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::Validation(err) => Some(err),
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<ValidationError> for StoreError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Decodes a stored document, falling back to `T::default()` when the key is
/// absent or its value does not parse.
pub(crate) fn decode_or_default<T: DeserializeOwned + Default>(key: &str, raw: Option<&str>) -> T {
    let Some(raw) = raw else {
        return T::default();
    };
    match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(err) => {
            warn!(
                "event=document_decode module=store status=fallback key={} error={}",
                key, err
            );
            T::default()
        }
    }
}
