//! Store Adapter boundary: synchronous key -> JSON persistence.
//!
//! # Responsibility
//! - Define the `KeyValueStore` contract used by collection repositories.
//! - Provide an in-process store and a SQLite-backed store.
//!
//! # Invariants
//! - A missing key reads as `None`, never as an error.
//! - A failed `set` leaves the previous value for that key intact.
//! - Values are whole JSON documents; there is no partial update.

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::db::DbError;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence failure reported by a store adapter.
#[derive(Debug)]
pub enum StoreError {
    /// Writing the value would exceed the store capacity.
    QuotaExceeded {
        key: String,
        required_bytes: usize,
        quota_bytes: usize,
    },
    /// Stored text is not valid JSON, or a value could not be encoded.
    Serialization { key: String, source: serde_json::Error },
    Db(DbError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::QuotaExceeded {
                key,
                required_bytes,
                quota_bytes,
            } => write!(
                f,
                "storage quota exceeded writing `{key}`: {required_bytes} bytes needed, quota is {quota_bytes}"
            ),
            Self::Serialization { key, source } => {
                write!(f, "invalid JSON for key `{key}`: {source}")
            }
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::QuotaExceeded { .. } => None,
            Self::Serialization { source, .. } => Some(source),
            Self::Db(err) => Some(err),
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

/// Synchronous key-value persistence contract.
pub trait KeyValueStore {
    /// Reads the JSON document stored under `key`.
    fn get(&self, key: &str) -> StoreResult<Option<Value>>;
    /// Replaces the JSON document stored under `key`.
    fn set(&self, key: &str, value: &Value) -> StoreResult<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> StoreResult<Option<Value>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &Value) -> StoreResult<()> {
        (**self).set(key, value)
    }
}

pub(crate) fn encode(key: &str, value: &Value) -> StoreResult<String> {
    serde_json::to_string(value).map_err(|source| StoreError::Serialization {
        key: key.to_string(),
        source,
    })
}

pub(crate) fn decode(key: &str, text: &str) -> StoreResult<Value> {
    serde_json::from_str(text).map_err(|source| StoreError::Serialization {
        key: key.to_string(),
        source,
    })
}
