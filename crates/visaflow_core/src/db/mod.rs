//! Agency data file: connection bootstrap and `kv_store` schema versions.
//!
//! # Invariants
//! - The `kv_store` schema version lives in `PRAGMA user_version`.
//! - A connection is handed out only after its schema is current.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    /// The data file could not be opened at all.
    Open {
        target: String,
        source: rusqlite::Error,
    },
    Sqlite(rusqlite::Error),
    /// Written by a newer build; opening it would risk data loss.
    SchemaTooNew { found: u32, supported: u32 },
    /// Connection was never migrated (not obtained through `open_db`).
    SchemaBehind { found: u32, expected: u32 },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open { target, source } => write!(f, "cannot open data file `{target}`: {source}"),
            Self::Sqlite(err) => write!(f, "data file error: {err}"),
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "data file schema v{found} was written by a newer VisaFlow (this build reads up to v{supported})"
            ),
            Self::SchemaBehind { found, expected } => {
                write!(f, "data file schema v{found} is not migrated to v{expected}")
            }
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Open { source, .. } | Self::Sqlite(source) => Some(source),
            Self::SchemaTooNew { .. } | Self::SchemaBehind { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
