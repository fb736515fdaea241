//! Core configuration for the local data file and logging.
//!
//! Configuration comes from the host as a JSON document; missing fields
//! take defaults. Nothing is read from the environment.

use crate::db::{open_db, DbError};
use crate::logging::{default_log_level, init_logging};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const DEFAULT_DB_FILE_NAME: &str = "visaflow.sqlite3";
const DEFAULT_LOG_SUBDIR: &str = "logs";

#[derive(Debug)]
pub enum ConfigError {
    Parse(serde_json::Error),
    Io { path: PathBuf, source: std::io::Error },
    Db(DbError),
    Logging(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid core config: {err}"),
            Self::Io { path, source } => write!(f, "cannot prepare `{}`: {source}", path.display()),
            Self::Db(err) => write!(f, "{err}"),
            Self::Logging(message) => write!(f, "{message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Io { source, .. } => Some(source),
            Self::Db(err) => Some(err),
            Self::Logging(_) => None,
        }
    }
}

impl From<DbError> for ConfigError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

/// Host-supplied settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CoreConfig {
    /// Directory holding the data file (and logs unless `log_dir` is set).
    pub data_dir: PathBuf,
    pub db_file_name: String,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            db_file_name: DEFAULT_DB_FILE_NAME.to_string(),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl CoreConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(ConfigError::Parse)
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(&self.db_file_name)
    }

    pub fn effective_log_dir(&self) -> PathBuf {
        self.log_dir
            .clone()
            .unwrap_or_else(|| self.data_dir.join(DEFAULT_LOG_SUBDIR))
    }

    /// Starts logging with the configured level and directory.
    ///
    /// A relative directory is resolved against the current working
    /// directory first.
    pub fn init_logging(&self) -> Result<(), ConfigError> {
        let log_dir = absolute_dir(&self.effective_log_dir())?;
        init_logging(&self.log_level, log_dir).map_err(ConfigError::Logging)
    }

    /// Creates `data_dir` if needed and opens the migrated data file.
    pub fn open_data_file(&self) -> Result<Connection, ConfigError> {
        ensure_dir(&self.data_dir)?;
        Ok(open_db(self.db_path())?)
    }
}

fn ensure_dir(path: &Path) -> Result<(), ConfigError> {
    std::fs::create_dir_all(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn absolute_dir(path: &Path) -> Result<PathBuf, ConfigError> {
    std::path::absolute(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}
