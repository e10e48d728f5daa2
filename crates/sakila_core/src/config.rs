//! Explicit store and logging configuration.
//!
//! # Responsibility
//! - Parse TOML configuration into typed settings.
//! - Turn settings into a ready store handle and active logging.
//!
//! # Invariants
//! - Unknown keys are rejected so typos do not silently fall back to defaults.
//! - Without a database path, the store is in-memory and seeded with the
//!   sample dataset unless `load_sample = false`.
//! - A read-only store is opened as found: no migration, no seeding.

use crate::db::{load_sample_dataset, open_db, open_db_in_memory, open_db_read_only, DbResult};
use crate::logging::{default_log_level, init_logging, LoggingError};
use rusqlite::Connection;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    /// SQLite file; in-memory when absent.
    pub path: Option<PathBuf>,
    /// Seed an empty store with the sample dataset.
    pub load_sample: Option<bool>,
    /// Open `path` without write access; never migrated nor seeded.
    pub read_only: bool,
}

impl DatabaseConfig {
    pub fn should_load_sample(&self) -> bool {
        !self.is_read_only() && self.load_sample.unwrap_or(self.path.is_none())
    }

    /// Read-only applies to file stores only.
    pub fn is_read_only(&self) -> bool {
        self.read_only && self.path.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub level: Option<String>,
    /// Absolute log directory; logging stays off when absent.
    pub dir: Option<PathBuf>,
}

impl LoggingConfig {
    pub fn level(&self) -> &str {
        self.level.as_deref().unwrap_or(default_log_level())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CoreConfig {
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
}

impl CoreConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Opens the configured store, seeding it when requested and empty.
    pub fn open_store(&self) -> DbResult<Connection> {
        let mut conn = match self.database.path.as_ref() {
            Some(path) if self.database.read_only => open_db_read_only(path)?,
            Some(path) => open_db(path)?,
            None => open_db_in_memory()?,
        };

        if self.database.should_load_sample() {
            let customers: i64 =
                conn.query_row("SELECT COUNT(*) FROM customer;", [], |row| row.get(0))?;
            if customers == 0 {
                load_sample_dataset(&mut conn)?;
            }
        }

        Ok(conn)
    }

    /// Starts logging when a directory is configured; returns whether it is on.
    pub fn init_logging(&self) -> Result<bool, LoggingError> {
        let Some(dir) = self.logging.dir.as_ref() else {
            return Ok(false);
        };
        init_logging(self.logging.level(), dir)?;
        Ok(true)
    }
}
