//! Runtime configuration.
//!
//! # Responsibility
//! - Describe where the durable store and logs live.
//! - Carry the import loading floor.
//!
//! # Invariants
//! - Every field has a default; an empty JSON object is a valid config.
//! - Unknown fields are rejected so typos surface early.

use crate::import::pipeline::DEFAULT_MIN_LOADING;
use crate::logging::default_log_level;
use crate::repo::document_repo::KvDocumentStore;
use crate::repo::kv_repo::SqliteKvRepository;
use crate::repo::RepoResult;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration loading failure.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read config: {err}"),
            Self::Parse(err) => write!(f, "invalid config: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TierListConfig {
    /// SQLite file for the durable document. In-memory when absent.
    pub db_path: Option<PathBuf>,
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
    /// Absolute log directory. File logging is off when absent.
    pub log_dir: Option<PathBuf>,
    pub min_loading_ms: u64,
}

impl Default for TierListConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            log_level: default_log_level().to_string(),
            log_dir: None,
            min_loading_ms: DEFAULT_MIN_LOADING.as_millis() as u64,
        }
    }
}

impl TierListConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(raw).map_err(ConfigError::Parse)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        Self::from_json_str(&raw)
    }

    pub fn min_loading(&self) -> Duration {
        Duration::from_millis(self.min_loading_ms)
    }

    /// Opens the configured durable document store.
    pub fn open_document_store(&self) -> RepoResult<KvDocumentStore<SqliteKvRepository>> {
        let kv = match &self.db_path {
            Some(path) => SqliteKvRepository::open(path)?,
            None => SqliteKvRepository::open_in_memory()?,
        };
        Ok(KvDocumentStore::new(kv))
    }
}
