//! Persistence adapter: durable key-value store and portable document blob.
//!
//! # Responsibility
//! - Define the persistence port injected into the state store.
//! - Keep SQLite and JSON details out of state transitions.
//!
//! # Invariants
//! - The durable record is one serialized `Document` under a fixed key.
//! - Export and import share one codec, so `import(export(d)) == d`.

use crate::db::DbError;
use crate::repo::document_codec::DocumentCodecError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod document_codec;
pub mod document_repo;
pub mod kv_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence failure.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Backing store refused the operation.
    Unavailable(String),
    /// Stored bytes do not decode as a document.
    Codec(DocumentCodecError),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Unavailable(message) => write!(f, "storage unavailable: {message}"),
            Self::Codec(err) => write!(f, "stored document is unreadable: {err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Unavailable(_) => None,
            Self::Codec(err) => Some(err),
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<DocumentCodecError> for RepoError {
    fn from(value: DocumentCodecError) -> Self {
        Self::Codec(value)
    }
}
