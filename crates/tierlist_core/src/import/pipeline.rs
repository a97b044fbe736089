//! Asynchronous document import.

use crate::repo::document_codec::is_accepted_import;
use crate::repo::document_repo::DocumentStore;
use crate::store::tier_store::{ImportCommit, SharedTierStore, StoreError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::future::Future;
use std::path::Path;
use std::time::{Duration, Instant};
use tokio::io::{AsyncRead, AsyncReadExt};

/// Default floor for the visible loading phase.
pub const DEFAULT_MIN_LOADING: Duration = Duration::from_millis(1000);

/// Import failure.
#[derive(Debug)]
pub enum ImportError {
    /// File does not pass the `.json` / JSON MIME filter. Nothing started.
    UnsupportedFile(String),
    /// Reading the source failed; loading was cleared.
    Io(std::io::Error),
    /// Bytes were read but rejected by the store.
    Rejected(StoreError),
}

impl Display for ImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedFile(name) => write!(f, "unsupported import file `{name}`"),
            Self::Io(err) => write!(f, "failed to read import: {err}"),
            Self::Rejected(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ImportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::UnsupportedFile(_) => None,
            Self::Io(err) => Some(err),
            Self::Rejected(err) => Some(err),
        }
    }
}

impl From<StoreError> for ImportError {
    fn from(value: StoreError) -> Self {
        Self::Rejected(value)
    }
}

/// Drives `loading_start` → read + delay → `load` against a shared store.
///
/// The store lock is only held between suspension points, so other commands
/// keep flowing while a read is pending.
pub struct ImportPipeline<S: DocumentStore> {
    store: SharedTierStore<S>,
    min_loading: Duration,
}

impl<S: DocumentStore> ImportPipeline<S> {
    pub fn new(store: SharedTierStore<S>) -> Self {
        Self {
            store,
            min_loading: DEFAULT_MIN_LOADING,
        }
    }

    pub fn with_min_loading(mut self, min_loading: Duration) -> Self {
        self.min_loading = min_loading;
        self
    }

    pub fn store(&self) -> &SharedTierStore<S> {
        &self.store
    }

    /// Imports a document file from disk.
    pub async fn import_file(&self, path: impl AsRef<Path>) -> Result<ImportCommit, ImportError> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default();
        if !is_accepted_import(file_name, None) {
            return Err(ImportError::UnsupportedFile(path.display().to_string()));
        }
        self.run(tokio::fs::read(path)).await
    }

    /// Imports from a picked file whose name and MIME type came from the
    /// picker, reading bytes from `reader`.
    pub async fn import_picked<R>(
        &self,
        file_name: &str,
        mime_type: Option<&str>,
        mut reader: R,
    ) -> Result<ImportCommit, ImportError>
    where
        R: AsyncRead + Unpin,
    {
        if !is_accepted_import(file_name, mime_type) {
            return Err(ImportError::UnsupportedFile(file_name.to_string()));
        }
        self.run(async move {
            let mut bytes = Vec::new();
            reader.read_to_end(&mut bytes).await?;
            Ok(bytes)
        })
        .await
    }

    async fn run<F>(&self, read: F) -> Result<ImportCommit, ImportError>
    where
        F: Future<Output = std::io::Result<Vec<u8>>>,
    {
        let ticket = self.store.lock().begin_import();
        let started_at = Instant::now();

        let (read_result, ()) = tokio::join!(read, tokio::time::sleep(self.min_loading));

        let bytes = match read_result {
            Ok(bytes) => bytes,
            Err(err) => {
                self.store.lock().abort_import(ticket);
                warn!(
                    "event=import_read module=import status=error generation={} error={err}",
                    ticket.generation()
                );
                return Err(ImportError::Io(err));
            }
        };

        let byte_len = bytes.len();
        let commit = self.store.lock().finish_import(ticket, bytes)?;
        info!(
            "event=import_done module=import status=ok generation={} bytes={byte_len} superseded={} duration_ms={}",
            ticket.generation(),
            commit == ImportCommit::Superseded,
            started_at.elapsed().as_millis()
        );
        Ok(commit)
    }
}
