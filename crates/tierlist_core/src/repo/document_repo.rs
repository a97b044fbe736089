//! Durable document persistence port.
//!
//! # Responsibility
//! - Save and resume the live `Document` across restarts.
//!
//! # Invariants
//! - The document is stored under [`STORAGE_KEY`] using the export codec.
//! - An absent record is `Ok(None)`; unreadable bytes are `Err(Codec)`.

use crate::model::document::Document;
use crate::repo::document_codec::{export_document, import_document};
use crate::repo::kv_repo::KvRepository;
use crate::repo::RepoResult;

/// Fixed key of the durable document record.
pub const STORAGE_KEY: &str = "tier-list";

/// Persistence port consumed by the state store.
pub trait DocumentStore {
    fn save(&self, document: &Document) -> RepoResult<()>;
    fn load(&self) -> RepoResult<Option<Document>>;
}

/// `DocumentStore` over any key-value byte store.
pub struct KvDocumentStore<K: KvRepository> {
    kv: K,
}

impl<K: KvRepository> KvDocumentStore<K> {
    pub fn new(kv: K) -> Self {
        Self { kv }
    }

    pub fn kv(&self) -> &K {
        &self.kv
    }
}

impl<K: KvRepository> DocumentStore for KvDocumentStore<K> {
    fn save(&self, document: &Document) -> RepoResult<()> {
        let bytes = export_document(document)?;
        self.kv.put_value(STORAGE_KEY, &bytes)
    }

    fn load(&self) -> RepoResult<Option<Document>> {
        match self.kv.get_value(STORAGE_KEY)? {
            Some(bytes) => Ok(Some(import_document(&bytes)?)),
            None => Ok(None),
        }
    }
}
