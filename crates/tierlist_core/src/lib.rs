//! Core state machine for tier-list classification.
//! This crate owns thing/tier membership, drag interaction, persistence and
//! document import; rendering and input devices live with the caller.

pub mod config;
pub mod db;
pub mod import;
pub mod logging;
pub mod model;
pub mod repo;
pub mod store;

pub use config::{ConfigError, TierListConfig};
pub use import::file_drop::new_thing_from_file;
pub use import::pipeline::{ImportError, ImportPipeline, DEFAULT_MIN_LOADING};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::document::{Document, DocumentValidationError};
pub use model::thing::{NewThing, Place, Thing, ThingId, ThingKind};
pub use model::tier::{default_tiers, Tier, TierId, QUEUE_ROW};
pub use repo::document_codec::{
    export_document, import_document, is_accepted_import, DocumentCodecError, EXPORT_FILE_NAME,
    EXPORT_MIME_TYPE,
};
pub use repo::document_repo::{DocumentStore, KvDocumentStore, STORAGE_KEY};
pub use repo::kv_repo::{KvRepository, MemoryKvRepository, SqliteKvRepository};
pub use repo::{RepoError, RepoResult};
pub use store::command::{Command, DropPayload, DropTarget, DroppedFile};
pub use store::reducer::{reduce, Outcome, Reduction};
pub use store::state::{DragState, TierState};
pub use store::tier_store::{
    DropOutcome, ImportCommit, ImportTicket, SharedTierStore, StoreError, TierStore,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
