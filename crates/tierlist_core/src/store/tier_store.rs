//! Side-effecting state store.
//!
//! # Responsibility
//! - Initialize state from the persistence port or the default document.
//! - Apply commands through the pure reducer and persist durable results.
//! - Translate drop messages into place/add/remove plus drag end.
//!
//! # Invariants
//! - Persistence happens synchronously before a command returns.
//! - Save failures are logged and never roll back in-memory state.
//! - A load from a superseded import never touches state.

use crate::import::file_drop::new_thing_from_file;
use crate::model::document::Document;
use crate::model::thing::{NewThing, ThingId};
use crate::model::tier::Tier;
use crate::repo::document_codec::DocumentCodecError;
use crate::repo::document_repo::DocumentStore;
use crate::store::command::{Command, DropPayload, DropTarget};
use crate::store::reducer::{add_thing, load_document, reduce, Outcome, Reduction};
use crate::store::state::TierState;
use log::{debug, info, warn};
use parking_lot::Mutex;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Store handle shared between the UI thread and import tasks.
pub type SharedTierStore<S> = Arc<Mutex<TierStore<S>>>;

/// Command failure surfaced to callers.
#[derive(Debug)]
pub enum StoreError {
    /// Import bytes are not a valid document. State keeps its document.
    MalformedImport(DocumentCodecError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedImport(err) => write!(f, "import rejected: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::MalformedImport(err) => Some(err),
        }
    }
}

/// Identifies one started import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportTicket {
    generation: u64,
}

impl ImportTicket {
    pub fn generation(self) -> u64 {
        self.generation
    }
}

/// Result of finishing an import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportCommit {
    Committed {
        tiers: usize,
        things: usize,
        cleared_placements: usize,
    },
    /// A newer import started after this one; its bytes were discarded.
    Superseded,
}

/// What a drop message resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    Placed(ThingId),
    Added(Vec<ThingId>),
    Removed(ThingId),
    /// Nothing matched; only the drag was ended.
    Ignored,
}

/// Authoritative tier-list state bound to a persistence port.
pub struct TierStore<S: DocumentStore> {
    state: TierState,
    persistence: S,
    import_generation: u64,
}

impl<S: DocumentStore> TierStore<S> {
    /// Resumes from persisted state, or synthesizes the default document.
    ///
    /// A failing or unreadable store is treated as first run.
    pub fn open(persistence: S) -> Self {
        let document = match persistence.load() {
            Ok(Some(document)) => {
                info!(
                    "event=doc_load module=store status=ok tiers={} things={}",
                    document.tiers.len(),
                    document.things.len()
                );
                info!(
                    "event=store_init module=store status=ok source=persisted tiers={} things={}",
                    document.tiers.len(),
                    document.things.len()
                );
                document
            }
            Ok(None) => {
                info!("event=doc_load module=store status=absent");
                info!("event=store_init module=store status=ok source=default");
                Document::with_default_tiers()
            }
            Err(err) => {
                warn!("event=doc_load module=store status=error error={err}");
                warn!(
                    "event=store_init module=store status=degraded source=default error={err}"
                );
                Document::with_default_tiers()
            }
        };

        Self {
            state: TierState::from_document(document),
            persistence,
            import_generation: 0,
        }
    }

    pub fn state(&self) -> &TierState {
        &self.state
    }

    pub fn document(&self) -> &Document {
        &self.state.document
    }

    pub fn persistence(&self) -> &S {
        &self.persistence
    }

    pub fn into_shared(self) -> SharedTierStore<S> {
        Arc::new(Mutex::new(self))
    }

    /// Applies one command.
    ///
    /// # Errors
    /// - `MalformedImport` when a `Load` carries bytes that do not decode.
    ///   The loading flag is cleared and `import_error` set before returning.
    pub fn dispatch(&mut self, command: Command) -> Result<Outcome, StoreError> {
        match command {
            Command::Load { bytes } => self
                .load_bytes(&bytes)
                .map(|cleared_placements| Outcome::Loaded { cleared_placements }),
            command => Ok(self.apply(command)),
        }
    }

    /// Moves a thing into `tier`. Returns `false` when the thing is absent.
    pub fn place(&mut self, thing_id: &ThingId, tier: &Tier) -> bool {
        !matches!(
            self.apply(Command::Place {
                thing_id: thing_id.clone(),
                tier: tier.clone(),
            }),
            Outcome::NotFound(_)
        )
    }

    /// Adds a thing and returns its assigned id.
    pub fn add(&mut self, thing: NewThing, tier: Option<&Tier>) -> ThingId {
        let (state, id) = add_thing(std::mem::take(&mut self.state), thing, tier);
        self.commit("add", state, &Outcome::Added(id.clone()));
        id
    }

    /// Removes a thing. Returns `false` when the thing is absent.
    pub fn remove(&mut self, thing_id: &ThingId) -> bool {
        !matches!(
            self.apply(Command::Remove {
                thing_id: thing_id.clone(),
            }),
            Outcome::NotFound(_)
        )
    }

    pub fn delete_all_things(&mut self) {
        self.apply(Command::DeleteAllThings);
    }

    pub fn drag_start(&mut self, thing_id: Option<ThingId>) {
        self.apply(Command::DragStart { thing_id });
    }

    pub fn drag_end(&mut self) {
        self.apply(Command::DragEnd);
    }

    pub fn loading_start(&mut self) {
        self.apply(Command::LoadingStart);
    }

    pub fn loading_end(&mut self) {
        self.apply(Command::LoadingEnd);
    }

    /// Replaces the document with decoded `bytes`.
    pub fn load(&mut self, bytes: Vec<u8>) -> Result<(), StoreError> {
        self.load_bytes(&bytes).map(|_| ())
    }

    /// Starts an import: bumps the generation and raises the loading flag.
    pub fn begin_import(&mut self) -> ImportTicket {
        self.import_generation += 1;
        self.loading_start();
        info!(
            "event=import_start module=store status=start generation={}",
            self.import_generation
        );
        ImportTicket {
            generation: self.import_generation,
        }
    }

    /// Returns whether `ticket` belongs to the most recent import.
    pub fn is_current_import(&self, ticket: ImportTicket) -> bool {
        ticket.generation == self.import_generation
    }

    /// Finishes an import with the bytes it read.
    ///
    /// Stale tickets are discarded without touching state.
    pub fn finish_import(
        &mut self,
        ticket: ImportTicket,
        bytes: Vec<u8>,
    ) -> Result<ImportCommit, StoreError> {
        if !self.is_current_import(ticket) {
            info!(
                "event=import_superseded module=store generation={} current={}",
                ticket.generation, self.import_generation
            );
            return Ok(ImportCommit::Superseded);
        }

        let cleared_placements = self.load_bytes(&bytes)?;
        Ok(ImportCommit::Committed {
            tiers: self.state.document.tiers.len(),
            things: self.state.document.things.len(),
            cleared_placements,
        })
    }

    /// Ends an import that failed before producing bytes.
    pub fn abort_import(&mut self, ticket: ImportTicket) {
        if self.is_current_import(ticket) {
            self.loading_end();
        }
    }

    /// Resolves a drop message and always ends the drag afterwards.
    pub fn drop_on(&mut self, target: &DropTarget, payload: DropPayload) -> DropOutcome {
        let outcome = match target {
            DropTarget::Trash => self.drop_on_trash(),
            DropTarget::Tier(tier_id) => match self.document().find_tier(tier_id).cloned() {
                Some(tier) => self.drop_on_tier(&tier, payload),
                None => {
                    debug!("event=command_noop module=store command=drop reason=tier_not_found tier_id={tier_id}");
                    DropOutcome::Ignored
                }
            },
        };
        self.drag_end();
        outcome
    }

    fn drop_on_tier(&mut self, tier: &Tier, payload: DropPayload) -> DropOutcome {
        match payload {
            DropPayload::Thing(raw_id) => {
                let thing_id = ThingId::from(raw_id);
                if self.place(&thing_id, tier) {
                    DropOutcome::Placed(thing_id)
                } else {
                    DropOutcome::Ignored
                }
            }
            DropPayload::Files(files) if !files.is_empty() => DropOutcome::Added(
                files
                    .iter()
                    .map(|file| self.add(new_thing_from_file(file), Some(tier)))
                    .collect(),
            ),
            DropPayload::Files(_) | DropPayload::Empty => DropOutcome::Ignored,
        }
    }

    fn drop_on_trash(&mut self) -> DropOutcome {
        let Some(thing_id) = self.state.dragging_thing_id.clone() else {
            return DropOutcome::Ignored;
        };
        if self.remove(&thing_id) {
            DropOutcome::Removed(thing_id)
        } else {
            DropOutcome::Ignored
        }
    }

    // Returns the number of dangling placements cleared by the load.
    fn load_bytes(&mut self, bytes: &[u8]) -> Result<usize, StoreError> {
        match load_document(std::mem::take(&mut self.state), bytes) {
            Ok((state, cleared_placements)) => {
                self.commit("load", state, &Outcome::Loaded { cleared_placements });
                Ok(cleared_placements)
            }
            Err((state, err)) => {
                self.state = state;
                warn!("event=import_rejected module=store status=error command=load error={err}");
                Err(StoreError::MalformedImport(err))
            }
        }
    }

    fn apply(&mut self, command: Command) -> Outcome {
        let name = command.name();
        let Reduction { state, outcome } = reduce(std::mem::take(&mut self.state), command);
        self.commit(name, state, &outcome);
        outcome
    }

    fn commit(&mut self, name: &str, state: TierState, outcome: &Outcome) {
        self.state = state;

        match outcome {
            Outcome::NotFound(thing_id) => debug!(
                "event=command_noop module=store command={name} reason=thing_not_found thing_id={thing_id}"
            ),
            Outcome::ImportRejected(err) => warn!(
                "event=import_rejected module=store status=error command={name} error={err}"
            ),
            Outcome::Loaded { cleared_placements } => info!(
                "event=import_commit module=store status=ok tiers={} things={} cleared_placements={cleared_placements}",
                self.state.document.tiers.len(),
                self.state.document.things.len()
            ),
            Outcome::Changed | Outcome::Added(_) | Outcome::Transient => {
                debug!("event=command_applied module=store command={name}")
            }
        }

        if outcome.is_durable() {
            self.persist();
        }
    }

    fn persist(&self) {
        match self.persistence.save(&self.state.document) {
            Ok(()) => debug!(
                "event=doc_save module=store status=ok things={}",
                self.state.document.things.len()
            ),
            Err(err) => warn!("event=doc_save module=store status=error error={err}"),
        }
    }
}
