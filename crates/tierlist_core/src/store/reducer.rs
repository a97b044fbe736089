//! Pure state transitions.
//!
//! # Invariants
//! - `reduce` performs no I/O; the caller decides whether to persist from
//!   the returned `Outcome`.
//! - `Place.rank` is always written as 0.
//! - A command targeting an absent thing leaves the state untouched.

use crate::model::document::Document;
use crate::model::thing::{NewThing, Place, ThingId};
use crate::model::tier::Tier;
use crate::repo::document_codec::{import_document, DocumentCodecError};
use crate::store::command::Command;
use crate::store::state::TierState;

/// What a transition did.
#[derive(Debug)]
pub enum Outcome {
    /// Durable content changed.
    Changed,
    /// A thing was created with this id. Durable.
    Added(ThingId),
    /// Document replaced by an import. Durable.
    Loaded { cleared_placements: usize },
    /// Only transient flags changed.
    Transient,
    /// Target thing does not exist; nothing changed.
    NotFound(ThingId),
    /// Import bytes rejected; document kept, loading cleared.
    ImportRejected(DocumentCodecError),
}

impl Outcome {
    /// Returns whether the resulting document must be persisted.
    pub fn is_durable(&self) -> bool {
        matches!(self, Self::Changed | Self::Added(_) | Self::Loaded { .. })
    }
}

/// Result of one transition.
#[derive(Debug)]
pub struct Reduction {
    pub state: TierState,
    pub outcome: Outcome,
}

impl Reduction {
    fn new(state: TierState, outcome: Outcome) -> Self {
        Self { state, outcome }
    }
}

/// Applies one command to `state`.
pub fn reduce(mut state: TierState, command: Command) -> Reduction {
    match command {
        Command::Place { thing_id, tier } => {
            let Some(index) = state
                .document
                .things
                .iter()
                .position(|thing| thing.id == thing_id)
            else {
                return Reduction::new(state, Outcome::NotFound(thing_id));
            };
            state.document.things[index].place = Some(Place::in_tier(&tier));
            Reduction::new(state, Outcome::Changed)
        }
        Command::Add { thing, tier } => {
            let (state, id) = add_thing(state, thing, tier.as_ref());
            Reduction::new(state, Outcome::Added(id))
        }
        Command::Remove { thing_id } => {
            let before = state.document.things.len();
            state.document.things.retain(|thing| thing.id != thing_id);
            if state.document.things.len() == before {
                Reduction::new(state, Outcome::NotFound(thing_id))
            } else {
                Reduction::new(state, Outcome::Changed)
            }
        }
        Command::DeleteAllThings => {
            state.document.things.clear();
            Reduction::new(state, Outcome::Changed)
        }
        Command::DragStart { thing_id } => {
            state.dragging_thing_id = thing_id;
            Reduction::new(state, Outcome::Transient)
        }
        Command::DragEnd => {
            state.dragging_thing_id = None;
            Reduction::new(state, Outcome::Transient)
        }
        Command::LoadingStart => {
            state.loading = true;
            state.import_error = None;
            Reduction::new(state, Outcome::Transient)
        }
        Command::LoadingEnd => {
            state.loading = false;
            Reduction::new(state, Outcome::Transient)
        }
        Command::Load { bytes } => match load_document(state, &bytes) {
            Ok((state, cleared_placements)) => {
                Reduction::new(state, Outcome::Loaded { cleared_placements })
            }
            Err((state, err)) => Reduction::new(state, Outcome::ImportRejected(err)),
        },
    }
}

/// Appends `thing` under a fresh id, placed in `tier` when given.
pub fn add_thing(
    mut state: TierState,
    thing: NewThing,
    tier: Option<&Tier>,
) -> (TierState, ThingId) {
    let id = fresh_thing_id(&state.document);
    let mut thing = thing.with_id(id.clone());
    thing.place = tier.map(Place::in_tier);
    state.document.things.push(thing);
    (state, id)
}

/// Replaces the document with decoded `bytes`.
///
/// On success returns the fresh state and how many dangling placements were
/// cleared. On failure the document is kept, loading is cleared and
/// `import_error` is set.
pub fn load_document(
    mut state: TierState,
    bytes: &[u8],
) -> Result<(TierState, usize), (TierState, DocumentCodecError)> {
    match import_document(bytes) {
        Ok(mut document) => {
            let cleared_placements = document.clear_dangling_placements();
            Ok((TierState::from_document(document), cleared_placements))
        }
        Err(err) => {
            state.loading = false;
            state.import_error = Some(err.to_string());
            Err((state, err))
        }
    }
}

// Imported ids need not be UUIDs; uniqueness is checked against them too.
fn fresh_thing_id(document: &Document) -> ThingId {
    loop {
        let id = ThingId::generate();
        if !document.contains_thing(&id) {
            return id;
        }
    }
}
