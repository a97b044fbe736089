//! Command messages accepted by the state store.

use crate::model::thing::{NewThing, ThingId};
use crate::model::tier::{Tier, TierId};

/// Closed set of state mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Moves an existing thing into `tier`.
    Place { thing_id: ThingId, tier: Tier },
    /// Creates a thing, placed in `tier` or left in the queue.
    ///
    /// The caller trims the title; the store does not re-validate it.
    Add { thing: NewThing, tier: Option<Tier> },
    Remove { thing_id: ThingId },
    DeleteAllThings,
    /// Starts dragging `thing_id`, or clears the drag when `None`.
    DragStart { thing_id: Option<ThingId> },
    DragEnd,
    LoadingStart,
    LoadingEnd,
    /// Replaces the document wholesale with the decoded bytes.
    Load { bytes: Vec<u8> },
}

impl Command {
    /// Stable name used in log events.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Place { .. } => "place",
            Self::Add { .. } => "add",
            Self::Remove { .. } => "remove",
            Self::DeleteAllThings => "delete_all_things",
            Self::DragStart { .. } => "drag_start",
            Self::DragEnd => "drag_end",
            Self::LoadingStart => "loading_start",
            Self::LoadingEnd => "loading_end",
            Self::Load { .. } => "load",
        }
    }
}

/// Where a dragged item was released.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    Tier(TierId),
    /// Deletes the dragged thing.
    Trash,
}

/// Raw file released onto a tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedFile {
    pub name: String,
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// What a drop carried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropPayload {
    /// Opaque id from the drag payload; resolved against live things.
    Thing(String),
    Files(Vec<DroppedFile>),
    /// Nothing usable, e.g. a trash drop.
    Empty,
}
