//! In-memory tier-list state.

use crate::model::document::Document;
use crate::model::thing::{Thing, ThingId};
use crate::model::tier::Tier;

/// Drag-interaction submachine view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragState<'a> {
    Idle,
    Dragging(&'a ThingId),
}

/// Durable document plus transient interaction flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TierState {
    pub document: Document,
    /// Thing currently being dragged. Not validated against `things`.
    pub dragging_thing_id: Option<ThingId>,
    /// True while an import is in flight.
    pub loading: bool,
    /// Message of the last rejected import, cleared by the next import.
    pub import_error: Option<String>,
}

impl TierState {
    /// Wraps a document with all transient flags reset.
    pub fn from_document(document: Document) -> Self {
        Self {
            document,
            dragging_thing_id: None,
            loading: false,
            import_error: None,
        }
    }

    pub fn tiers(&self) -> &[Tier] {
        &self.document.tiers
    }

    pub fn things(&self) -> &[Thing] {
        &self.document.things
    }

    pub fn drag_state(&self) -> DragState<'_> {
        match &self.dragging_thing_id {
            Some(id) => DragState::Dragging(id),
            None => DragState::Idle,
        }
    }

    /// Resolves the dragged id against the live collection.
    pub fn dragging_thing(&self) -> Option<&Thing> {
        self.dragging_thing_id
            .as_ref()
            .and_then(|id| self.document.find_thing(id))
    }
}
