//! Document model: the persisted and exported unit.
//!
//! # Responsibility
//! - Hold the full tier and thing collections.
//! - Provide identity and referential checks used by import paths.
//! - Provide read-only views consumed by the UI collaborator.
//!
//! # Invariants
//! - Serialized shape is exactly `{ "tiers": [...], "things": [...] }`.
//! - Collection order is insertion order and is preserved on round-trip.

use crate::model::thing::{Thing, ThingId};
use crate::model::tier::{default_tiers, Tier, TierId, QUEUE_ROW};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Identity violation found in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentValidationError {
    DuplicateTierId(TierId),
    DuplicateThingId(ThingId),
}

impl Display for DocumentValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateTierId(id) => write!(f, "duplicate tier id `{id}`"),
            Self::DuplicateThingId(id) => write!(f, "duplicate thing id `{id}`"),
        }
    }
}

impl Error for DocumentValidationError {}

/// Full tier list content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub tiers: Vec<Tier>,
    pub things: Vec<Thing>,
}

impl Document {
    /// First-run document: default ladder plus queue, no things.
    pub fn with_default_tiers() -> Self {
        Self {
            tiers: default_tiers(),
            things: Vec::new(),
        }
    }

    /// Checks that tier ids and thing ids are unique.
    pub fn validate(&self) -> Result<(), DocumentValidationError> {
        let mut tier_ids = HashSet::with_capacity(self.tiers.len());
        for tier in &self.tiers {
            if !tier_ids.insert(&tier.id) {
                return Err(DocumentValidationError::DuplicateTierId(tier.id.clone()));
            }
        }

        let mut thing_ids = HashSet::with_capacity(self.things.len());
        for thing in &self.things {
            if !thing_ids.insert(&thing.id) {
                return Err(DocumentValidationError::DuplicateThingId(thing.id.clone()));
            }
        }

        Ok(())
    }

    /// Clears placements pointing at rows no tier owns.
    ///
    /// Affected things fall back to the queue. Returns how many changed.
    pub fn clear_dangling_placements(&mut self) -> usize {
        let rows = self.tiers.iter().map(|tier| tier.row).collect::<HashSet<_>>();
        let mut cleared = 0;
        for thing in &mut self.things {
            if let Some(place) = thing.place {
                if !rows.contains(&place.row) {
                    thing.place = None;
                    cleared += 1;
                }
            }
        }
        cleared
    }

    pub fn find_thing(&self, id: &ThingId) -> Option<&Thing> {
        self.things.iter().find(|thing| &thing.id == id)
    }

    pub fn find_tier(&self, id: &TierId) -> Option<&Tier> {
        self.tiers.iter().find(|tier| &tier.id == id)
    }

    pub fn contains_thing(&self, id: &ThingId) -> bool {
        self.find_thing(id).is_some()
    }

    /// Every non-queue tier ascending by row, followed by queue tiers.
    ///
    /// Imported rows may be negative; they sort before row 1 and are never
    /// hidden.
    pub fn sorted_tiers(&self) -> Vec<&Tier> {
        let mut ranked = self
            .tiers
            .iter()
            .filter(|tier| tier.row != QUEUE_ROW)
            .collect::<Vec<_>>();
        ranked.sort_by_key(|tier| tier.row);
        ranked.extend(self.tiers.iter().filter(|tier| tier.row == QUEUE_ROW));
        ranked
    }

    /// Members of the tier at `row`, in insertion order.
    ///
    /// Unplaced things are members of the queue row.
    pub fn things_in_tier(&self, row: i64) -> Vec<&Thing> {
        self.things
            .iter()
            .filter(|thing| thing.row() == row)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{Document, DocumentValidationError};
    use crate::model::thing::{NewThing, Place, ThingId};
    use crate::model::tier::{Tier, TierId};

    fn placed(id: &str, row: i64) -> crate::model::thing::Thing {
        let mut new_thing = NewThing::text(id);
        new_thing.place = Some(Place { row, rank: 0 });
        new_thing.with_id(ThingId::from(id))
    }

    #[test]
    fn validate_rejects_duplicate_thing_ids() {
        let mut document = Document::with_default_tiers();
        document.things.push(placed("dup", 1));
        document.things.push(placed("dup", 2));

        let err = document.validate().unwrap_err();
        assert_eq!(err, DocumentValidationError::DuplicateThingId(ThingId::from("dup")));
    }

    #[test]
    fn validate_rejects_duplicate_tier_ids() {
        let mut tier = Tier::new(1, "S", None);
        tier.id = TierId::from("same");
        let mut other = Tier::new(2, "A", None);
        other.id = TierId::from("same");
        let document = Document {
            tiers: vec![tier, other],
            things: Vec::new(),
        };

        assert!(matches!(
            document.validate(),
            Err(DocumentValidationError::DuplicateTierId(_))
        ));
    }

    #[test]
    fn dangling_placements_fall_back_to_queue() {
        let mut document = Document::with_default_tiers();
        document.things.push(placed("kept", 3));
        document.things.push(placed("lost", 42));

        assert_eq!(document.clear_dangling_placements(), 1);
        assert_eq!(document.things[0].row(), 3);
        assert_eq!(document.things[1].place, None);
        assert_eq!(document.things_in_tier(0).len(), 1);
    }

    #[test]
    fn sorted_tiers_put_queue_last() {
        let mut document = Document::with_default_tiers();
        document.tiers.reverse();

        let rows = document
            .sorted_tiers()
            .into_iter()
            .map(|tier| tier.row)
            .collect::<Vec<_>>();
        assert_eq!(rows, vec![1, 2, 3, 4, 5, 0]);
    }

    #[test]
    fn sorted_tiers_keep_negative_rows_visible() {
        let document = Document {
            tiers: vec![
                Tier::new(0, "*", None),
                Tier::new(2, "A", None),
                Tier::new(-1, "Below", None),
            ],
            things: vec![placed("deep", -1)],
        };

        let rows = document
            .sorted_tiers()
            .into_iter()
            .map(|tier| tier.row)
            .collect::<Vec<_>>();
        assert_eq!(rows, vec![-1, 2, 0]);
        assert_eq!(document.things_in_tier(-1).len(), 1);
    }
}
