//! Thing domain model.
//!
//! # Responsibility
//! - Define ranked items, their kinds and their tier placement.
//! - Define `NewThing`, the only shape callers may construct directly.
//!
//! # Invariants
//! - `ThingId` is assigned by the store and never changes afterwards.
//! - `Place.rank` is reserved; no mutation derives a value other than 0.

use crate::model::tier::Tier;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque thing identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThingId(String);

impl ThingId {
    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for ThingId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ThingId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Display for ThingId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// How a thing is rendered by the UI collaborator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThingKind {
    /// Plain text label. Older exports omit `type`, which decodes here.
    #[default]
    Text,
    /// Inline image carried in `payload`.
    Image,
}

/// Tier assignment for one thing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Place {
    /// Foreign key into `Tier.row`.
    pub row: i64,
    /// Reserved intra-tier order. Serialized as `order` for file compatibility.
    #[serde(rename = "order", default)]
    pub rank: i64,
}

impl Place {
    /// Placement at the head of `tier`; rank is always 0.
    pub fn in_tier(tier: &Tier) -> Self {
        Self {
            row: tier.row,
            rank: 0,
        }
    }
}

/// Ranked item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thing {
    pub id: ThingId,
    pub title: String,
    #[serde(rename = "type", default)]
    pub kind: ThingKind,
    /// Inline image data URL, serialized as `dataUrl`.
    #[serde(rename = "dataUrl", default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place: Option<Place>,
}

impl Thing {
    /// Effective row of this thing; unplaced things sit in the queue.
    pub fn row(&self) -> i64 {
        self.place.map_or(crate::model::tier::QUEUE_ROW, |place| place.row)
    }
}

/// Thing without identity, as supplied by forms and file drops.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewThing {
    pub title: String,
    #[serde(rename = "type", default)]
    pub kind: ThingKind,
    #[serde(rename = "dataUrl", default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place: Option<Place>,
}

impl NewThing {
    /// Text thing with the given title.
    pub fn text(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            kind: ThingKind::Text,
            payload: None,
            place: None,
        }
    }

    /// Image thing with an inline data URL payload.
    pub fn image(title: impl Into<String>, data_url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            kind: ThingKind::Image,
            payload: Some(data_url.into()),
            place: None,
        }
    }

    /// Attaches identity, producing a full `Thing`.
    pub fn with_id(self, id: ThingId) -> Thing {
        Thing {
            id,
            title: self.title,
            kind: self.kind,
            payload: self.payload,
            place: self.place,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{NewThing, Place, Thing, ThingId, ThingKind};

    #[test]
    fn missing_type_decodes_as_text() {
        let thing: Thing = serde_json::from_str(r#"{"id":"t1","title":"Rust"}"#).unwrap();
        assert_eq!(thing.kind, ThingKind::Text);
        assert_eq!(thing.place, None);
        assert_eq!(thing.row(), 0);
    }

    #[test]
    fn with_id_keeps_every_other_field() {
        let new_thing = NewThing::image("cat.png", "data:image/png;base64,AAAA");
        let thing = new_thing.clone().with_id(ThingId::from("abc"));
        assert_eq!(thing.id.as_str(), "abc");
        assert_eq!(thing.title, new_thing.title);
        assert_eq!(thing.kind, ThingKind::Image);
        assert_eq!(thing.payload, new_thing.payload);
    }

    #[test]
    fn place_without_order_decodes_with_zero_rank() {
        let thing: Thing =
            serde_json::from_str(r#"{"id":"t1","title":"Rust","place":{"row":2}}"#).unwrap();
        assert_eq!(thing.place, Some(Place { row: 2, rank: 0 }));
        assert_eq!(thing.row(), 2);
    }
}
