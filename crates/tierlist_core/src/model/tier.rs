//! Tier domain model.
//!
//! # Responsibility
//! - Define ranking buckets and the reserved queue row.
//! - Provide the fixed default ladder used on first run.
//!
//! # Invariants
//! - `row == QUEUE_ROW` is the unranked holding tier.
//! - `row > 0` tiers form the ranked ladder, lower rows rank higher.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Row number reserved for the unranked queue tier.
pub const QUEUE_ROW: i64 = 0;

/// Opaque tier identifier.
///
/// Generated ids are UUID v4 strings, but imported documents may carry any
/// non-empty string, so the value is never parsed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TierId(String);

impl TierId {
    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for TierId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for TierId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Display for TierId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Named ranking bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tier {
    pub id: TierId,
    pub title: String,
    /// Ranking key; see [`QUEUE_ROW`].
    pub row: i64,
    /// Display color, serialized as `hexColor` to match exported files.
    #[serde(rename = "hexColor", default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Tier {
    /// Creates a tier with a generated id.
    pub fn new(row: i64, title: impl Into<String>, color: Option<&str>) -> Self {
        Self {
            id: TierId::generate(),
            title: title.into(),
            row,
            color: color.map(str::to_string),
        }
    }

    /// Returns whether this is the unranked queue tier.
    pub fn is_queue(&self) -> bool {
        self.row == QUEUE_ROW
    }
}

const DEFAULT_LADDER: &[(i64, &str, &str)] = &[
    (1, "S", "#ff7f7e"),
    (2, "A", "#ffdf80"),
    (3, "B", "#feff7f"),
    (4, "C", "#beff7f"),
    (5, "F", "#7eff80"),
];

const QUEUE_TITLE: &str = "*";
const QUEUE_COLOR: &str = "#999999";

/// Builds the first-run tier set: rows 1..=5 followed by the queue tier.
pub fn default_tiers() -> Vec<Tier> {
    let mut tiers = DEFAULT_LADDER
        .iter()
        .map(|(row, title, color)| Tier::new(*row, *title, Some(color)))
        .collect::<Vec<_>>();
    tiers.push(Tier::new(QUEUE_ROW, QUEUE_TITLE, Some(QUEUE_COLOR)));
    tiers
}
