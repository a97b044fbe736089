//! Entity model for tier-list classification.
//!
//! # Responsibility
//! - Define the tier, thing and placement shapes shared by every layer.
//! - Define the `Document` unit that is persisted, exported and imported.
//!
//! # Invariants
//! - `Tier.id` and `Thing.id` are unique within their collections.
//! - A thing without a `place` belongs to the row-0 queue tier.
//! - Only `Document` content is durable; interaction flags never are.

pub mod document;
pub mod thing;
pub mod tier;
