//! State store: the single authoritative tier-list state and its commands.
//!
//! # Responsibility
//! - Hold `TierState` and apply commands strictly in dispatch order.
//! - Persist the document after every durable-changing command.
//! - Arbitrate overlapping imports by generation.
//!
//! # Invariants
//! - Transitions are computed by the pure `reducer::reduce`; side effects
//!   (persistence, logging) live only in `TierStore`.
//! - At most one thing is dragging at a time.
//! - Interaction and loading flags are never persisted.

pub mod command;
pub mod reducer;
pub mod state;
pub mod tier_store;
