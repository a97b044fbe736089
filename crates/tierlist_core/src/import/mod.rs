//! Import flows feeding the state store.
//!
//! # Responsibility
//! - Replace the live document from a user-supplied file, asynchronously.
//! - Convert dropped files into image things.
//!
//! # Invariants
//! - Loading is visible for at least the configured minimum duration.
//! - Only the most recently started import may commit.

pub mod file_drop;
pub mod pipeline;
