//! Reconciliation - what the catalog has that the local inventory doesn't.
//!
//! See [`engine`] for the pass structure and [`types`] for the records it
//! produces.

pub mod engine;
pub mod types;

pub use engine::Reconciler;
pub use types::{AbsentItemRecord, AbsentKind, RECENT_SINGLE_LABEL, SINGLE_LABEL};
