//! Per-frame systems over the live sector world.
//!
//! Systems are free functions over `&mut World`. They hold no state of their
//! own; everything they touch lives in components.

pub mod movement;
pub mod orbit;

/// Marker for bodies whose state no longer matches what generation produces.
/// Only marked bodies are written to the sector diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Divergent;
