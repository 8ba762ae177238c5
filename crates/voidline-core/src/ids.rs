//! Entity identifiers.
//!
//! Two id types exist on purpose. A [`DurableId`] is derived from seeded
//! generation state (or authored by hand) and is stable across regenerations,
//! so it may be stored in a diff. An [`EphemeralId`] comes from a counter that
//! depends on spawn order and must never be persisted or used for destroyed-id
//! bookkeeping.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::seed::Seed;

/// Stable id of a diffable entity.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DurableId(String);

impl DurableId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Id of the `index`-th procedural slot of `kind` generated from `seed`.
    /// Depends only on the slot, never on draw values.
    pub fn slot(kind: &str, seed: Seed, index: usize) -> Self {
        Self(format!("{kind}-{seed:08x}-{index}"))
    }

    /// Id taken directly from a generator stream draw in `[0, 1)`, base-36
    /// encoded. Used by asteroid fields, where the draw position in the stream
    /// is what makes the id reproducible.
    pub fn from_draw(prefix: &str, draw: f64) -> Self {
        let value = (draw * ID_DRAW_SPACE) as u64;
        Self(format!("{prefix}{}", to_base36(value)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DurableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DurableId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// 36^8: eight base-36 digits of id space per draw.
const ID_DRAW_SPACE: f64 = 2_821_109_907_456.0;

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::with_capacity(13);
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

/// Session-local id for decorative entities. Not serializable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EphemeralId(u64);

impl EphemeralId {
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Counter handing out [`EphemeralId`]s. Owned by one live sector, never global.
#[derive(Debug, Default)]
pub struct EphemeralIdAllocator {
    next: u64,
}

impl EphemeralIdAllocator {
    pub fn allocate(&mut self) -> EphemeralId {
        let id = EphemeralId(self.next);
        self.next += 1;
        id
    }
}

/// Identifier of a sector; also the key of its persisted diff.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectorId(pub String);

impl SectorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SectorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
