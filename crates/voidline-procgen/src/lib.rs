//! Procedural generation for Voidline sectors.
//!
//! `WorldGenerator` turns a root seed into planets, stations, derelict
//! debris and an asteroid field descriptor. `AsteroidFieldManager` owns the
//! live rocks of one field and the destroyed-id set that filters them.

pub mod asteroid_field;
pub mod world_gen;

pub use asteroid_field::{Asteroid, AsteroidFieldManager, DamageOutcome, FieldSnapshot, FieldTuning};
pub use voidline_core as core;
pub use world_gen::{GeneratedSector, HybridParams, WorldGenerator};

#[cfg(test)]
mod tests;
