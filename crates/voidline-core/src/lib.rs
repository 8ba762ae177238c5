//! Core vocabulary for the Voidline sector engine.
//!
//! Positions, ids, seed derivation, generation rules and the entity
//! descriptors shared by the generator and the persistence layer.
//! No dependency on any runtime framework.

pub mod constants;
pub mod entities;
pub mod error;
pub mod ids;
pub mod rules;
pub mod seed;
pub mod types;

pub use error::ConfigError;
pub use seed::{Mulberry32, Seed};

#[cfg(test)]
mod tests;
