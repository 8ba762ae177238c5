//! Hierarchical seed derivation and the seeded generator stream.
//!
//! Both functions here define the save format: a sector is stored as its root
//! seed plus a diff, and every procedural entity is re-derived on load. Any
//! change to the hash or the generator silently rewrites every existing world.

use std::fmt::{self, Display, Write};

use rand::{Error as RandError, RngCore, SeedableRng};

/// Root and derived seeds are 32-bit.
pub type Seed = u32;

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;
const MULBERRY_INCREMENT: u32 = 0x6D2B_79F5;
const TWO_POW_32: f64 = 4_294_967_296.0;

/// FNV-1a accumulator fed through `fmt::Write`, so parts are hashed from their
/// `Display` form without building the concatenated string.
struct Fnv1a(u32);

impl Write for Fnv1a {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for byte in s.bytes() {
            self.0 ^= byte as u32;
            self.0 = self.0.wrapping_mul(FNV_PRIME);
        }
        Ok(())
    }
}

/// Hash the concatenated display form of `parts` (no separator).
pub fn hash_parts(parts: &[&dyn Display]) -> Seed {
    let mut hasher = Fnv1a(FNV_OFFSET_BASIS);
    for part in parts {
        // Fnv1a::write_str is infallible.
        let _ = write!(hasher, "{part}");
    }
    hasher.0
}

/// Derive a sub-seed from a root seed and a label path:
/// `hash_seed!(root, "planet", i)`.
#[macro_export]
macro_rules! hash_seed {
    ($($part:expr),+ $(,)?) => {
        $crate::seed::hash_parts(&[$(&$part as &dyn ::std::fmt::Display),+])
    };
}

/// Generator for one namespaced decision: `sub_rng!(root, "station", s)`.
#[macro_export]
macro_rules! sub_rng {
    ($($part:expr),+ $(,)?) => {
        $crate::seed::Mulberry32::new($crate::hash_seed!($($part),+))
    };
}

/// Mulberry32 stream. Two generators built from the same seed produce the
/// same sequence forever.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mulberry32 {
    state: u32,
}

/// Shorthand for [`Mulberry32::new`].
pub fn make_rng(seed: Seed) -> Mulberry32 {
    Mulberry32::new(seed)
}

impl Mulberry32 {
    pub fn new(seed: Seed) -> Self {
        Self { state: seed }
    }

    /// Next raw 32-bit output.
    pub fn next_raw(&mut self) -> u32 {
        self.state = self.state.wrapping_add(MULBERRY_INCREMENT);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }

    /// Next draw in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.next_raw() as f64 / TWO_POW_32
    }

    /// Uniform draw in `[min, max)`.
    pub fn range(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_f64() * (max - min)
    }

    /// Uniform integer in `[min, max]` (inclusive). Consumes one draw even
    /// when the range is a single value.
    pub fn range_inclusive(&mut self, min: u32, max: u32) -> u32 {
        let draw = self.next_f64();
        if max <= min {
            return min;
        }
        let span = (max - min) as f64 + 1.0;
        min + ((draw * span) as u32).min(max - min)
    }

    /// `true` with probability `p`.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Index into a collection of `len` items. Consumes one draw; returns
    /// `None` for an empty collection.
    pub fn index(&mut self, len: usize) -> Option<usize> {
        let draw = self.next_f64();
        if len == 0 {
            return None;
        }
        Some(((draw * len as f64) as usize).min(len - 1))
    }

    /// Uniform pick from a slice.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        self.index(items.len()).map(|i| &items[i])
    }

    /// Angle in `[0, TAU)`.
    pub fn angle(&mut self) -> f64 {
        self.next_f64() * std::f64::consts::TAU
    }
}

impl RngCore for Mulberry32 {
    fn next_u32(&mut self) -> u32 {
        self.next_raw()
    }

    fn next_u64(&mut self) -> u64 {
        let lo = self.next_raw() as u64;
        let hi = self.next_raw() as u64;
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_raw().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), RandError> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for Mulberry32 {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u32::from_le_bytes(seed))
    }
}
