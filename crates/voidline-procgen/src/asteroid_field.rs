//! Live state of one asteroid field.
//!
//! The field is never stored rock by rock. It is regenerated from its seed,
//! center and extent, and rocks whose ids are in the destroyed set are left
//! out. Ids come from the generator stream position, so the same rock gets the
//! same id on every regeneration as long as every candidate's draws are
//! consumed, including the draws of candidates that are skipped.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use voidline_core::constants::ASTEROID_ID_PREFIX;
use voidline_core::entities::AsteroidFieldSpec;
use voidline_core::ids::DurableId;
use voidline_core::rules::{AsteroidRules, Envelope};
use voidline_core::seed::{Mulberry32, Seed};
use voidline_core::types::Position;

/// One materialized rock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asteroid {
    pub id: DurableId,
    pub position: Position,
    pub radius: f64,
    /// Tumble rate in radians per second.
    pub spin: f64,
    /// Hit points. Session state only: regeneration restores full health.
    pub health: f64,
}

/// Everything needed to rebuild a field's live set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSnapshot {
    pub seed: Seed,
    /// Sorted, without duplicates.
    pub destroyed_ids: Vec<DurableId>,
    pub center: Position,
    pub extent: f64,
}

impl FieldSnapshot {
    /// Snapshot of a freshly generated field with nothing destroyed yet.
    pub fn pristine(spec: &AsteroidFieldSpec) -> Self {
        Self {
            seed: spec.seed,
            destroyed_ids: Vec::new(),
            center: spec.center,
            extent: spec.extent,
        }
    }
}

/// Per-field tuning that is not part of the persisted state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldTuning {
    pub candidate_count: usize,
    pub radius: Envelope,
    pub max_spin: f64,
    pub health_per_radius: f64,
}

impl From<&AsteroidRules> for FieldTuning {
    fn from(rules: &AsteroidRules) -> Self {
        Self {
            candidate_count: rules.candidate_count,
            radius: rules.radius,
            max_spin: rules.max_spin,
            health_per_radius: rules.health_per_radius,
        }
    }
}

/// Result of [`AsteroidFieldManager::apply_damage`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DamageOutcome {
    /// No live asteroid has this id.
    Missed,
    Damaged { remaining: f64 },
    Destroyed,
}

#[derive(Debug, Clone)]
pub struct AsteroidFieldManager {
    tuning: FieldTuning,
    seed: Seed,
    destroyed_ids: BTreeSet<DurableId>,
    center: Position,
    extent: f64,
    live: Vec<Asteroid>,
}

impl AsteroidFieldManager {
    /// Empty manager; call [`configure`](Self::configure) to populate it.
    pub fn new(tuning: FieldTuning) -> Self {
        Self {
            tuning,
            seed: 0,
            destroyed_ids: BTreeSet::new(),
            center: Position::ORIGIN,
            extent: 0.0,
            live: Vec::new(),
        }
    }

    /// Replace all state, drop live rocks and regenerate.
    pub fn configure(&mut self, snapshot: FieldSnapshot) {
        self.seed = snapshot.seed;
        self.destroyed_ids = snapshot.destroyed_ids.into_iter().collect();
        self.center = snapshot.center;
        self.extent = snapshot.extent;
        self.live.clear();
        self.regenerate();
    }

    /// Rebuild the live set from the seed, skipping destroyed ids.
    pub fn regenerate(&mut self) {
        self.live = self
            .candidates()
            .into_iter()
            .filter(|a| !self.destroyed_ids.contains(&a.id))
            .collect();
        tracing::debug!(
            seed = self.seed,
            live = self.live.len(),
            destroyed = self.destroyed_ids.len(),
            "regenerated asteroid field"
        );
    }

    /// Every candidate the seed produces, destroyed or not, in stream order.
    /// Draw order per candidate: x, y, z, radius, spin, id.
    pub fn candidates(&self) -> Vec<Asteroid> {
        let tuning = &self.tuning;
        let half = self.extent / 2.0;
        let mut rng = Mulberry32::new(self.seed);

        (0..tuning.candidate_count)
            .map(|_| {
                let position = Position::new(
                    self.center.x + rng.range(-half, half),
                    self.center.y + rng.range(-half, half),
                    self.center.z + rng.range(-half, half),
                );
                let radius = tuning.radius.sample(&mut rng);
                let spin = rng.range(-tuning.max_spin, tuning.max_spin);
                let id = DurableId::from_draw(ASTEROID_ID_PREFIX, rng.next_f64());
                Asteroid {
                    id,
                    position,
                    radius,
                    spin,
                    health: radius * tuning.health_per_radius,
                }
            })
            .collect()
    }

    /// Record a rock as destroyed and drop it from the live set. Idempotent.
    /// Returns `true` only the first time. Ids this field never produced are
    /// ignored so the destroyed set only ever holds its own ids.
    pub fn mark_destroyed(&mut self, id: &DurableId) -> bool {
        if self.destroyed_ids.contains(id) {
            return false;
        }
        let Some(index) = self.live.iter().position(|a| &a.id == id) else {
            tracing::warn!(%id, seed = self.seed, "ignoring destroy for id not in this field");
            return false;
        };
        self.live.remove(index);
        self.destroyed_ids.insert(id.clone());
        true
    }

    /// Apply damage; a rock whose health reaches zero is marked destroyed.
    pub fn apply_damage(&mut self, id: &DurableId, amount: f64) -> DamageOutcome {
        let Some(asteroid) = self.live.iter_mut().find(|a| &a.id == id) else {
            return DamageOutcome::Missed;
        };
        asteroid.health -= amount;
        if asteroid.health > 0.0 {
            return DamageOutcome::Damaged {
                remaining: asteroid.health,
            };
        }
        self.mark_destroyed(id);
        DamageOutcome::Destroyed
    }

    /// The complete persisted state of this field.
    pub fn snapshot(&self) -> FieldSnapshot {
        FieldSnapshot {
            seed: self.seed,
            destroyed_ids: self.destroyed_ids.iter().cloned().collect(),
            center: self.center,
            extent: self.extent,
        }
    }

    pub fn live(&self) -> &[Asteroid] {
        &self.live
    }

    pub fn get(&self, id: &DurableId) -> Option<&Asteroid> {
        self.live.iter().find(|a| &a.id == id)
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    pub fn is_destroyed(&self, id: &DurableId) -> bool {
        self.destroyed_ids.contains(id)
    }

    pub fn destroyed_count(&self) -> usize {
        self.destroyed_ids.len()
    }

    pub fn seed(&self) -> Seed {
        self.seed
    }

    pub fn center(&self) -> Position {
        self.center
    }

    pub fn extent(&self) -> f64 {
        self.extent
    }
}
