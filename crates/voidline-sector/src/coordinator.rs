//! Sector entry, exit and the build pipeline in between.
//!
//! Loading a sector runs in a fixed order:
//!
//! 1. read the prior diff and check its version
//! 2. load its entity records through one resolution context
//! 3. generate the baseline from the seed
//! 4. register baseline planets the diff did not override, close the context
//! 5. overlay restored entities onto the baseline by durable id
//! 6. configure the asteroid field with the restored destroyed ids
//!
//! The sector is built completely before it replaces the active one, so a
//! failed load never leaves a half-built sector behind.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use voidline_core::entities::{AsteroidFieldSpec, Body};
use voidline_core::ids::{DurableId, SectorId};
use voidline_core::rules::GenerationRules;
use voidline_core::seed::Seed;
use voidline_procgen::{
    AsteroidFieldManager, FieldSnapshot, FieldTuning, HybridParams, WorldGenerator,
};

use crate::context::ResolutionContext;
use crate::diff::SectorDiff;
use crate::error::PersistError;
use crate::live::LiveSector;
use crate::registry::EntitySerializationRegistry;
use crate::storage::DiffStorage;

/// How much of a sector comes from the generator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Procedural {
    /// Hand-authored only.
    None,
    #[default]
    Full,
    /// Authored bodies plus an exact number of generated planets.
    Hybrid(HybridParams),
}

/// Static description of a sector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorDefinition {
    pub id: SectorId,
    pub seed: Seed,
    #[serde(default)]
    pub fixed: Vec<Body>,
    #[serde(default)]
    pub procedural: Procedural,
    /// Overrides both an authored and a generated field.
    #[serde(default)]
    pub asteroid_field: Option<AsteroidFieldSpec>,
}

impl SectorDefinition {
    pub fn procedural(id: impl Into<String>, seed: Seed) -> Self {
        Self {
            id: SectorId::new(id),
            seed,
            fixed: Vec::new(),
            procedural: Procedural::Full,
            asteroid_field: None,
        }
    }

    pub fn authored(id: impl Into<String>, fixed: Vec<Body>) -> Self {
        Self {
            id: SectorId::new(id),
            seed: 0,
            fixed,
            procedural: Procedural::None,
            asteroid_field: None,
        }
    }

    pub fn hybrid(id: impl Into<String>, seed: Seed, fixed: Vec<Body>, params: HybridParams) -> Self {
        Self {
            id: SectorId::new(id),
            seed,
            fixed,
            procedural: Procedural::Hybrid(params),
            asteroid_field: None,
        }
    }

    pub fn with_asteroid_field(mut self, spec: AsteroidFieldSpec) -> Self {
        self.asteroid_field = Some(spec);
        self
    }
}

#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    pub rules: GenerationRules,
    /// Write the active sector's diff before it is replaced or left.
    pub save_on_leave: bool,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            rules: GenerationRules::default(),
            save_on_leave: true,
        }
    }
}

/// Owns the active sector and moves it in and out of storage.
pub struct SectorCoordinator<S: DiffStorage> {
    config: CoordinatorConfig,
    generator: WorldGenerator,
    registry: EntitySerializationRegistry,
    storage: S,
    active: Option<LiveSector>,
}

impl<S: DiffStorage> SectorCoordinator<S> {
    /// Fails if the generation rules do not validate.
    pub fn new(config: CoordinatorConfig, storage: S) -> Result<Self, PersistError> {
        let generator = WorldGenerator::new(config.rules.clone())?;
        Ok(Self {
            config,
            generator,
            registry: EntitySerializationRegistry::with_default_codecs(),
            storage,
            active: None,
        })
    }

    pub fn registry(&self) -> &EntitySerializationRegistry {
        &self.registry
    }

    /// For registering extra entity codecs.
    pub fn registry_mut(&mut self) -> &mut EntitySerializationRegistry {
        &mut self.registry
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    pub fn generator(&self) -> &WorldGenerator {
        &self.generator
    }

    pub fn active(&self) -> Option<&LiveSector> {
        self.active.as_ref()
    }

    pub fn active_mut(&mut self) -> Option<&mut LiveSector> {
        self.active.as_mut()
    }

    /// Make `def` the active sector. The current sector is saved first; if the
    /// new one fails to load, the current one stays active.
    pub fn enter(&mut self, def: &SectorDefinition) -> Result<&mut LiveSector, PersistError> {
        if self.config.save_on_leave {
            self.save_active()?;
        }

        let sector = self.build(def)?;
        if let Some(previous) = self.active.take() {
            tracing::info!(sector = %previous.id(), "left sector");
        }
        tracing::info!(
            sector = %sector.id(),
            seed = sector.seed(),
            asteroids = sector.asteroids().len(),
            diagnostics = sector.diagnostics().len(),
            "entered sector"
        );
        Ok(self.active.insert(sector))
    }

    /// Write the active sector's diff. Returns it, or `None` with no sector.
    pub fn save_active(&mut self) -> Result<Option<SectorDiff>, PersistError> {
        let Some(sector) = self.active.as_ref() else {
            return Ok(None);
        };
        let diff = sector.to_diff(&self.registry)?;
        self.storage.write_diff(&diff)?;
        tracing::debug!(
            sector = %diff.sector_id,
            entities = diff.entities.len(),
            destroyed = diff.asteroid_field.as_ref().map_or(0, |f| f.destroyed_ids.len()),
            "saved sector diff"
        );
        Ok(Some(diff))
    }

    /// Save (if configured) and drop the active sector. Returns its id.
    pub fn leave(&mut self) -> Result<Option<SectorId>, PersistError> {
        if self.config.save_on_leave {
            self.save_active()?;
        }
        Ok(self.active.take().map(|sector| {
            tracing::info!(sector = %sector.id(), "left sector");
            sector.id().clone()
        }))
    }

    /// Advance the active sector, if any.
    pub fn update(&mut self, dt: f64) {
        if let Some(sector) = self.active.as_mut() {
            sector.update(dt);
        }
    }

    fn build(&self, def: &SectorDefinition) -> Result<LiveSector, PersistError> {
        let (records, saved_field) = match self.storage.read_diff(&def.id)? {
            Some(diff) => {
                diff.check_version()?;
                (diff.entities, diff.asteroid_field)
            }
            None => (Vec::new(), None),
        };

        let mut context = ResolutionContext::new();
        let restored = self.registry.load_all_into(&records, &mut context)?;

        let (baseline, field_spec) = self.baseline(def);

        let restored_ids: HashSet<&DurableId> = restored.iter().filter_map(Body::id).collect();
        for planet in baseline.iter().filter_map(Body::as_planet) {
            let shadowed = context.planet(&planet.name).is_some() && !context.is_provisional(&planet.name);
            if restored_ids.contains(&planet.id) || shadowed {
                continue;
            }
            context.register_planet(planet.clone());
        }
        context.finish();

        let mut sector = LiveSector::new(def.id.clone(), def.seed);
        sector.set_diagnostics(context.take_diagnostics());
        overlay(&mut sector, baseline, restored);

        if let Some(spec) = field_spec {
            sector.set_field(self.field_manager(&spec, saved_field));
        } else if saved_field.is_some() {
            tracing::warn!(sector = %def.id, "sector has no asteroid field, dropping saved field state");
        }

        Ok(sector)
    }

    /// Authored plus generated bodies, and the asteroid field descriptor to use.
    fn baseline(&self, def: &SectorDefinition) -> (Vec<Body>, Option<AsteroidFieldSpec>) {
        let mut field_spec = def.asteroid_field;
        let mut bodies = Vec::with_capacity(def.fixed.len());
        for body in &def.fixed {
            match body {
                Body::AsteroidField(spec) => {
                    field_spec.get_or_insert(*spec);
                }
                other => bodies.push(other.clone()),
            }
        }

        let generated = match def.procedural {
            Procedural::None => None,
            Procedural::Full => Some(self.generator.generate(def.seed, None)),
            Procedural::Hybrid(params) => Some(self.generator.generate(def.seed, Some(params))),
        };
        if let Some(generated) = generated {
            for body in generated.bodies() {
                match body {
                    Body::AsteroidField(spec) => {
                        field_spec.get_or_insert(spec);
                    }
                    other => bodies.push(other),
                }
            }
        }
        (bodies, field_spec)
    }

    fn field_manager(&self, spec: &AsteroidFieldSpec, saved: Option<FieldSnapshot>) -> AsteroidFieldManager {
        let mut snapshot = FieldSnapshot::pristine(spec);
        if let Some(saved) = saved {
            if saved.seed == spec.seed && saved.center == spec.center && saved.extent == spec.extent {
                snapshot.destroyed_ids = saved.destroyed_ids;
            } else {
                tracing::warn!(
                    saved_seed = saved.seed,
                    seed = spec.seed,
                    "saved asteroid field does not match its definition, discarding destroyed ids"
                );
            }
        }

        let tuning = FieldTuning {
            candidate_count: spec.count,
            ..FieldTuning::from(&self.generator.rules().asteroids)
        };
        let mut manager = AsteroidFieldManager::new(tuning);
        manager.configure(snapshot);
        manager
    }
}

/// Spawn the baseline with restored entities substituted by id, then any
/// restored entities the baseline does not contain. Restored entities are
/// divergent by definition.
fn overlay(sector: &mut LiveSector, baseline: Vec<Body>, restored: Vec<Body>) {
    let ids: Vec<Option<DurableId>> = restored.iter().map(|b| b.id().cloned()).collect();
    let mut restored: Vec<Option<Body>> = restored.into_iter().map(Some).collect();
    let mut by_id: HashMap<DurableId, usize> = HashMap::new();
    for (index, id) in ids.into_iter().enumerate() {
        let Some(id) = id else { continue };
        if let Some(earlier) = by_id.insert(id.clone(), index) {
            tracing::warn!(%id, "diff holds the same id twice, keeping the later record");
            restored[earlier] = None;
        }
    }

    for body in baseline {
        let replacement = body
            .id()
            .and_then(|id| by_id.remove(id))
            .and_then(|index| restored[index].take());
        match replacement {
            Some(restored_body) => sector.spawn(restored_body, true),
            None => sector.spawn(body, false),
        };
    }

    for body in restored.into_iter().flatten() {
        sector.spawn(body, true);
    }
}
