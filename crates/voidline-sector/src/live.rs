//! The currently loaded sector.
//!
//! Bodies live in a `hecs::World`, one component per body kind plus an
//! [`EphemeralId`] that doubles as spawn order. Durable ids are indexed for
//! lookup. The asteroid field is not in the world; its manager owns the rocks.

use std::collections::HashMap;

use glam::DVec3;
use hecs::{Component, Entity, World};

use voidline_core::entities::{Body, Derelict, Moon, Npc, Planet, Station};
use voidline_core::ids::{DurableId, EphemeralId, EphemeralIdAllocator, SectorId};
use voidline_core::seed::Seed;
use voidline_core::types::Position;
use voidline_procgen::{Asteroid, AsteroidFieldManager, DamageOutcome};

use crate::context::LoadDiagnostic;
use crate::diff::SectorDiff;
use crate::error::PersistError;
use crate::registry::EntitySerializationRegistry;
use crate::systems::{self, Divergent};

pub struct LiveSector {
    id: SectorId,
    seed: Seed,
    world: World,
    index: HashMap<DurableId, Entity>,
    ids: EphemeralIdAllocator,
    field: Option<AsteroidFieldManager>,
    diagnostics: Vec<LoadDiagnostic>,
    /// Reused every tick by the movement system.
    moved_buffer: Vec<Entity>,
    /// Reused every tick by the orbit system.
    host_buffer: HashMap<String, Position>,
    elapsed: f64,
}

impl std::fmt::Debug for LiveSector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveSector")
            .field("id", &self.id)
            .field("seed", &self.seed)
            .field("entities", &self.world.len())
            .field("asteroids", &self.asteroids().len())
            .field("elapsed", &self.elapsed)
            .finish_non_exhaustive()
    }
}

impl LiveSector {
    pub fn new(id: SectorId, seed: Seed) -> Self {
        Self {
            id,
            seed,
            world: World::new(),
            index: HashMap::new(),
            ids: EphemeralIdAllocator::default(),
            field: None,
            diagnostics: Vec::new(),
            moved_buffer: Vec::new(),
            host_buffer: HashMap::new(),
            elapsed: 0.0,
        }
    }

    pub fn id(&self) -> &SectorId {
        &self.id
    }

    pub fn seed(&self) -> Seed {
        self.seed
    }

    /// Seconds simulated since the sector was entered.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Put a body into the world. A body whose durable id is already present
    /// replaces the existing one. Asteroid field descriptors are not bodies
    /// of the world and are ignored here.
    pub fn spawn(&mut self, body: Body, divergent: bool) -> Option<EphemeralId> {
        if let Some(id) = body.id() {
            if let Some(previous) = self.index.remove(id) {
                tracing::warn!(%id, sector = %self.id, "replacing body with duplicate id");
                let _ = self.world.despawn(previous);
            }
        }

        let order = self.ids.allocate();
        let durable = body.id().cloned();
        let entity = match body {
            Body::Planet(planet) => self.world.spawn((planet, order)),
            Body::Station(station) => self.world.spawn((station, order)),
            Body::Moon(moon) => self.world.spawn((moon, order)),
            Body::Npc(npc) => self.world.spawn((npc, order)),
            Body::Derelict(derelict) => self.world.spawn((derelict, order)),
            Body::AsteroidField(_) => {
                tracing::debug!(sector = %self.id, "asteroid field descriptor is not spawned");
                return None;
            }
        };
        if divergent {
            let _ = self.world.insert_one(entity, Divergent);
        }
        if let Some(id) = durable {
            self.index.insert(id, entity);
        }
        Some(order)
    }

    pub(crate) fn set_field(&mut self, field: AsteroidFieldManager) {
        self.field = Some(field);
    }

    pub(crate) fn set_diagnostics(&mut self, diagnostics: Vec<LoadDiagnostic>) {
        self.diagnostics = diagnostics;
    }

    /// Advance the sector by `dt` seconds.
    pub fn update(&mut self, dt: f64) {
        systems::orbit::run(&mut self.world, dt, &mut self.host_buffer);
        systems::movement::run(&mut self.world, dt, &mut self.moved_buffer);
        for entity in self.moved_buffer.drain(..) {
            let _ = self.world.insert_one(entity, Divergent);
        }
        self.elapsed += dt;
    }

    // --- Asteroids ---

    pub fn field(&self) -> Option<&AsteroidFieldManager> {
        self.field.as_ref()
    }

    pub fn asteroids(&self) -> &[Asteroid] {
        self.field.as_ref().map(|field| field.live()).unwrap_or(&[])
    }

    /// Returns `true` if the rock was live and is now destroyed.
    pub fn destroy_asteroid(&mut self, id: &DurableId) -> bool {
        self.field
            .as_mut()
            .is_some_and(|field| field.mark_destroyed(id))
    }

    pub fn damage_asteroid(&mut self, id: &DurableId, amount: f64) -> DamageOutcome {
        match self.field.as_mut() {
            Some(field) => field.apply_damage(id, amount),
            None => DamageOutcome::Missed,
        }
    }

    // --- Bodies ---

    /// Add an NPC. NPCs are never generated, so they always persist.
    pub fn spawn_npc(&mut self, npc: Npc) -> Option<EphemeralId> {
        self.spawn(Body::Npc(npc), true)
    }

    /// Teleport an NPC. Returns `false` if no NPC has this id.
    pub fn move_npc(&mut self, id: &DurableId, position: Position) -> bool {
        self.with_npc(id, |npc| npc.position = position)
    }

    /// Set an NPC's velocity; the movement system does the rest.
    pub fn set_npc_course(&mut self, id: &DurableId, velocity: DVec3) -> bool {
        self.with_npc(id, |npc| npc.velocity = velocity)
    }

    fn with_npc(&mut self, id: &DurableId, f: impl FnOnce(&mut Npc)) -> bool {
        let Some(&entity) = self.index.get(id) else {
            return false;
        };
        let Ok(mut npc) = self.world.get::<&mut Npc>(entity) else {
            return false;
        };
        f(&mut *npc);
        drop(npc);
        let _ = self.world.insert_one(entity, Divergent);
        true
    }

    /// Flag a body for persistence. Returns `false` for unknown ids.
    pub fn mark_divergent(&mut self, id: &DurableId) -> bool {
        match self.index.get(id) {
            Some(&entity) => self.world.insert_one(entity, Divergent).is_ok(),
            None => false,
        }
    }

    pub fn is_divergent(&self, id: &DurableId) -> bool {
        self.index
            .get(id)
            .and_then(|&entity| self.world.entity(entity).ok())
            .is_some_and(|entity| entity.has::<Divergent>())
    }

    /// Current state of the body with this id.
    pub fn find(&self, id: &DurableId) -> Option<Body> {
        let entity = self.world.entity(*self.index.get(id)?).ok()?;
        if let Some(planet) = entity.get::<&Planet>() {
            return Some(Body::Planet(Planet::clone(&planet)));
        }
        if let Some(station) = entity.get::<&Station>() {
            return Some(Body::Station(Station::clone(&station)));
        }
        if let Some(moon) = entity.get::<&Moon>() {
            return Some(Body::Moon(Moon::clone(&moon)));
        }
        entity.get::<&Npc>().map(|npc| Body::Npc(Npc::clone(&npc)))
    }

    /// Every body in spawn order.
    pub fn bodies(&self) -> Vec<Body> {
        self.collect_bodies(false)
    }

    /// Bodies flagged [`Divergent`], in spawn order.
    pub fn divergent_bodies(&self) -> Vec<Body> {
        self.collect_bodies(true)
    }

    fn collect_bodies(&self, only_divergent: bool) -> Vec<Body> {
        let mut out = Vec::with_capacity(self.world.len() as usize);
        collect(&self.world, only_divergent, Body::Planet, &mut out);
        collect(&self.world, only_divergent, Body::Station, &mut out);
        collect(&self.world, only_divergent, Body::Moon, &mut out);
        collect(&self.world, only_divergent, Body::Derelict, &mut out);
        collect(&self.world, only_divergent, Body::Npc, &mut out);
        out.sort_by_key(|(order, _)| *order);
        out.into_iter().map(|(_, body)| body).collect()
    }

    pub fn planets(&self) -> Vec<Planet> {
        components(&self.world)
    }

    pub fn stations(&self) -> Vec<Station> {
        components(&self.world)
    }

    pub fn moons(&self) -> Vec<Moon> {
        components(&self.world)
    }

    pub fn derelicts(&self) -> Vec<Derelict> {
        components(&self.world)
    }

    pub fn npcs(&self) -> Vec<Npc> {
        components(&self.world)
    }

    /// Planet a station or moon orbits.
    pub fn host_of(&self, id: &DurableId) -> Option<Planet> {
        let host = match self.find(id)? {
            Body::Station(station) => station.host,
            Body::Moon(moon) => moon.host,
            _ => return None,
        };
        self.world
            .query::<&Planet>()
            .iter()
            .find(|(_, planet)| planet.name == host)
            .map(|(_, planet)| planet.clone())
    }

    /// World position of a moon, on its orbit around the host.
    pub fn moon_position(&self, moon: &Moon) -> Option<Position> {
        self.world
            .query::<&Planet>()
            .iter()
            .find(|(_, planet)| planet.name == moon.host)
            .map(|(_, host)| host.position.orbit_point(moon.orbit_radius, moon.angle))
    }

    /// Diagnostics collected while this sector was loaded.
    pub fn diagnostics(&self) -> &[LoadDiagnostic] {
        &self.diagnostics
    }

    /// Everything that must be written to storage for this sector.
    pub fn to_diff(&self, registry: &EntitySerializationRegistry) -> Result<SectorDiff, PersistError> {
        let bodies = self.divergent_bodies();
        let entities = registry.save_all(&bodies)?;
        Ok(SectorDiff::new(
            self.id.clone(),
            self.field.as_ref().map(AsteroidFieldManager::snapshot),
            entities,
        ))
    }
}

fn collect<T: Component + Clone>(
    world: &World,
    only_divergent: bool,
    wrap: fn(T) -> Body,
    out: &mut Vec<(EphemeralId, Body)>,
) {
    for (_entity, (component, order, divergent)) in world
        .query::<(&T, &EphemeralId, Option<&Divergent>)>()
        .iter()
    {
        if only_divergent && divergent.is_none() {
            continue;
        }
        out.push((*order, wrap(component.clone())));
    }
}

fn components<T: Component + Clone>(world: &World) -> Vec<T> {
    let mut items: Vec<(EphemeralId, T)> = world
        .query::<(&T, &EphemeralId)>()
        .iter()
        .map(|(_entity, (component, order))| (*order, component.clone()))
        .collect();
    items.sort_by_key(|(order, _)| *order);
    items.into_iter().map(|(_, component)| component).collect()
}
