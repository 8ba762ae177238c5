//! Sector generation from a root seed.
//!
//! Every decision draws from its own namespaced generator (`sub_rng!`), so
//! changing how one decision consumes draws never moves another. Within a
//! planet's generator the draw order is fixed: ring roll before moon roll.

use serde::{Deserialize, Serialize};

use voidline_core::entities::*;
use voidline_core::ids::DurableId;
use voidline_core::rules::GenerationRules;
use voidline_core::seed::Seed;
use voidline_core::types::{Color, Position};
use voidline_core::{hash_seed, sub_rng, ConfigError};

/// Extra procedural content layered onto a hand-authored sector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HybridParams {
    /// Exact number of procedural planets to add.
    pub extra_planets: u32,
    /// Added (wrapping) to the root seed for every procedural decision.
    pub seed_offset: u32,
}

/// Full output of one generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedSector {
    /// Seed every decision below was derived from (root seed plus any hybrid offset).
    pub seed: Seed,
    pub planets: Vec<Planet>,
    pub stations: Vec<Station>,
    pub derelicts: Vec<Derelict>,
    pub asteroid_field: AsteroidFieldSpec,
}

impl GeneratedSector {
    /// All descriptors in a stable order: planets, stations, derelicts, field.
    pub fn bodies(&self) -> Vec<Body> {
        let mut bodies = Vec::with_capacity(self.planets.len() + self.stations.len() + 4);
        bodies.extend(self.planets.iter().cloned().map(Body::Planet));
        bodies.extend(self.stations.iter().cloned().map(Body::Station));
        bodies.extend(self.derelicts.iter().cloned().map(Body::Derelict));
        bodies.push(Body::AsteroidField(self.asteroid_field));
        bodies
    }
}

/// Turns sector seeds into world descriptors.
#[derive(Debug, Clone)]
pub struct WorldGenerator {
    rules: GenerationRules,
}

impl WorldGenerator {
    /// Validates the rules up front; a generator never runs on bad tables.
    pub fn new(rules: GenerationRules) -> Result<Self, ConfigError> {
        rules.validate()?;
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &GenerationRules {
        &self.rules
    }

    /// Generate a sector. Same inputs, same output, field for field.
    pub fn generate(&self, seed: Seed, hybrid: Option<HybridParams>) -> GeneratedSector {
        let (seed, planet_count) = match hybrid {
            Some(params) => (seed.wrapping_add(params.seed_offset), params.extra_planets),
            None => (seed, self.planet_count(seed)),
        };

        let planets = self.generate_planets(seed, planet_count);
        let stations = self.generate_stations(seed, &planets);
        let derelicts = self.generate_derelicts(seed);
        let asteroid_field = self.generate_asteroid_field(seed);

        tracing::debug!(
            seed,
            planets = planets.len(),
            stations = stations.len(),
            derelicts = derelicts.len(),
            "generated sector"
        );

        GeneratedSector {
            seed,
            planets,
            stations,
            derelicts,
            asteroid_field,
        }
    }

    /// Planet count drawn from the `planetCount` namespace.
    pub fn planet_count(&self, seed: Seed) -> u32 {
        self.rules
            .planet_count
            .sample(&mut sub_rng!(seed, "planetCount"))
    }

    pub fn generate_planets(&self, seed: Seed, count: u32) -> Vec<Planet> {
        (0..count as usize)
            .filter_map(|i| self.generate_planet(seed, i))
            .collect()
    }

    fn generate_planet(&self, seed: Seed, index: usize) -> Option<Planet> {
        let rules = &self.rules;
        let mut rng = sub_rng!(seed, "planet", index);

        let archetype = rng.pick(&rules.archetypes)?;
        let radius = archetype.radius.sample(&mut rng);

        let orbits = &rules.orbits;
        let distance = orbits.first_orbit
            + index as f64 * orbits.spacing
            + rng.range(-orbits.jitter, orbits.jitter);
        let angle = rng.angle();
        let height = rng.range(-orbits.vertical_offset, orbits.vertical_offset);
        let position = Position::new(distance * angle.cos(), height, distance * angle.sin());

        let color = Color(rng.pick(&archetype.palette).copied().unwrap_or_default());
        let rotation_speed = orbits.rotation_speed.sample(&mut rng);
        let dockable = rng.chance(archetype.dockable_probability);
        let greeting = rng.pick(&archetype.greetings).cloned().unwrap_or_default();

        let designation = rules
            .designations
            .get(index)
            .cloned()
            .unwrap_or_else(|| (index + 1).to_string());
        let name = format!("{} {}", archetype.name, designation);

        let ring = if rng.chance(rules.rings.probability) {
            let inner = radius * rules.rings.inner_ratio.sample(&mut rng);
            let width = radius * rules.rings.width_ratio.sample(&mut rng);
            let tilt = rng.range(-rules.rings.max_tilt, rules.rings.max_tilt);
            let ring_color = rng.pick(&archetype.palette).copied().unwrap_or_default();
            Some(Ring {
                inner_radius: inner,
                outer_radius: inner + width,
                color: Color(ring_color),
                tilt,
            })
        } else {
            None
        };

        let moon = if rng.chance(rules.moons.probability) {
            let moons = &rules.moons;
            Some(Moon {
                id: DurableId::slot("moon", seed, index),
                name: format!("{name} I"),
                host: name.clone(),
                radius: radius * moons.radius_ratio.sample(&mut rng),
                orbit_radius: radius * moons.orbit_ratio.sample(&mut rng),
                orbit_speed: moons.orbit_speed.sample(&mut rng),
                angle: rng.angle(),
                color: Color(rng.pick(&moons.palette).copied().unwrap_or_default()),
            })
        } else {
            None
        };

        Some(Planet {
            id: DurableId::slot("planet", seed, index),
            name,
            archetype: archetype.name.clone(),
            position,
            radius,
            mass: archetype.density * 4.0 / 3.0 * std::f64::consts::PI * radius.powi(3),
            color,
            greeting,
            rotation_speed,
            dockable,
            ring,
            moon,
            rotation: 0.0,
        })
    }

    /// Stations claim distinct host planets. With no planets left in the pool
    /// the remaining station slots are simply empty.
    pub fn generate_stations(&self, seed: Seed, planets: &[Planet]) -> Vec<Station> {
        let rules = &self.rules.stations;
        let count = sub_rng!(seed, "stationCount").range_inclusive(0, rules.max_count);

        let mut pool: Vec<usize> = (0..planets.len()).collect();
        let mut stations = Vec::new();
        for slot in 0..count as usize {
            let Some(pick) = sub_rng!(seed, "stationIndex", slot).index(pool.len()) else {
                break;
            };
            let host = &planets[pool.remove(pick)];

            let mut rng = sub_rng!(seed, "station", slot);
            let orbit_radius = host.radius * rules.orbit_ratio.sample(&mut rng);
            let size = host.radius * rules.size_ratio.sample(&mut rng);
            let orbit_speed = rules.orbit_speed.sample(&mut rng);
            let angle = rng.angle();
            let suffix = rng.pick(&rules.suffixes).cloned().unwrap_or_default();

            stations.push(Station {
                id: DurableId::slot("station", seed, slot),
                name: format!("{} {}", host.name, suffix),
                host: host.name.clone(),
                position: host.position.orbit_point(orbit_radius, angle),
                orbit_radius,
                size,
                orbit_speed,
                angle,
                dockable: true,
            });
        }
        stations
    }

    /// Ambient debris clouds. Decorative only.
    pub fn generate_derelicts(&self, seed: Seed) -> Vec<Derelict> {
        const KINDS: [DerelictKind; 3] = [
            DerelictKind::Wreckage,
            DerelictKind::IceDebris,
            DerelictKind::SalvageDrift,
        ];
        let rules = &self.rules.derelicts;
        let count = rules.count.sample(&mut sub_rng!(seed, "derelictCount"));

        (0..count as usize)
            .map(|k| {
                let mut rng = sub_rng!(seed, "derelict", k);
                let kind = rng.pick(&KINDS).copied().unwrap_or(DerelictKind::Wreckage);
                let distance = rules.distance.sample(&mut rng);
                let angle = rng.angle();
                Derelict {
                    kind,
                    center: Position::ORIGIN.orbit_point(distance, angle),
                    radius: rules.radius.sample(&mut rng),
                    pieces: rules.pieces.sample(&mut rng),
                }
            })
            .collect()
    }

    /// Field descriptor. The field's own seed is a sub-seed, so regenerating
    /// its rocks never depends on any other draw in the sector.
    pub fn generate_asteroid_field(&self, seed: Seed) -> AsteroidFieldSpec {
        let rules = &self.rules.asteroids;
        let mut rng = sub_rng!(seed, "asteroidField");
        let distance = rules.field_distance.sample(&mut rng);
        let angle = rng.angle();
        let height = rng.range(-rules.vertical_offset, rules.vertical_offset);
        let extent = rules.extent.sample(&mut rng);

        AsteroidFieldSpec {
            seed: hash_seed!(seed, "asteroids"),
            center: Position::new(distance * angle.cos(), height, distance * angle.sin()),
            extent,
            count: rules.candidate_count,
        }
    }
}
