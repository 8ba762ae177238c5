//! Static generation tables consumed by the world generator.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::ConfigError;
use crate::seed::Mulberry32;

/// Continuous `[min, max)` envelope.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub min: f64,
    pub max: f64,
}

impl Envelope {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// One draw from `rng`.
    pub fn sample(&self, rng: &mut Mulberry32) -> f64 {
        rng.range(self.min, self.max)
    }

    fn check(&self, field: &'static str) -> Result<(), ConfigError> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min > self.max {
            return Err(ConfigError::InvalidRange {
                field,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }

    fn check_positive(&self, field: &'static str) -> Result<(), ConfigError> {
        self.check(field)?;
        if self.min <= 0.0 {
            return Err(ConfigError::NotPositive {
                field,
                value: self.min,
            });
        }
        Ok(())
    }
}

/// Inclusive integer count range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountRange {
    pub min: u32,
    pub max: u32,
}

impl CountRange {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn sample(&self, rng: &mut Mulberry32) -> u32 {
        rng.range_inclusive(self.min, self.max)
    }

    fn check(&self, field: &'static str) -> Result<(), ConfigError> {
        if self.min > self.max {
            return Err(ConfigError::InvalidRange {
                field,
                min: self.min as f64,
                max: self.max as f64,
            });
        }
        Ok(())
    }
}

/// A planet archetype: base name, palette and physical envelopes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanetArchetype {
    pub name: String,
    pub palette: Vec<u32>,
    pub radius: Envelope,
    /// Bulk density used for mass.
    pub density: f64,
    pub dockable_probability: f64,
    pub greetings: Vec<String>,
}

impl PlanetArchetype {
    fn new(
        name: &str,
        palette: &[u32],
        radius: Envelope,
        density: f64,
        dockable_probability: f64,
        greetings: &[&str],
    ) -> Self {
        Self {
            name: name.to_string(),
            palette: palette.to_vec(),
            radius,
            density,
            dockable_probability,
            greetings: greetings.iter().map(|g| g.to_string()).collect(),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let fail = |reason: &str| ConfigError::Archetype {
            archetype: self.name.clone(),
            reason: reason.to_string(),
        };
        if self.name.is_empty() {
            return Err(fail("empty name"));
        }
        if self.palette.is_empty() {
            return Err(fail("empty palette"));
        }
        if self.greetings.is_empty() {
            return Err(fail("no greetings"));
        }
        if !(self.density > 0.0) {
            return Err(fail("density must be positive"));
        }
        self.radius.check_positive("archetype.radius")?;
        check_probability("archetype.dockable_probability", self.dockable_probability)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrbitRules {
    pub first_orbit: f64,
    pub spacing: f64,
    pub jitter: f64,
    pub vertical_offset: f64,
    pub rotation_speed: Envelope,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RingRules {
    pub probability: f64,
    pub inner_ratio: Envelope,
    pub width_ratio: Envelope,
    pub max_tilt: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoonRules {
    pub probability: f64,
    pub radius_ratio: Envelope,
    pub orbit_ratio: Envelope,
    pub orbit_speed: Envelope,
    pub palette: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationRules {
    pub max_count: u32,
    pub orbit_ratio: Envelope,
    pub size_ratio: Envelope,
    pub orbit_speed: Envelope,
    pub suffixes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AsteroidRules {
    pub candidate_count: usize,
    pub extent: Envelope,
    pub field_distance: Envelope,
    pub vertical_offset: f64,
    pub radius: Envelope,
    pub max_spin: f64,
    pub health_per_radius: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerelictRules {
    pub count: CountRange,
    pub distance: Envelope,
    pub radius: Envelope,
    pub pieces: CountRange,
}

/// Every table the generators read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRules {
    pub archetypes: Vec<PlanetArchetype>,
    pub designations: Vec<String>,
    pub planet_count: CountRange,
    pub orbits: OrbitRules,
    pub rings: RingRules,
    pub moons: MoonRules,
    pub stations: StationRules,
    pub asteroids: AsteroidRules,
    pub derelicts: DerelictRules,
}

impl Default for GenerationRules {
    fn default() -> Self {
        Self {
            archetypes: default_archetypes(),
            designations: PLANET_DESIGNATIONS.iter().map(|d| d.to_string()).collect(),
            planet_count: CountRange::new(PLANET_COUNT_MIN, PLANET_COUNT_MAX),
            orbits: OrbitRules {
                first_orbit: FIRST_ORBIT_DISTANCE,
                spacing: ORBIT_SPACING,
                jitter: ORBIT_JITTER,
                vertical_offset: PLANET_VERTICAL_OFFSET,
                rotation_speed: Envelope::new(PLANET_ROTATION_SPEED_MIN, PLANET_ROTATION_SPEED_MAX),
            },
            rings: RingRules {
                probability: RING_PROBABILITY,
                inner_ratio: Envelope::new(RING_INNER_RATIO_MIN, RING_INNER_RATIO_MAX),
                width_ratio: Envelope::new(RING_WIDTH_RATIO_MIN, RING_WIDTH_RATIO_MAX),
                max_tilt: RING_MAX_TILT,
            },
            moons: MoonRules {
                probability: MOON_PROBABILITY,
                radius_ratio: Envelope::new(MOON_RADIUS_RATIO_MIN, MOON_RADIUS_RATIO_MAX),
                orbit_ratio: Envelope::new(MOON_ORBIT_RATIO_MIN, MOON_ORBIT_RATIO_MAX),
                orbit_speed: Envelope::new(MOON_ORBIT_SPEED_MIN, MOON_ORBIT_SPEED_MAX),
                palette: MOON_PALETTE.to_vec(),
            },
            stations: StationRules {
                max_count: STATION_COUNT_MAX,
                orbit_ratio: Envelope::new(STATION_ORBIT_RATIO_MIN, STATION_ORBIT_RATIO_MAX),
                size_ratio: Envelope::new(STATION_SIZE_RATIO_MIN, STATION_SIZE_RATIO_MAX),
                orbit_speed: Envelope::new(STATION_ORBIT_SPEED_MIN, STATION_ORBIT_SPEED_MAX),
                suffixes: STATION_SUFFIXES.iter().map(|s| s.to_string()).collect(),
            },
            asteroids: AsteroidRules {
                candidate_count: ASTEROID_CANDIDATE_COUNT,
                extent: Envelope::new(ASTEROID_FIELD_EXTENT_MIN, ASTEROID_FIELD_EXTENT_MAX),
                field_distance: Envelope::new(
                    ASTEROID_FIELD_DISTANCE_MIN,
                    ASTEROID_FIELD_DISTANCE_MAX,
                ),
                vertical_offset: ASTEROID_FIELD_VERTICAL_OFFSET,
                radius: Envelope::new(ASTEROID_RADIUS_MIN, ASTEROID_RADIUS_MAX),
                max_spin: ASTEROID_SPIN_MAX,
                health_per_radius: ASTEROID_HEALTH_PER_RADIUS,
            },
            derelicts: DerelictRules {
                count: CountRange::new(DERELICT_COUNT_MIN, DERELICT_COUNT_MAX),
                distance: Envelope::new(DERELICT_DISTANCE_MIN, DERELICT_DISTANCE_MAX),
                radius: Envelope::new(DERELICT_RADIUS_MIN, DERELICT_RADIUS_MAX),
                pieces: CountRange::new(DERELICT_PIECES_MIN, DERELICT_PIECES_MAX),
            },
        }
    }
}

impl GenerationRules {
    /// Load rules from a JSON file and validate them.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let rules: GenerationRules = serde_json::from_str(&json)?;
        rules.validate()?;
        tracing::info!(path = %path.display(), "loaded generation rules");
        Ok(rules)
    }

    /// Reject tables that would produce a corrupt or nonsensical world.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.archetypes.is_empty() {
            return Err(ConfigError::EmptyTable { table: "archetypes" });
        }
        for archetype in &self.archetypes {
            archetype.validate()?;
        }
        if self.designations.is_empty() {
            return Err(ConfigError::EmptyTable {
                table: "designations",
            });
        }
        self.planet_count.check("planet_count")?;

        let orbits = &self.orbits;
        check_positive("orbits.first_orbit", orbits.first_orbit)?;
        check_positive("orbits.spacing", orbits.spacing)?;
        check_non_negative("orbits.jitter", orbits.jitter)?;
        check_non_negative("orbits.vertical_offset", orbits.vertical_offset)?;
        orbits.rotation_speed.check("orbits.rotation_speed")?;

        check_probability("rings.probability", self.rings.probability)?;
        self.rings.inner_ratio.check_positive("rings.inner_ratio")?;
        self.rings.width_ratio.check_positive("rings.width_ratio")?;
        check_non_negative("rings.max_tilt", self.rings.max_tilt)?;

        check_probability("moons.probability", self.moons.probability)?;
        self.moons.radius_ratio.check_positive("moons.radius_ratio")?;
        self.moons.orbit_ratio.check_positive("moons.orbit_ratio")?;
        self.moons.orbit_speed.check("moons.orbit_speed")?;
        if self.moons.palette.is_empty() {
            return Err(ConfigError::EmptyTable {
                table: "moons.palette",
            });
        }

        self.stations.orbit_ratio.check_positive("stations.orbit_ratio")?;
        self.stations.size_ratio.check_positive("stations.size_ratio")?;
        self.stations.orbit_speed.check("stations.orbit_speed")?;
        if self.stations.suffixes.is_empty() {
            return Err(ConfigError::EmptyTable {
                table: "stations.suffixes",
            });
        }

        let asteroids = &self.asteroids;
        asteroids.extent.check_positive("asteroids.extent")?;
        asteroids.field_distance.check("asteroids.field_distance")?;
        check_non_negative("asteroids.vertical_offset", asteroids.vertical_offset)?;
        asteroids.radius.check_positive("asteroids.radius")?;
        check_non_negative("asteroids.max_spin", asteroids.max_spin)?;
        check_positive("asteroids.health_per_radius", asteroids.health_per_radius)?;

        self.derelicts.count.check("derelicts.count")?;
        self.derelicts.distance.check("derelicts.distance")?;
        self.derelicts.radius.check_positive("derelicts.radius")?;
        self.derelicts.pieces.check("derelicts.pieces")?;
        Ok(())
    }
}

fn check_probability(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::Probability { field, value });
    }
    Ok(())
}

fn check_positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !(value > 0.0) || !value.is_finite() {
        return Err(ConfigError::NotPositive { field, value });
    }
    Ok(())
}

fn check_non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !(value >= 0.0) || !value.is_finite() {
        return Err(ConfigError::NotPositive { field, value });
    }
    Ok(())
}

/// The shipped archetype table.
fn default_archetypes() -> Vec<PlanetArchetype> {
    vec![
        PlanetArchetype::new(
            "Aridus",
            &[0x8B4513, 0xC2B280, 0xA0522D],
            Envelope::new(60.0, 100.0),
            4.5,
            0.6,
            &[
                "Welcome to the dust plains. Water is rationed.",
                "Landing pads are swept hourly. Mind the sand.",
            ],
        ),
        PlanetArchetype::new(
            "Thalassa",
            &[0x1E90FF, 0x2E8B57, 0x4682B4],
            Envelope::new(70.0, 110.0),
            3.8,
            0.8,
            &[
                "Floating docks ahead. Keep to the marked lanes.",
                "Tide charts are posted at every berth.",
            ],
        ),
        PlanetArchetype::new(
            "Ignis",
            &[0xB22222, 0xFF4500, 0x2F1B14],
            Envelope::new(50.0, 90.0),
            5.5,
            0.3,
            &[
                "Heat shields to full before descent.",
                "Foundry traffic has priority. State your cargo.",
            ],
        ),
        PlanetArchetype::new(
            "Glacies",
            &[0xE0FFFF, 0xB0C4DE, 0xF0F8FF],
            Envelope::new(50.0, 85.0),
            2.9,
            0.5,
            &[
                "Ice caverns are open to licensed haulers only.",
                "Surface temperature is lethal. Stay docked.",
            ],
        ),
        PlanetArchetype::new(
            "Nebulon",
            &[0xDAA520, 0xCD853F, 0x9370DB],
            Envelope::new(140.0, 220.0),
            1.3,
            0.0,
            &["No solid surface. Skimming permits required."],
        ),
        PlanetArchetype::new(
            "Sylva",
            &[0x228B22, 0x6B8E23, 0x556B2F],
            Envelope::new(65.0, 105.0),
            5.0,
            0.9,
            &[
                "Quarantine scan in progress. Please hold.",
                "Welcome, traveler. The canopy markets are open.",
            ],
        ),
    ]
}
