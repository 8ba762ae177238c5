//! Generation tuning parameters.
//!
//! These feed `GenerationRules::default()`. Changing any of them changes what
//! existing seeds generate, so treat them as part of the save format.

// --- Planets ---

/// Planet count range for a fully procedural sector (inclusive).
pub const PLANET_COUNT_MIN: u32 = 2;
pub const PLANET_COUNT_MAX: u32 = 6;

/// Orbit distance of the innermost planet slot.
pub const FIRST_ORBIT_DISTANCE: f64 = 600.0;

/// Distance added per planet slot.
pub const ORBIT_SPACING: f64 = 550.0;

/// Maximum deviation from the nominal slot distance (either direction).
pub const ORBIT_JITTER: f64 = 120.0;

/// Maximum height above/below the orbital plane.
pub const PLANET_VERTICAL_OFFSET: f64 = 40.0;

/// Planet spin in radians per second.
pub const PLANET_ROTATION_SPEED_MIN: f64 = 0.02;
pub const PLANET_ROTATION_SPEED_MAX: f64 = 0.12;

/// Slot designations appended to the archetype's base name.
pub const PLANET_DESIGNATIONS: [&str; 8] = [
    "Prime", "Secundus", "Tertius", "Quartus", "Quintus", "Sextus", "Septimus", "Octavus",
];

// --- Rings ---

pub const RING_PROBABILITY: f64 = 0.3;
/// Ring inner edge as a multiple of planet radius.
pub const RING_INNER_RATIO_MIN: f64 = 1.3;
pub const RING_INNER_RATIO_MAX: f64 = 1.6;
/// Ring width as a multiple of planet radius.
pub const RING_WIDTH_RATIO_MIN: f64 = 0.3;
pub const RING_WIDTH_RATIO_MAX: f64 = 0.8;
/// Maximum ring tilt (radians).
pub const RING_MAX_TILT: f64 = 0.45;

// --- Moons ---

pub const MOON_PROBABILITY: f64 = 0.45;
pub const MOON_RADIUS_RATIO_MIN: f64 = 0.15;
pub const MOON_RADIUS_RATIO_MAX: f64 = 0.3;
pub const MOON_ORBIT_RATIO_MIN: f64 = 2.2;
pub const MOON_ORBIT_RATIO_MAX: f64 = 3.5;
pub const MOON_ORBIT_SPEED_MIN: f64 = 0.1;
pub const MOON_ORBIT_SPEED_MAX: f64 = 0.4;
pub const MOON_PALETTE: [u32; 3] = [0xA9A9A9, 0xD3D3D3, 0x808080];

// --- Stations ---

/// Upper bound on stations per sector (inclusive). Also capped by planet count.
pub const STATION_COUNT_MAX: u32 = 3;
/// Station orbit radius as a multiple of host planet radius.
pub const STATION_ORBIT_RATIO_MIN: f64 = 1.6;
pub const STATION_ORBIT_RATIO_MAX: f64 = 2.4;
/// Station size as a multiple of host planet radius.
pub const STATION_SIZE_RATIO_MIN: f64 = 0.18;
pub const STATION_SIZE_RATIO_MAX: f64 = 0.3;
pub const STATION_ORBIT_SPEED_MIN: f64 = 0.05;
pub const STATION_ORBIT_SPEED_MAX: f64 = 0.2;
pub const STATION_SUFFIXES: [&str; 4] = ["Outpost", "Relay", "Anchorage", "Spire"];

// --- Asteroid fields ---

/// Candidates drawn per field. Independent of the seed, so density can be
/// tuned without touching reproducibility of a given candidate's id.
pub const ASTEROID_CANDIDATE_COUNT: usize = 48;
pub const ASTEROID_FIELD_EXTENT_MIN: f64 = 900.0;
pub const ASTEROID_FIELD_EXTENT_MAX: f64 = 1400.0;
/// Distance of a generated field's center from the sector origin.
pub const ASTEROID_FIELD_DISTANCE_MIN: f64 = 1800.0;
pub const ASTEROID_FIELD_DISTANCE_MAX: f64 = 2600.0;
pub const ASTEROID_FIELD_VERTICAL_OFFSET: f64 = 60.0;
pub const ASTEROID_RADIUS_MIN: f64 = 4.0;
pub const ASTEROID_RADIUS_MAX: f64 = 18.0;
pub const ASTEROID_SPIN_MAX: f64 = 0.6;
pub const ASTEROID_HEALTH_PER_RADIUS: f64 = 10.0;
pub const ASTEROID_ID_PREFIX: &str = "ast-";

// --- Derelict debris ---

pub const DERELICT_COUNT_MIN: u32 = 0;
pub const DERELICT_COUNT_MAX: u32 = 3;
pub const DERELICT_DISTANCE_MIN: f64 = 400.0;
pub const DERELICT_DISTANCE_MAX: f64 = 3000.0;
pub const DERELICT_RADIUS_MIN: f64 = 60.0;
pub const DERELICT_RADIUS_MAX: f64 = 160.0;
pub const DERELICT_PIECES_MIN: u32 = 5;
pub const DERELICT_PIECES_MAX: u32 = 20;

// --- Persistence ---

/// Version written into every sector diff.
pub const DIFF_FORMAT_VERSION: u32 = 1;
