//! World entity descriptors.
//!
//! One tagged enum covers every kind of body the generator can place or the
//! save system can restore. Consumers dispatch on the variant (or its
//! [`Body::type_name`]) instead of probing fields.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::ids::DurableId;
use crate::seed::Seed;
use crate::types::{Color, Position};

/// Planetary ring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ring {
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub color: Color,
    /// Tilt from the orbital plane in radians.
    pub tilt: f64,
}

/// A moon orbiting a planet, referenced by the planet's name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Moon {
    pub id: DurableId,
    pub name: String,
    pub host: String,
    pub radius: f64,
    pub color: Color,
    pub orbit_radius: f64,
    /// Radians per second.
    pub orbit_speed: f64,
    pub angle: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Planet {
    pub id: DurableId,
    pub name: String,
    pub archetype: String,
    pub position: Position,
    pub radius: f64,
    pub mass: f64,
    pub color: Color,
    pub greeting: String,
    /// Spin in radians per second.
    pub rotation_speed: f64,
    pub dockable: bool,
    pub ring: Option<Ring>,
    pub moon: Option<Moon>,
    /// Current spin phase. Animation state only; never persisted.
    #[serde(skip)]
    pub rotation: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub id: DurableId,
    pub name: String,
    /// Name of the planet this station orbits. Resolved lazily.
    pub host: String,
    pub position: Position,
    pub orbit_radius: f64,
    pub size: f64,
    /// Radians per second.
    pub orbit_speed: f64,
    pub angle: f64,
    pub dockable: bool,
}

/// Generation parameters of an asteroid field. The live destroyed-id set is
/// owned by the field manager, not by this descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AsteroidFieldSpec {
    pub seed: Seed,
    pub center: Position,
    pub extent: f64,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DerelictKind {
    Wreckage,
    IceDebris,
    SalvageDrift,
}

/// Non-interactive debris cloud. Carries no id: never destroyed or persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Derelict {
    pub kind: DerelictKind,
    pub center: Position,
    pub radius: f64,
    pub pieces: u32,
}

/// Non-procedural ship or character placed by authors or gameplay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Npc {
    pub id: DurableId,
    pub name: String,
    pub faction: String,
    pub position: Position,
    pub velocity: DVec3,
}

/// Any world body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Body {
    Planet(Planet),
    Station(Station),
    Moon(Moon),
    AsteroidField(AsteroidFieldSpec),
    Derelict(Derelict),
    Npc(Npc),
}

impl Body {
    /// Registry key for this variant.
    pub fn type_name(&self) -> &'static str {
        match self {
            Body::Planet(_) => "Planet",
            Body::Station(_) => "Station",
            Body::Moon(_) => "Moon",
            Body::AsteroidField(_) => "AsteroidField",
            Body::Derelict(_) => "Derelict",
            Body::Npc(_) => "Npc",
        }
    }

    /// Durable id, for the variants that have one.
    pub fn id(&self) -> Option<&DurableId> {
        match self {
            Body::Planet(p) => Some(&p.id),
            Body::Station(s) => Some(&s.id),
            Body::Moon(m) => Some(&m.id),
            Body::Npc(n) => Some(&n.id),
            Body::AsteroidField(_) | Body::Derelict(_) => None,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Body::Planet(p) => Some(&p.name),
            Body::Station(s) => Some(&s.name),
            Body::Moon(m) => Some(&m.name),
            Body::Npc(n) => Some(&n.name),
            Body::AsteroidField(_) | Body::Derelict(_) => None,
        }
    }

    pub fn position(&self) -> Position {
        match self {
            Body::Planet(p) => p.position,
            Body::Station(s) => s.position,
            // Moons are positioned relative to their host; see the orbit system.
            Body::Moon(_) => Position::ORIGIN,
            Body::AsteroidField(f) => f.center,
            Body::Derelict(d) => d.center,
            Body::Npc(n) => n.position,
        }
    }

    pub fn as_planet(&self) -> Option<&Planet> {
        match self {
            Body::Planet(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_station(&self) -> Option<&Station> {
        match self {
            Body::Station(s) => Some(s),
            _ => None,
        }
    }
}

impl Planet {
    /// Stand-in for a planet that a station references before the planet
    /// itself has been loaded.
    pub fn placeholder(name: &str) -> Self {
        Self {
            id: DurableId::new(format!("placeholder:{name}")),
            name: name.to_string(),
            archetype: String::new(),
            position: Position::ORIGIN,
            radius: 0.0,
            mass: 0.0,
            color: Color::default(),
            greeting: String::new(),
            rotation_speed: 0.0,
            dockable: false,
            ring: None,
            moon: None,
            rotation: 0.0,
        }
    }
}
