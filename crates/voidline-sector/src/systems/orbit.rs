//! Planet spin plus moon and station orbit advance.

use std::collections::HashMap;
use std::f64::consts::TAU;

use hecs::World;

use voidline_core::entities::{Moon, Planet, Station};
use voidline_core::types::Position;

fn advance(angle: f64, speed: f64, dt: f64) -> f64 {
    (angle + speed * dt).rem_euclid(TAU)
}

/// Advance every orbiting body by `dt` seconds.
///
/// Stations are re-placed on their orbit around the host's current position.
/// A station whose host is not in the world keeps its last position.
/// `hosts` is scratch space, cleared and refilled on every call.
pub fn run(world: &mut World, dt: f64, hosts: &mut HashMap<String, Position>) {
    for (_entity, planet) in world.query_mut::<&mut Planet>() {
        planet.rotation = advance(planet.rotation, planet.rotation_speed, dt);
        if let Some(moon) = planet.moon.as_mut() {
            moon.angle = advance(moon.angle, moon.orbit_speed, dt);
        }
    }

    for (_entity, moon) in world.query_mut::<&mut Moon>() {
        moon.angle = advance(moon.angle, moon.orbit_speed, dt);
    }

    host_positions(world, hosts);
    for (_entity, station) in world.query_mut::<&mut Station>() {
        station.angle = advance(station.angle, station.orbit_speed, dt);
        if let Some(host) = hosts.get(&station.host) {
            station.position = host.orbit_point(station.orbit_radius, station.angle);
        }
    }
}

/// Current position of every planet, keyed by name.
fn host_positions(world: &World, hosts: &mut HashMap<String, Position>) {
    hosts.clear();
    for (_entity, planet) in world.query::<&Planet>().iter() {
        hosts.insert(planet.name.clone(), planet.position);
    }
}
