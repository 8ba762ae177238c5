//! NPC drift: position += velocity * dt.

use glam::DVec3;
use hecs::{Entity, World};

use voidline_core::entities::Npc;

/// Integrate every moving NPC. Entities that actually moved are pushed into
/// `moved` (cleared first) so the caller can flag them for persistence.
pub fn run(world: &mut World, dt: f64, moved: &mut Vec<Entity>) {
    moved.clear();

    for (entity, npc) in world.query_mut::<&mut Npc>() {
        if npc.velocity == DVec3::ZERO {
            continue;
        }
        let position = DVec3::from(npc.position) + npc.velocity * dt;
        npc.position = position.into();
        moved.push(entity);
    }
}
