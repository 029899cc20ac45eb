//! Removes dead troops from the world at the end of each tick.
//!
//! Death events were already emitted by the system that killed the troop;
//! cleanup only despawns. Destroyed buildings stay in the world so that
//! scoring and client views keep seeing them.

use hecs::{Entity, World};

use rampart_core::components::{Hitpoints, Troop};
use rampart_core::enums::UnitState;

pub fn run(world: &mut World, despawn_buffer: &mut Vec<Entity>) {
    despawn_buffer.clear();
    {
        let mut query = world.query::<(&Troop, &Hitpoints)>();
        for (entity, (troop, hitpoints)) in query.iter() {
            if troop.state == UnitState::Dead || !hitpoints.is_alive() {
                despawn_buffer.push(entity);
            }
        }
    }
    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}
