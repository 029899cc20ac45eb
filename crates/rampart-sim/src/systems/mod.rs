//! Per-tick battle systems, run by the engine in a fixed order.

pub mod cleanup;
pub mod defense;
pub mod movement;
pub mod scoring;
pub mod targeting;
pub mod troop_combat;

use hecs::{Entity, World};

use rampart_core::components::{Building, Footprint, Troop};
use rampart_core::enums::UnitState;
use rampart_core::types::Position;

/// Troop entities in ascending troop-id order (deploy order). Every
/// system iterates troops in this order so same-tick interactions resolve
/// deterministically.
pub(crate) fn troops_in_spawn_order(world: &World, state: Option<UnitState>) -> Vec<(Entity, u32)> {
    let mut query = world.query::<&Troop>();
    let mut list: Vec<(Entity, u32)> = query
        .iter()
        .filter(|(_, troop)| state.map_or(true, |s| troop.state == s))
        .map(|(entity, troop)| (entity, troop.id))
        .collect();
    list.sort_by_key(|&(_, id)| id);
    list
}

/// Footprint center and wall-ness of a live building target.
/// None when the entity is gone or already destroyed.
pub(crate) fn building_center(world: &World, entity: Entity) -> Option<(Position, bool)> {
    let building = world.get::<&Building>(entity).ok()?;
    if building.destroyed {
        return None;
    }
    let position = world.get::<&Position>(entity).ok()?;
    let footprint = world.get::<&Footprint>(entity).ok()?;
    Some((footprint.center(&position), building.kind.is_wall()))
}
