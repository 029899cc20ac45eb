//! Waypoint-following movement for troops in the `Moving` state.
//!
//! A troop advances `speed * dt` tiles along its route each tick and
//! transitions to `Attacking` the moment its target's footprint center is
//! within range with a clear shot (or the troop shoots over walls).
//! Exhausting the route without reaching range drops the troop back to
//! `Idle` so targeting replans on the next tick.

use hecs::World;

use rampart_core::components::*;
use rampart_core::constants::WAYPOINT_EPSILON;
use rampart_core::enums::UnitState;
use rampart_core::events::BattleEventKind;
use rampart_core::types::Position;

use crate::nav::NavGrid;
use crate::systems::{building_center, troops_in_spawn_order};

pub fn run(world: &mut World, nav: &NavGrid, dt: f64, events: &mut Vec<BattleEventKind>) {
    for (troop_e, troop_id) in troops_in_spawn_order(world, Some(UnitState::Moving)) {
        let target = match world.get::<&TargetInfo>(troop_e) {
            Ok(info) => info.building,
            Err(_) => continue,
        };
        let Some(target_e) = target else {
            set_state(world, troop_e, UnitState::Idle);
            continue;
        };
        let Some((center, target_is_wall)) = building_center(world, target_e) else {
            // Target fell while we were walking; replan next tick.
            set_state(world, troop_e, UnitState::Idle);
            clear_path(world, troop_e);
            continue;
        };

        let position = match world.get::<&Position>(troop_e) {
            Ok(p) => *p,
            Err(_) => continue,
        };
        let stats = match world.get::<&CombatStats>(troop_e) {
            Ok(s) => *s,
            Err(_) => continue,
        };

        let ignore = if target_is_wall { Some(target_e) } else { None };
        if position.distance_to(&center) <= stats.range
            && (stats.over_walls || nav.wall_blocking(&position, &center, ignore).is_none())
        {
            set_state(world, troop_e, UnitState::Attacking);
            clear_path(world, troop_e);
            continue;
        }

        let next_waypoint = {
            let mut path = match world.get::<&mut NavPath>(troop_e) {
                Ok(p) => p,
                Err(_) => continue,
            };
            while let Some(front) = path.waypoints.front() {
                if position.distance_to(front) <= WAYPOINT_EPSILON {
                    path.waypoints.pop_front();
                } else {
                    break;
                }
            }
            path.waypoints.front().copied()
        };

        match next_waypoint {
            Some(waypoint) => {
                let stepped = position.step_toward(&waypoint, stats.speed * dt);
                if let Ok(mut p) = world.get::<&mut Position>(troop_e) {
                    *p = stepped;
                }
                events.push(BattleEventKind::TroopMove {
                    troop_id,
                    from: position,
                    to: stepped,
                });
            }
            None => set_state(world, troop_e, UnitState::Idle),
        }
    }
}

fn set_state(world: &mut World, troop_e: hecs::Entity, state: UnitState) {
    if let Ok(mut troop) = world.get::<&mut Troop>(troop_e) {
        if troop.state != UnitState::Dead {
            troop.state = state;
        }
    }
}

fn clear_path(world: &mut World, troop_e: hecs::Entity) {
    if let Ok(mut path) = world.get::<&mut NavPath>(troop_e) {
        path.waypoints.clear();
    }
}
