//! Attack resolution for troops in the `Attacking` state.
//!
//! Damage lands once per tick. Health floors at zero, and destruction
//! latches exactly once: the killing blow emits a single destroyed event
//! in place of an attack event. Suicide troops detonate on their first
//! attack and die on the spot.

use hecs::World;

use rampart_core::components::*;
use rampart_core::enums::UnitState;
use rampart_core::events::{BattleEventKind, Projectile};
use rampart_core::types::Position;

use crate::systems::troops_in_spawn_order;

pub fn run(world: &mut World, events: &mut Vec<BattleEventKind>) {
    for (troop_e, troop_id) in troops_in_spawn_order(world, Some(UnitState::Attacking)) {
        let target = match world.get::<&TargetInfo>(troop_e) {
            Ok(info) => info.building,
            Err(_) => continue,
        };
        let Some(target_e) = target else {
            set_idle(world, troop_e);
            continue;
        };

        let target_live = world
            .get::<&Building>(target_e)
            .map(|b| !b.destroyed)
            .unwrap_or(false);
        if !target_live {
            // Someone else finished it this tick; replan next tick.
            clear_target(world, troop_e);
            set_idle(world, troop_e);
            continue;
        }

        let (kind, position, stats) = match (
            world.get::<&Troop>(troop_e),
            world.get::<&Position>(troop_e),
            world.get::<&CombatStats>(troop_e),
        ) {
            (Ok(troop), Ok(position), Ok(stats)) => (troop.kind, *position, *stats),
            _ => continue,
        };

        let (building_id, building_kind, building_pos, center) = {
            let building = match world.get::<&Building>(target_e) {
                Ok(b) => *b,
                Err(_) => continue,
            };
            let pos = match world.get::<&Position>(target_e) {
                Ok(p) => *p,
                Err(_) => continue,
            };
            let footprint = match world.get::<&Footprint>(target_e) {
                Ok(f) => *f,
                Err(_) => continue,
            };
            (building.id, building.kind, pos, footprint.center(&pos))
        };

        let remaining = {
            let mut hitpoints = match world.get::<&mut Hitpoints>(target_e) {
                Ok(hp) => hp,
                Err(_) => continue,
            };
            hitpoints.hp = (hitpoints.hp - stats.damage).max(0.0);
            hitpoints.hp
        };

        if remaining > 0.0 {
            events.push(BattleEventKind::TroopAttack {
                troop_id,
                building_id,
                damage: stats.damage,
                remaining_health: remaining,
                projectile: stats.projectile.then_some(Projectile {
                    from: position,
                    to: center,
                }),
            });
        } else {
            if let Ok(mut building) = world.get::<&mut Building>(target_e) {
                building.destroyed = true;
            }
            events.push(BattleEventKind::BuildingDestroyed {
                building_id,
                building_type: building_kind,
                position: building_pos,
            });
            clear_target(world, troop_e);
            set_idle(world, troop_e);
        }

        if stats.suicide {
            if let Ok(mut hitpoints) = world.get::<&mut Hitpoints>(troop_e) {
                hitpoints.hp = 0.0;
            }
            if let Ok(mut troop) = world.get::<&mut Troop>(troop_e) {
                troop.state = UnitState::Dead;
            }
            events.push(BattleEventKind::TroopDeath {
                troop_id,
                troop_type: kind,
                position,
                killed_by: building_id,
            });
        }
    }
}

fn set_idle(world: &mut World, troop_e: hecs::Entity) {
    if let Ok(mut troop) = world.get::<&mut Troop>(troop_e) {
        if troop.state != UnitState::Dead {
            troop.state = UnitState::Idle;
        }
    }
}

fn clear_target(world: &mut World, troop_e: hecs::Entity) {
    if let Ok(mut info) = world.get::<&mut TargetInfo>(troop_e) {
        info.building = None;
        info.needs_to_destroy_wall = false;
    }
}
