//! Defensive building retaliation.
//!
//! Each live defense fires at most once per cooldown window, measured on
//! the battle clock rather than wall time. Shots pick the nearest living
//! troop in range, ties to the lowest troop id. Defenses are resolved in
//! building-id order, so a troop killed by an earlier defense is gone
//! before later defenses pick targets in the same tick.

use hecs::{Entity, World};

use rampart_core::components::*;
use rampart_core::enums::UnitState;
use rampart_core::events::{BattleEventKind, Projectile};
use rampart_core::types::Position;

pub fn run(world: &mut World, now_secs: f64, events: &mut Vec<BattleEventKind>) {
    let mut defenses: Vec<(Entity, u32)> = Vec::new();
    {
        let mut query = world.query::<(&Building, &DefenseProfile)>();
        for (entity, (building, _)) in query.iter() {
            if !building.destroyed {
                defenses.push((entity, building.id));
            }
        }
    }
    defenses.sort_by_key(|&(_, id)| id);

    for (defense_e, building_id) in defenses {
        let (center, damage, range, hits_ground) = {
            let profile = match world.get::<&DefenseProfile>(defense_e) {
                Ok(p) => *p,
                Err(_) => continue,
            };
            if now_secs - profile.last_attack_secs < profile.cooldown_secs() {
                continue;
            }
            let position = match world.get::<&Position>(defense_e) {
                Ok(p) => *p,
                Err(_) => continue,
            };
            let footprint = match world.get::<&Footprint>(defense_e) {
                Ok(f) => *f,
                Err(_) => continue,
            };
            (
                footprint.center(&position),
                profile.damage,
                profile.range,
                profile.targets.hits_ground(),
            )
        };
        if !hits_ground {
            // Every troop in the roster is a ground unit.
            continue;
        }

        let Some((troop_e, troop_id, troop_pos)) = nearest_troop(world, &center, range) else {
            continue;
        };

        let (remaining, kind) = {
            let mut hitpoints = match world.get::<&mut Hitpoints>(troop_e) {
                Ok(hp) => hp,
                Err(_) => continue,
            };
            hitpoints.hp = (hitpoints.hp - damage).max(0.0);
            let remaining = hitpoints.hp;
            drop(hitpoints);
            let kind = match world.get::<&Troop>(troop_e) {
                Ok(troop) => troop.kind,
                Err(_) => continue,
            };
            (remaining, kind)
        };

        // The killing shot emits a death event in place of an attack
        // event, mirroring how building destruction is reported.
        if remaining > 0.0 {
            events.push(BattleEventKind::BuildingAttack {
                building_id,
                troop_id,
                damage,
                remaining_health: remaining,
                projectile: Some(Projectile {
                    from: center,
                    to: troop_pos,
                }),
            });
        } else {
            if let Ok(mut troop) = world.get::<&mut Troop>(troop_e) {
                troop.state = UnitState::Dead;
            }
            events.push(BattleEventKind::TroopDeath {
                troop_id,
                troop_type: kind,
                position: troop_pos,
                killed_by: building_id,
            });
        }

        if let Ok(mut profile) = world.get::<&mut DefenseProfile>(defense_e) {
            profile.last_attack_secs = now_secs;
        }
    }
}

/// Nearest living troop within `range` of `from`, ties to the lowest id.
fn nearest_troop(world: &World, from: &Position, range: f64) -> Option<(Entity, u32, Position)> {
    let mut best: Option<(Entity, u32, Position, f64)> = None;

    let mut query = world.query::<(&Troop, &Hitpoints, &Position)>();
    let mut troops: Vec<(Entity, u32, Position, f64)> = query
        .iter()
        .filter(|(_, (troop, hitpoints, _))| {
            troop.state != UnitState::Dead && hitpoints.is_alive()
        })
        .map(|(entity, (troop, _, position))| {
            (entity, troop.id, *position, from.distance_to(position))
        })
        .filter(|&(_, _, _, dist)| dist <= range)
        .collect();
    troops.sort_by_key(|&(_, id, _, _)| id);

    for candidate in troops {
        match best {
            Some((_, _, _, best_dist)) if candidate.3 >= best_dist => {}
            _ => best = Some(candidate),
        }
    }
    best.map(|(entity, id, position, _)| (entity, id, position))
}
