//! Entity spawn factories for populating a battle world.
//!
//! Buildings are created once from the defender's persisted records at
//! session creation; troops are created by the deploy operation. Both
//! bundle catalog stats into plain components.

use hecs::World;

use rampart_core::catalog::{building_defaults, troop_stats};
use rampart_core::components::*;
use rampart_core::enums::TroopKind;
use rampart_core::state::BuildingRecord;
use rampart_core::types::Position;

/// Spawn one defender building, defaulting missing record fields from the
/// building-kind catalog.
pub fn spawn_building(world: &mut World, record: &BuildingRecord) -> hecs::Entity {
    let defaults = building_defaults(record.kind);

    let footprint = Footprint {
        width: record.width.unwrap_or(defaults.width),
        height: record.height.unwrap_or(defaults.height),
    };
    let max_hp = record.max_hp.unwrap_or(defaults.max_hp);
    let hp = record.hp.unwrap_or(max_hp).clamp(0.0, max_hp);

    let building = Building {
        id: record.id,
        kind: record.kind,
        destroyed: hp <= 0.0,
    };
    let hitpoints = Hitpoints { hp, max: max_hp };

    // Explicit defense attributes win over the catalog's.
    let defense = record
        .defense
        .map(|d| DefenseProfile {
            damage: d.damage,
            range: d.range,
            attack_speed: d.attack_speed,
            targets: d.target_type,
            // Eligible to fire on the first tick.
            last_attack_secs: f64::NEG_INFINITY,
        })
        .or_else(|| {
            defaults.defense.map(|spec| DefenseProfile {
                damage: spec.damage,
                range: spec.range,
                attack_speed: spec.attack_speed,
                targets: spec.targets,
                last_attack_secs: f64::NEG_INFINITY,
            })
        });

    match defense {
        Some(profile) => world.spawn((building, record.position, footprint, hitpoints, profile)),
        None => world.spawn((building, record.position, footprint, hitpoints)),
    }
}

/// Spawn one troop in `Idle` state with stats from the troop-kind catalog.
pub fn spawn_troop(
    world: &mut World,
    id: u32,
    kind: TroopKind,
    position: Position,
) -> hecs::Entity {
    let stats = troop_stats(kind);

    world.spawn((
        Troop {
            id,
            kind,
            state: Default::default(),
        },
        position,
        CombatStats {
            damage: stats.damage,
            range: stats.range,
            speed: stats.speed,
            projectile: stats.projectile,
            over_walls: stats.over_walls,
            suicide: stats.suicide,
        },
        Hitpoints::full(stats.max_hp),
        TargetInfo::default(),
        NavPath::default(),
    ))
}
