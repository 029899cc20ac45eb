//! Stat configuration tables for troop and building kinds.
//!
//! Deploy and session creation copy these values into components; missing
//! fields of incoming building records are defaulted from here.

use crate::constants::*;
use crate::enums::{BuildingKind, TargetClass, TargetPreference, TroopKind};

/// Combat parameters for a troop kind.
#[derive(Debug, Clone, Copy)]
pub struct TroopStats {
    pub max_hp: f64,
    pub damage: f64,
    pub speed: f64,
    pub range: f64,
    pub preference: TargetPreference,
    /// Emits a projectile descriptor with attack events.
    pub projectile: bool,
    /// May attack through an intervening wall.
    pub over_walls: bool,
    /// Detonates on its first attack and dies unconditionally.
    pub suicide: bool,
}

/// Look up the stat block for a troop kind.
pub fn troop_stats(kind: TroopKind) -> TroopStats {
    match kind {
        TroopKind::Barbarian => TroopStats {
            max_hp: BARBARIAN_HP,
            damage: BARBARIAN_DAMAGE,
            speed: BARBARIAN_SPEED,
            range: BARBARIAN_RANGE,
            preference: TargetPreference::Any,
            projectile: false,
            over_walls: false,
            suicide: false,
        },
        TroopKind::Archer => TroopStats {
            max_hp: ARCHER_HP,
            damage: ARCHER_DAMAGE,
            speed: ARCHER_SPEED,
            range: ARCHER_RANGE,
            preference: TargetPreference::Any,
            projectile: true,
            over_walls: true,
            suicide: false,
        },
        TroopKind::Giant => TroopStats {
            max_hp: GIANT_HP,
            damage: GIANT_DAMAGE,
            speed: GIANT_SPEED,
            range: GIANT_RANGE,
            preference: TargetPreference::Defenses,
            projectile: false,
            over_walls: false,
            suicide: false,
        },
        TroopKind::WallBreaker => TroopStats {
            max_hp: WALL_BREAKER_HP,
            damage: WALL_BREAKER_DAMAGE,
            speed: WALL_BREAKER_SPEED,
            range: WALL_BREAKER_RANGE,
            preference: TargetPreference::Walls,
            projectile: false,
            over_walls: false,
            suicide: true,
        },
    }
}

/// Retaliation parameters for a defensive building kind.
#[derive(Debug, Clone, Copy)]
pub struct DefenseSpec {
    pub damage: f64,
    pub range: f64,
    pub attack_speed: f64,
    pub targets: TargetClass,
}

/// Default shape and health for a building kind, used when the incoming
/// record omits them.
#[derive(Debug, Clone, Copy)]
pub struct BuildingDefaults {
    pub width: f64,
    pub height: f64,
    pub max_hp: f64,
    pub defense: Option<DefenseSpec>,
}

/// Look up the defaults for a building kind.
pub fn building_defaults(kind: BuildingKind) -> BuildingDefaults {
    match kind {
        BuildingKind::TownHall => BuildingDefaults {
            width: 4.0,
            height: 4.0,
            max_hp: TOWN_HALL_HP,
            defense: None,
        },
        BuildingKind::Cannon => BuildingDefaults {
            width: 3.0,
            height: 3.0,
            max_hp: CANNON_HP,
            defense: Some(DefenseSpec {
                damage: CANNON_DAMAGE,
                range: CANNON_RANGE,
                attack_speed: CANNON_ATTACK_SPEED,
                targets: TargetClass::Ground,
            }),
        },
        BuildingKind::ArcherTower => BuildingDefaults {
            width: 3.0,
            height: 3.0,
            max_hp: ARCHER_TOWER_HP,
            defense: Some(DefenseSpec {
                damage: ARCHER_TOWER_DAMAGE,
                range: ARCHER_TOWER_RANGE,
                attack_speed: ARCHER_TOWER_ATTACK_SPEED,
                targets: TargetClass::Any,
            }),
        },
        BuildingKind::Mortar => BuildingDefaults {
            width: 3.0,
            height: 3.0,
            max_hp: MORTAR_HP,
            defense: Some(DefenseSpec {
                damage: MORTAR_DAMAGE,
                range: MORTAR_RANGE,
                attack_speed: MORTAR_ATTACK_SPEED,
                targets: TargetClass::Ground,
            }),
        },
        BuildingKind::GoldMine => BuildingDefaults {
            width: 3.0,
            height: 3.0,
            max_hp: GOLD_MINE_HP,
            defense: None,
        },
        BuildingKind::ElixirCollector => BuildingDefaults {
            width: 3.0,
            height: 3.0,
            max_hp: ELIXIR_COLLECTOR_HP,
            defense: None,
        },
        BuildingKind::ArmyCamp => BuildingDefaults {
            width: 4.0,
            height: 4.0,
            max_hp: ARMY_CAMP_HP,
            defense: None,
        },
        BuildingKind::Wall => BuildingDefaults {
            width: 1.0,
            height: 1.0,
            max_hp: WALL_HP,
            defense: None,
        },
    }
}
