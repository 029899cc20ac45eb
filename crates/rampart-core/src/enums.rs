//! Enumeration types used throughout the battle engine.
//!
//! Troop and building kinds are closed enumerations normalized once at the
//! domain boundary (`FromStr`, case-insensitive); no system compares raw
//! strings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Attacker troop kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TroopKind {
    /// Melee ground unit, no target preference.
    Barbarian,
    /// Ranged ground unit; shoots over walls.
    Archer,
    /// Slow tank unit; prefers defensive buildings.
    Giant,
    /// Suicide unit; prefers walls and detonates on contact.
    WallBreaker,
}

impl TroopKind {
    pub const ALL: [TroopKind; 4] = [
        TroopKind::Barbarian,
        TroopKind::Archer,
        TroopKind::Giant,
        TroopKind::WallBreaker,
    ];
}

impl FromStr for TroopKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BARBARIAN" => Ok(TroopKind::Barbarian),
            "ARCHER" => Ok(TroopKind::Archer),
            "GIANT" => Ok(TroopKind::Giant),
            "WALL_BREAKER" | "WALLBREAKER" => Ok(TroopKind::WallBreaker),
            _ => Err(()),
        }
    }
}

impl fmt::Display for TroopKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TroopKind::Barbarian => "BARBARIAN",
            TroopKind::Archer => "ARCHER",
            TroopKind::Giant => "GIANT",
            TroopKind::WallBreaker => "WALL_BREAKER",
        };
        f.write_str(name)
    }
}

/// Defender building kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BuildingKind {
    TownHall,
    Cannon,
    ArcherTower,
    Mortar,
    GoldMine,
    ElixirCollector,
    ArmyCamp,
    Wall,
}

impl BuildingKind {
    /// Walls never count toward the destruction percentage.
    pub fn is_wall(&self) -> bool {
        matches!(self, BuildingKind::Wall)
    }

    /// Buildings that shoot back.
    pub fn is_defense(&self) -> bool {
        matches!(
            self,
            BuildingKind::Cannon | BuildingKind::ArcherTower | BuildingKind::Mortar
        )
    }
}

impl FromStr for BuildingKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TOWN_HALL" | "TOWNHALL" => Ok(BuildingKind::TownHall),
            "CANNON" => Ok(BuildingKind::Cannon),
            "ARCHER_TOWER" | "ARCHERTOWER" => Ok(BuildingKind::ArcherTower),
            "MORTAR" => Ok(BuildingKind::Mortar),
            "GOLD_MINE" | "GOLDMINE" => Ok(BuildingKind::GoldMine),
            "ELIXIR_COLLECTOR" | "ELIXIRCOLLECTOR" => Ok(BuildingKind::ElixirCollector),
            "ARMY_CAMP" | "ARMYCAMP" => Ok(BuildingKind::ArmyCamp),
            "WALL" => Ok(BuildingKind::Wall),
            _ => Err(()),
        }
    }
}

/// Target selection bias for a troop kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetPreference {
    /// Nearest building of any kind.
    #[default]
    Any,
    /// Narrow to defensive buildings when any survive.
    Defenses,
    /// Narrow to walls when any survive.
    Walls,
}

/// Troop lifecycle state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitState {
    /// No target or plan yet.
    #[default]
    Idle,
    /// Advancing along a waypoint path.
    Moving,
    /// In range of the target and dealing damage each tick.
    Attacking,
    /// Health reached zero; removed at end of tick.
    Dead,
}

/// Session lifecycle. Transitions only move forward:
/// `Waiting -> Active -> Completed`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BattleStatus {
    /// Created, no troops deployed yet; the tick loop is not running.
    #[default]
    Waiting,
    /// First troop deployed; the tick loop is driving the encounter.
    Active,
    /// An end condition fired. Terminal; ticks no longer mutate state.
    Completed,
}

/// What a defense profile is allowed to shoot at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TargetClass {
    #[default]
    Any,
    Ground,
    Air,
}

impl TargetClass {
    /// Whether a defense with this class may engage a ground troop.
    /// Every troop kind in the closed enumeration is a ground unit.
    pub fn hits_ground(&self) -> bool {
        !matches!(self, TargetClass::Air)
    }
}
