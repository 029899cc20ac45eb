//! ECS components for hecs entities.
//!
//! Components are plain data structs with no methods beyond small
//! accessors. Battle logic lives in systems, not components.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::Position;

/// A deployed attacker unit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Troop {
    /// Wire id, assigned in deploy order starting at 1.
    pub id: u32,
    pub kind: TroopKind,
    pub state: UnitState,
}

/// Combat attributes copied from the catalog at deploy time.
///
/// The `over_walls` and `suicide` flags are per-kind capabilities; systems
/// branch on these, never on the kind name.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CombatStats {
    /// Damage applied per tick while attacking.
    pub damage: f64,
    /// Attack range in tiles, measured to the target's footprint center.
    pub range: f64,
    /// Movement speed in tiles per second.
    pub speed: f64,
    /// Emits a projectile descriptor with attack events.
    pub projectile: bool,
    /// May attack a target through an intervening wall.
    pub over_walls: bool,
    /// Detonates on its first attack: full damage, then dies.
    pub suicide: bool,
}

/// Remaining and maximum health. `hp` never goes below zero.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Hitpoints {
    pub hp: f64,
    pub max: f64,
}

impl Hitpoints {
    pub fn full(max: f64) -> Self {
        Self { hp: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0.0
    }
}

/// Cached targeting decision for a troop. Kept until the target is
/// destroyed or explicitly cleared.
#[derive(Debug, Clone, Copy, Default)]
pub struct TargetInfo {
    pub building: Option<hecs::Entity>,
    /// Set when the troop was rerouted onto a wall that blocks the way to
    /// what it actually wanted to hit.
    pub needs_to_destroy_wall: bool,
}

/// Ordered waypoints the troop walks through, front first.
#[derive(Debug, Clone, Default)]
pub struct NavPath {
    pub waypoints: VecDeque<Position>,
}

/// A defender structure. Footprint and kind are immutable for the
/// session's lifetime; only `destroyed` (and `Hitpoints`) mutate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Building {
    pub id: u32,
    pub kind: BuildingKind,
    /// Latches once health reaches zero; never reset.
    pub destroyed: bool,
}

/// Building footprint in tiles. The footprint center is
/// `position + footprint / 2` and is what troops aim at.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Footprint {
    pub width: f64,
    pub height: f64,
}

impl Footprint {
    pub fn center(&self, position: &Position) -> Position {
        Position::new(position.x + self.width / 2.0, position.y + self.height / 2.0)
    }
}

/// Retaliation attributes for a defensive building.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DefenseProfile {
    /// Damage per shot.
    pub damage: f64,
    /// Engagement range in tiles.
    pub range: f64,
    /// Shots per second; cooldown is `1.0 / attack_speed` seconds.
    pub attack_speed: f64,
    pub targets: TargetClass,
    /// Battle-clock seconds of the last shot.
    pub last_attack_secs: f64,
}

impl DefenseProfile {
    /// Seconds between shots.
    pub fn cooldown_secs(&self) -> f64 {
        if self.attack_speed > 0.0 {
            1.0 / self.attack_speed
        } else {
            f64::INFINITY
        }
    }
}
