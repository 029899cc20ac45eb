//! Events streamed to battle viewers.
//!
//! The wire shape is `{type, timestamp, data}`: a SCREAMING_SNAKE_CASE tag,
//! a millisecond timestamp on the battle clock, and a camelCase payload
//! per variant. The enum is closed so adding an event kind is a
//! compile-time exhaustiveness change, not a stringly-typed bag of fields.

use serde::{Deserialize, Serialize};

use crate::enums::{BuildingKind, TroopKind};
use crate::types::Position;

/// Presentation-only projectile descriptor attached to ranged attacks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub from: Position,
    pub to: Position,
}

/// A timestamped event as delivered to subscribers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleEvent {
    /// Milliseconds of battle time at emission.
    pub timestamp: u64,
    #[serde(flatten)]
    pub kind: BattleEventKind,
}

/// Event payloads, one variant per wire event type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BattleEventKind {
    #[serde(rename_all = "camelCase")]
    TroopSpawn {
        troop_id: u32,
        troop_type: TroopKind,
        position: Position,
        health: f64,
    },
    #[serde(rename_all = "camelCase")]
    TroopMove {
        troop_id: u32,
        from: Position,
        to: Position,
    },
    #[serde(rename_all = "camelCase")]
    TroopAttack {
        troop_id: u32,
        building_id: u32,
        damage: f64,
        remaining_health: f64,
        #[serde(skip_serializing_if = "Option::is_none")]
        projectile: Option<Projectile>,
    },
    #[serde(rename_all = "camelCase")]
    BuildingAttack {
        building_id: u32,
        troop_id: u32,
        damage: f64,
        remaining_health: f64,
        #[serde(skip_serializing_if = "Option::is_none")]
        projectile: Option<Projectile>,
    },
    #[serde(rename_all = "camelCase")]
    BuildingDestroyed {
        building_id: u32,
        building_type: BuildingKind,
        position: Position,
    },
    #[serde(rename_all = "camelCase")]
    TroopDeath {
        troop_id: u32,
        troop_type: TroopKind,
        position: Position,
        /// Building id of whatever dealt the killing blow (the wall, for a
        /// detonating wall breaker).
        killed_by: u32,
    },
    #[serde(rename_all = "camelCase")]
    BattleEnd {
        destruction_percentage: u32,
        stars: u32,
        /// Battle duration in seconds.
        duration: f64,
        loot_gold: u32,
        loot_elixir: u32,
    },
}
