//! Collaborator-facing data shapes: incoming building records and the
//! snapshots returned to the orchestration layer for client rendering.

use serde::{Deserialize, Serialize};

use crate::catalog;
use crate::enums::{BuildingKind, TargetClass, TroopKind};
use crate::types::Position;

/// A persisted defender building as supplied at session creation.
/// Size and health may be omitted; the catalog fills them in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildingRecord {
    pub id: u32,
    #[serde(rename = "type")]
    pub kind: BuildingKind,
    pub position: Position,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub hp: Option<f64>,
    #[serde(default)]
    pub max_hp: Option<f64>,
    #[serde(default)]
    pub defense: Option<DefenseRecord>,
}

/// Defense attributes of a building record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefenseRecord {
    pub damage: f64,
    pub range: f64,
    pub attack_speed: f64,
    #[serde(default)]
    pub target_type: TargetClass,
}

impl BuildingRecord {
    /// Minimal record for a kind at a position; everything else defaulted.
    pub fn new(id: u32, kind: BuildingKind, position: Position) -> Self {
        Self {
            id,
            kind,
            position,
            width: None,
            height: None,
            hp: None,
            max_hp: None,
            defense: None,
        }
    }

    /// Resolved max health, falling back to the catalog.
    pub fn resolved_max_hp(&self) -> f64 {
        self.max_hp
            .unwrap_or_else(|| catalog::building_defaults(self.kind).max_hp)
    }
}

/// One building as rendered by clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildingView {
    pub id: u32,
    #[serde(rename = "type")]
    pub kind: BuildingKind,
    pub position: Position,
    pub width: f64,
    pub height: f64,
    pub hp: f64,
    pub max_hp: f64,
    pub destroyed: bool,
}

/// Initial state handed back to the orchestration collaborator when a
/// session is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleSnapshot {
    pub session_id: String,
    pub buildings: Vec<BuildingView>,
    pub troop_budget: u32,
}

/// Successful deploy response.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployedTroop {
    pub troop_id: u32,
    #[serde(rename = "type")]
    pub kind: TroopKind,
    pub position: Position,
}
