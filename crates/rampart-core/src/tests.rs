//! Tests for the shared vocabulary: boundary parsing, catalog
//! tables, geometry helpers, and the wire shape of events and snapshots.

use std::str::FromStr;

use crate::catalog::{building_defaults, troop_stats};
use crate::constants::*;
use crate::enums::*;
use crate::errors::DeployError;
use crate::events::{BattleEvent, BattleEventKind, Projectile};
use crate::state::{BattleSnapshot, BuildingRecord, BuildingView};
use crate::types::{BattleClock, Position};

#[test]
fn test_troop_kind_parse_case_insensitive() {
    assert_eq!(TroopKind::from_str("barbarian"), Ok(TroopKind::Barbarian));
    assert_eq!(TroopKind::from_str("ARCHER"), Ok(TroopKind::Archer));
    assert_eq!(TroopKind::from_str(" Giant "), Ok(TroopKind::Giant));
    assert_eq!(
        TroopKind::from_str("wall_breaker"),
        Ok(TroopKind::WallBreaker)
    );
    assert_eq!(
        TroopKind::from_str("WallBreaker"),
        Ok(TroopKind::WallBreaker)
    );
    assert!(TroopKind::from_str("dragon").is_err());
    assert!(TroopKind::from_str("").is_err());
}

#[test]
fn test_building_kind_parse() {
    assert_eq!(
        BuildingKind::from_str("town_hall"),
        Ok(BuildingKind::TownHall)
    );
    assert_eq!(BuildingKind::from_str("WALL"), Ok(BuildingKind::Wall));
    assert_eq!(
        BuildingKind::from_str("ArcherTower"),
        Ok(BuildingKind::ArcherTower)
    );
    assert!(BuildingKind::from_str("inferno_tower").is_err());
}

#[test]
fn test_wall_and_defense_classification() {
    assert!(BuildingKind::Wall.is_wall());
    assert!(!BuildingKind::Cannon.is_wall());
    assert!(BuildingKind::Cannon.is_defense());
    assert!(BuildingKind::ArcherTower.is_defense());
    assert!(BuildingKind::Mortar.is_defense());
    assert!(!BuildingKind::GoldMine.is_defense());
    assert!(!BuildingKind::Wall.is_defense());
}

#[test]
fn test_troop_capability_flags() {
    // The over-wall and suicide behaviors are capability flags in the
    // catalog, not kind-name checks in systems.
    let archer = troop_stats(TroopKind::Archer);
    assert!(archer.projectile);
    assert!(archer.over_walls);
    assert!(!archer.suicide);

    let breaker = troop_stats(TroopKind::WallBreaker);
    assert!(breaker.suicide);
    assert!(!breaker.over_walls);
    assert_eq!(breaker.preference, TargetPreference::Walls);

    let giant = troop_stats(TroopKind::Giant);
    assert_eq!(giant.preference, TargetPreference::Defenses);

    for kind in TroopKind::ALL {
        let stats = troop_stats(kind);
        assert!(stats.max_hp > 0.0);
        assert!(stats.damage > 0.0);
        assert!(stats.speed > 0.0);
        assert!(stats.range > 0.0);
    }
}

#[test]
fn test_catalog_building_defaults() {
    let wall = building_defaults(BuildingKind::Wall);
    assert_eq!(wall.width, 1.0);
    assert_eq!(wall.height, 1.0);
    assert!(wall.defense.is_none());

    let cannon = building_defaults(BuildingKind::Cannon);
    let spec = cannon.defense.expect("cannon must shoot back");
    assert!(spec.targets.hits_ground());
    assert!(spec.attack_speed > 0.0);

    let town_hall = building_defaults(BuildingKind::TownHall);
    assert_eq!(town_hall.max_hp, TOWN_HALL_HP);
    assert!(town_hall.defense.is_none());
}

#[test]
fn test_position_step_toward() {
    let from = Position::new(0.0, 0.0);
    let to = Position::new(10.0, 0.0);

    let step = from.step_toward(&to, 2.0);
    assert!((step.x - 2.0).abs() < 1e-9);
    assert_eq!(step.y, 0.0);

    // Never overshoots.
    let arrived = from.step_toward(&to, 50.0);
    assert_eq!(arrived, to);
    // Zero-length moves are stable.
    assert_eq!(from.step_toward(&from, 1.0), from);
}

#[test]
fn test_battle_clock_advance() {
    let mut clock = BattleClock::default();
    clock.advance(0.1);
    clock.advance(0.25);
    assert_eq!(clock.tick, 2);
    assert!((clock.elapsed_secs - 0.35).abs() < 1e-9);
}

#[test]
fn test_event_wire_shape() {
    let event = BattleEvent {
        timestamp: 1_700_000_000_000,
        kind: BattleEventKind::TroopAttack {
            troop_id: 3,
            building_id: 7,
            damage: 7.0,
            remaining_health: 113.0,
            projectile: Some(Projectile {
                from: Position::new(1.0, 2.0),
                to: Position::new(4.0, 5.0),
            }),
        },
    };

    let json: serde_json::Value = serde_json::to_value(&event).unwrap();
    assert_eq!(json["type"], "TROOP_ATTACK");
    assert_eq!(json["timestamp"], 1_700_000_000_000u64);
    assert_eq!(json["data"]["troopId"], 3);
    assert_eq!(json["data"]["buildingId"], 7);
    assert_eq!(json["data"]["remainingHealth"], 113.0);
    assert_eq!(json["data"]["projectile"]["from"]["x"], 1.0);
}

#[test]
fn test_move_event_omits_absent_projectile() {
    let kind = BattleEventKind::TroopAttack {
        troop_id: 1,
        building_id: 2,
        damage: 8.0,
        remaining_health: 0.0,
        projectile: None,
    };
    let json: serde_json::Value = serde_json::to_value(&kind).unwrap();
    assert!(json["data"].get("projectile").is_none());
}

#[test]
fn test_battle_end_event_fields() {
    let kind = BattleEventKind::BattleEnd {
        destruction_percentage: 100,
        stars: 3,
        duration: 42.5,
        loot_gold: 1000,
        loot_elixir: 800,
    };
    let json: serde_json::Value = serde_json::to_value(&kind).unwrap();
    assert_eq!(json["type"], "BATTLE_END");
    assert_eq!(json["data"]["destructionPercentage"], 100);
    assert_eq!(json["data"]["lootGold"], 1000);
    assert_eq!(json["data"]["lootElixir"], 800);
}

#[test]
fn test_event_kinds_round_trip() {
    let kinds = vec![
        BattleEventKind::TroopSpawn {
            troop_id: 1,
            troop_type: TroopKind::Barbarian,
            position: Position::new(0.0, 0.0),
            health: 45.0,
        },
        BattleEventKind::TroopMove {
            troop_id: 1,
            from: Position::new(0.0, 0.0),
            to: Position::new(0.2, 0.0),
        },
        BattleEventKind::BuildingAttack {
            building_id: 4,
            troop_id: 1,
            damage: 11.0,
            remaining_health: 34.0,
            projectile: None,
        },
        BattleEventKind::BuildingDestroyed {
            building_id: 4,
            building_type: BuildingKind::Cannon,
            position: Position::new(10.0, 10.0),
        },
        BattleEventKind::TroopDeath {
            troop_id: 1,
            troop_type: TroopKind::WallBreaker,
            position: Position::new(5.0, 5.0),
            killed_by: 9,
        },
    ];
    for kind in kinds {
        let json = serde_json::to_string(&kind).unwrap();
        let _back: BattleEventKind = serde_json::from_str(&json).unwrap();
    }
}

#[test]
fn test_building_record_defaults() {
    let json = r#"{"id":5,"type":"CANNON","position":{"x":10.0,"y":12.0}}"#;
    let record: BuildingRecord = serde_json::from_str(json).unwrap();
    assert_eq!(record.kind, BuildingKind::Cannon);
    assert!(record.width.is_none());
    assert_eq!(record.resolved_max_hp(), CANNON_HP);

    let explicit = BuildingRecord {
        max_hp: Some(999.0),
        ..BuildingRecord::new(6, BuildingKind::Cannon, Position::new(0.0, 0.0))
    };
    assert_eq!(explicit.resolved_max_hp(), 999.0);
}

#[test]
fn test_snapshot_serialization() {
    let snapshot = BattleSnapshot {
        session_id: "battle-1".into(),
        buildings: vec![BuildingView {
            id: 1,
            kind: BuildingKind::TownHall,
            position: Position::new(20.0, 20.0),
            width: 4.0,
            height: 4.0,
            hp: 1500.0,
            max_hp: 1500.0,
            destroyed: false,
        }],
        troop_budget: 20,
    };
    let json: serde_json::Value = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(json["sessionId"], "battle-1");
    assert_eq!(json["troopBudget"], 20);
    assert_eq!(json["buildings"][0]["type"], "TOWN_HALL");
    assert_eq!(json["buildings"][0]["maxHp"], 1500.0);
}

#[test]
fn test_deploy_error_codes() {
    assert_eq!(DeployError::NotFound.code(), "NOT_FOUND");
    assert_eq!(DeployError::CapacityExceeded.code(), "CAPACITY_EXCEEDED");
    assert_eq!(DeployError::InvalidType.code(), "INVALID_TYPE");
    assert_eq!(DeployError::NotAttacker.code(), "NOT_ATTACKER");
}

#[test]
fn test_battle_status_serde() {
    for status in [
        BattleStatus::Waiting,
        BattleStatus::Active,
        BattleStatus::Completed,
    ] {
        let json = serde_json::to_string(&status).unwrap();
        let back: BattleStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(status, back);
    }
    assert_eq!(
        serde_json::to_string(&BattleStatus::Waiting).unwrap(),
        "\"WAITING\""
    );
}
