//! Tests for the session layer: registry boundary checks, the tick-loop
//! lifecycle, event fan-out, and outcome settlement.
//!
//! Timing-sensitive assertions poll against a deadline instead of
//! sleeping fixed amounts, so they stay robust on slow CI hosts.

use std::sync::mpsc::Receiver;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use rampart_core::enums::{BattleStatus, BuildingKind, TroopKind};
use rampart_core::errors::DeployError;
use rampart_core::events::{BattleEvent, BattleEventKind};
use rampart_core::state::BuildingRecord;
use rampart_core::types::Position;
use rampart_sim::engine::BattleConfig;

use crate::outcome::{BattleResultsSink, CollaboratorError, Loot};
use crate::registry::{BattleRegistry, CreateSessionRequest};
use crate::session::SessionConfig;

const DEADLINE: Duration = Duration::from_secs(5);

fn fast_config() -> SessionConfig {
    SessionConfig {
        tick_interval: Duration::from_millis(5),
        grace_period: Duration::from_millis(50),
        battle: BattleConfig::default(),
    }
}

/// A village that falls to a single hit: one town hall with 1 hp.
fn one_hit_village() -> Vec<BuildingRecord> {
    let mut town_hall = BuildingRecord::new(1, BuildingKind::TownHall, Position::new(20.0, 20.0));
    town_hall.hp = Some(1.0);
    town_hall.max_hp = Some(1.0);
    vec![town_hall]
}

fn request(session_id: &str, buildings: Vec<BuildingRecord>) -> CreateSessionRequest {
    CreateSessionRequest {
        session_id: session_id.to_string(),
        attacker_id: "attacker-1".to_string(),
        attacker_village_id: "village-a".to_string(),
        defender_id: "defender-1".to_string(),
        defender_village_id: "village-d".to_string(),
        buildings,
        troop_budget: None,
    }
}

fn wait_for_battle_end(rx: &Receiver<BattleEvent>) -> BattleEvent {
    let deadline = Instant::now() + DEADLINE;
    loop {
        let remaining = deadline
            .checked_duration_since(Instant::now())
            .expect("timed out waiting for BATTLE_END");
        let event = rx
            .recv_timeout(remaining)
            .expect("event stream closed before BATTLE_END");
        if matches!(event.kind, BattleEventKind::BattleEnd { .. }) {
            return event;
        }
    }
}

struct FakeSink {
    calls: Mutex<Vec<(String, u32, u32)>>,
    loot: Loot,
}

impl FakeSink {
    fn new(loot: Loot) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            loot,
        }
    }
}

impl BattleResultsSink for FakeSink {
    fn update_battle_results(
        &self,
        session_id: &str,
        destruction_percentage: u32,
        stars: u32,
    ) -> Result<Loot, CollaboratorError> {
        self.calls
            .lock()
            .unwrap()
            .push((session_id.to_string(), destruction_percentage, stars));
        Ok(self.loot)
    }
}

struct FailingSink;

impl BattleResultsSink for FailingSink {
    fn update_battle_results(
        &self,
        _session_id: &str,
        _destruction_percentage: u32,
        _stars: u32,
    ) -> Result<Loot, CollaboratorError> {
        Err(CollaboratorError::Sink("results store unavailable".into()))
    }
}

// ---- Registry boundary checks ----

#[test]
fn test_create_session_returns_snapshot_with_defaults_filled() {
    let registry = BattleRegistry::default();
    let buildings = vec![
        BuildingRecord::new(1, BuildingKind::TownHall, Position::new(20.0, 20.0)),
        BuildingRecord::new(2, BuildingKind::Cannon, Position::new(10.0, 10.0)),
    ];
    let snapshot = registry.create_session(request("battle-1", buildings));

    assert_eq!(snapshot.session_id, "battle-1");
    assert_eq!(snapshot.buildings.len(), 2);
    assert_eq!(snapshot.troop_budget, 30);
    let town_hall = snapshot.buildings.iter().find(|b| b.id == 1).unwrap();
    assert_eq!(town_hall.max_hp, 1500.0);
    assert_eq!(town_hall.width, 4.0);

    let session = registry.session("battle-1").unwrap();
    assert_eq!(session.status(), BattleStatus::Waiting);
}

#[test]
fn test_troop_budget_override() {
    let registry = BattleRegistry::default();
    let mut req = request("battle-1", one_hit_village());
    req.troop_budget = Some(2);
    let snapshot = registry.create_session(req);
    assert_eq!(snapshot.troop_budget, 2);
}

#[test]
fn test_create_session_request_parses_camel_case_json() {
    let json = r#"{
        "sessionId": "battle-9",
        "attackerId": "attacker-1",
        "attackerVillageId": "village-a",
        "defenderId": "defender-1",
        "defenderVillageId": "village-d",
        "buildings": [{"id": 1, "type": "TOWN_HALL", "position": {"x": 20.0, "y": 20.0}}],
        "troopBudget": 12
    }"#;
    let req: CreateSessionRequest = serde_json::from_str(json).unwrap();
    assert_eq!(req.session_id, "battle-9");
    assert_eq!(req.attacker_id, "attacker-1");
    assert_eq!(req.buildings[0].kind, BuildingKind::TownHall);
    assert_eq!(req.troop_budget, Some(12));

    // troopBudget is optional on the wire.
    let without: CreateSessionRequest = serde_json::from_str(
        r#"{
            "sessionId": "battle-10",
            "attackerId": "a",
            "attackerVillageId": "av",
            "defenderId": "d",
            "defenderVillageId": "dv",
            "buildings": []
        }"#,
    )
    .unwrap();
    assert_eq!(without.troop_budget, None);
}

#[test]
fn test_deploy_unknown_session_rejected() {
    let registry = BattleRegistry::default();
    assert_eq!(
        registry.deploy_troop("missing", "attacker-1", "barbarian", Position::new(5.0, 5.0)),
        Err(DeployError::NotFound)
    );
}

#[test]
fn test_deploy_role_and_type_checked_at_boundary() {
    let registry = BattleRegistry::default();
    registry.create_session(request("battle-1", one_hit_village()));

    // Only the attacker may deploy, and the role check runs first.
    assert_eq!(
        registry.deploy_troop("battle-1", "defender-1", "dragon", Position::new(5.0, 5.0)),
        Err(DeployError::NotAttacker)
    );
    assert_eq!(
        registry.deploy_troop("battle-1", "attacker-1", "dragon", Position::new(5.0, 5.0)),
        Err(DeployError::InvalidType)
    );
    // Rejections leave the session untouched.
    assert_eq!(
        registry.session("battle-1").unwrap().status(),
        BattleStatus::Waiting
    );
}

#[test]
fn test_troop_type_parsed_case_insensitively() {
    let registry = BattleRegistry::new(fast_config());
    registry.create_session(request("battle-1", one_hit_village()));
    let deployed = registry
        .deploy_troop("battle-1", "attacker-1", "WALL_BREAKER", Position::new(5.0, 5.0))
        .unwrap();
    assert_eq!(deployed.kind, TroopKind::WallBreaker);
}

// ---- Battle lifecycle ----

#[test]
fn test_battle_runs_to_completion_and_settles() {
    let sink = Arc::new(FakeSink::new(Loot {
        gold: 120,
        elixir: 80,
    }));
    let registry = BattleRegistry::new(fast_config()).with_results_sink(sink.clone());
    registry.create_session(request("battle-1", one_hit_village()));
    let session = registry.session("battle-1").unwrap();
    let attacker_rx = session.subscribe_attacker();

    let deployed = registry
        .deploy_troop("battle-1", "attacker-1", "barbarian", Position::new(21.8, 22.0))
        .unwrap();
    assert_eq!(deployed.troop_id, 1);

    let end = wait_for_battle_end(&attacker_rx);
    match end.kind {
        BattleEventKind::BattleEnd {
            destruction_percentage,
            stars,
            loot_gold,
            loot_elixir,
            ..
        } => {
            assert_eq!(destruction_percentage, 100);
            assert_eq!(stars, 3);
            assert_eq!(loot_gold, 120);
            assert_eq!(loot_elixir, 80);
        }
        other => panic!("expected BATTLE_END, got {other:?}"),
    }

    let calls = sink.calls.lock().unwrap();
    assert_eq!(calls.as_slice(), &[("battle-1".to_string(), 100, 3)]);
}

#[test]
fn test_streamed_battle_end_keeps_wire_shape() {
    let registry = BattleRegistry::new(fast_config());
    registry.create_session(request("battle-1", one_hit_village()));
    let session = registry.session("battle-1").unwrap();
    let rx = session.subscribe_attacker();

    registry
        .deploy_troop("battle-1", "attacker-1", "barbarian", Position::new(21.8, 22.0))
        .unwrap();

    let end = wait_for_battle_end(&rx);
    let json: serde_json::Value = serde_json::to_value(&end).unwrap();
    assert_eq!(json["type"], "BATTLE_END");
    assert!(json["timestamp"].is_u64());
    assert_eq!(json["data"]["destructionPercentage"], 100);
    assert_eq!(json["data"]["stars"], 3);
}

#[test]
fn test_sink_failure_settles_with_zero_loot() {
    let registry = BattleRegistry::new(fast_config()).with_results_sink(Arc::new(FailingSink));
    registry.create_session(request("battle-1", one_hit_village()));
    let session = registry.session("battle-1").unwrap();
    let rx = session.subscribe_attacker();

    registry
        .deploy_troop("battle-1", "attacker-1", "barbarian", Position::new(21.8, 22.0))
        .unwrap();

    let end = wait_for_battle_end(&rx);
    match end.kind {
        BattleEventKind::BattleEnd {
            destruction_percentage,
            loot_gold,
            loot_elixir,
            ..
        } => {
            // The battle outcome itself is unaffected by the sink failure.
            assert_eq!(destruction_percentage, 100);
            assert_eq!(loot_gold, 0);
            assert_eq!(loot_elixir, 0);
        }
        other => panic!("expected BATTLE_END, got {other:?}"),
    }
}

// ---- Event fan-out ----

#[test]
fn test_spectator_channels_deliver_independently() {
    let registry = BattleRegistry::new(fast_config());
    registry.create_session(request("battle-1", one_hit_village()));
    let session = registry.session("battle-1").unwrap();

    let spectator_a = session.subscribe_spectator();
    let spectator_b = session.subscribe_spectator();
    // An attacker subscriber that disconnects immediately; its departure
    // must not disturb the spectators.
    drop(session.subscribe_attacker());

    registry
        .deploy_troop("battle-1", "attacker-1", "barbarian", Position::new(21.8, 22.0))
        .unwrap();

    for rx in [&spectator_a, &spectator_b] {
        let end = wait_for_battle_end(rx);
        assert!(matches!(end.kind, BattleEventKind::BattleEnd { .. }));
    }
}

#[test]
fn test_attacker_stream_carries_spawn_before_end() {
    let registry = BattleRegistry::new(fast_config());
    registry.create_session(request("battle-1", one_hit_village()));
    let session = registry.session("battle-1").unwrap();
    let rx = session.subscribe_attacker();

    registry
        .deploy_troop("battle-1", "attacker-1", "barbarian", Position::new(21.8, 22.0))
        .unwrap();

    let deadline = Instant::now() + DEADLINE;
    let mut saw_spawn = false;
    loop {
        let remaining = deadline
            .checked_duration_since(Instant::now())
            .expect("timed out waiting for events");
        let event = rx.recv_timeout(remaining).expect("stream closed early");
        match event.kind {
            BattleEventKind::TroopSpawn { troop_id: 1, .. } => saw_spawn = true,
            BattleEventKind::BattleEnd { .. } => break,
            _ => {}
        }
    }
    assert!(saw_spawn, "TROOP_SPAWN must precede BATTLE_END");
}

// ---- Eviction ----

#[test]
fn test_completed_session_evicted_after_grace_period() {
    let registry = BattleRegistry::new(fast_config());
    registry.create_session(request("battle-1", one_hit_village()));
    let session = registry.session("battle-1").unwrap();
    let rx = session.subscribe_attacker();

    registry
        .deploy_troop("battle-1", "attacker-1", "barbarian", Position::new(21.8, 22.0))
        .unwrap();
    wait_for_battle_end(&rx);

    // Completed but not yet evicted: further deploys are rejected as if
    // the session had already ended.
    if registry.session("battle-1").is_some() {
        let rejected =
            registry.deploy_troop("battle-1", "attacker-1", "barbarian", Position::new(5.0, 5.0));
        assert_eq!(rejected, Err(DeployError::NotFound));
    }

    let deadline = Instant::now() + DEADLINE;
    while registry.session("battle-1").is_some() {
        assert!(Instant::now() < deadline, "session was never evicted");
        std::thread::sleep(Duration::from_millis(5));
    }
    assert_eq!(registry.session_count(), 0);
}
