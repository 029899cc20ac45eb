//! One live battle: engine, viewers, and the thread that drives it.
//!
//! The engine is wrapped in a mutex so deploys coming from request
//! handlers serialize against the tick thread; both critical sections are
//! short and never do I/O. The tick loop is a dedicated named thread per
//! session, paced on absolute next-tick instants with a catch-up reset so
//! a stalled host doesn't trigger a tick spiral.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Receiver;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tracing::{debug, info};

use rampart_core::constants::{SESSION_GRACE_PERIOD_SECS, TICK_INTERVAL_MS};
use rampart_core::enums::{BattleStatus, TroopKind};
use rampart_core::errors::DeployError;
use rampart_core::events::{BattleEvent, BattleEventKind};
use rampart_core::state::{BattleSnapshot, BuildingRecord, DeployedTroop};
use rampart_core::types::Position;
use rampart_sim::engine::{BattleConfig, BattleEngine};

use crate::broadcast::EventBroadcaster;
use crate::outcome::{self, BattleResultsSink};
use crate::lock;

/// Session-layer tuning. Engine tuning lives in [`BattleConfig`].
#[derive(Debug, Clone, Copy)]
pub struct SessionConfig {
    /// Wall-clock pacing of the tick loop.
    pub tick_interval: Duration,
    /// How long a completed session stays queryable before eviction.
    pub grace_period: Duration,
    pub battle: BattleConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(TICK_INTERVAL_MS),
            grace_period: Duration::from_secs(SESSION_GRACE_PERIOD_SECS),
            battle: BattleConfig::default(),
        }
    }
}

/// Aggregate root for one battle.
pub struct BattleSession {
    pub id: String,
    pub attacker_id: String,
    pub attacker_village_id: String,
    pub defender_id: String,
    pub defender_village_id: String,
    engine: Mutex<BattleEngine>,
    broadcaster: EventBroadcaster,
    loop_started: AtomicBool,
    config: SessionConfig,
}

impl BattleSession {
    pub(crate) fn new(
        id: String,
        attacker_id: String,
        attacker_village_id: String,
        defender_id: String,
        defender_village_id: String,
        buildings: &[BuildingRecord],
        config: SessionConfig,
    ) -> Self {
        Self {
            id,
            attacker_id,
            attacker_village_id,
            defender_id,
            defender_village_id,
            engine: Mutex::new(BattleEngine::new(buildings, config.battle)),
            broadcaster: EventBroadcaster::new(),
            loop_started: AtomicBool::new(false),
            config,
        }
    }

    pub fn status(&self) -> BattleStatus {
        lock(&self.engine).status()
    }

    /// Initial state for client rendering.
    pub fn snapshot(&self) -> BattleSnapshot {
        let engine = lock(&self.engine);
        BattleSnapshot {
            session_id: self.id.clone(),
            buildings: engine.building_views(),
            troop_budget: engine.troop_budget(),
        }
    }

    pub fn subscribe_attacker(&self) -> Receiver<BattleEvent> {
        self.broadcaster.subscribe_attacker()
    }

    pub fn subscribe_spectator(&self) -> Receiver<BattleEvent> {
        self.broadcaster.subscribe_spectator()
    }

    pub(crate) fn deploy(
        &self,
        kind: TroopKind,
        position: Position,
    ) -> Result<DeployedTroop, DeployError> {
        lock(&self.engine).deploy(kind, position)
    }

    /// Returns true exactly once, for the caller that must start the loop.
    pub(crate) fn claim_loop_start(&self) -> bool {
        !self.loop_started.swap(true, Ordering::SeqCst)
    }
}

type SessionMap = Arc<Mutex<HashMap<String, Arc<BattleSession>>>>;

/// Start the tick-loop thread for a session whose first troop just landed.
pub(crate) fn spawn_tick_loop(
    session: Arc<BattleSession>,
    sink: Option<Arc<dyn BattleResultsSink>>,
    sessions: SessionMap,
) {
    let name = format!("rampart-battle-{}", session.id);
    std::thread::Builder::new()
        .name(name)
        .spawn(move || run_tick_loop(session, sink, sessions))
        .expect("Failed to spawn battle tick loop thread");
}

/// The tick loop. Runs until the engine reports completion, then settles
/// the outcome and schedules eviction.
fn run_tick_loop(
    session: Arc<BattleSession>,
    sink: Option<Arc<dyn BattleResultsSink>>,
    sessions: SessionMap,
) {
    let tick_interval = session.config.tick_interval;
    let mut next_tick_time = Instant::now() + tick_interval;

    loop {
        let now = Instant::now();
        if next_tick_time > now {
            std::thread::sleep(next_tick_time - now);
        } else if now - next_tick_time > tick_interval * 2 {
            // Too far behind, reset to avoid a catch-up spiral.
            next_tick_time = now;
        }
        next_tick_time += tick_interval;

        // Short critical section: tick and drain, publish outside it.
        let (events, complete) = {
            let mut engine = lock(&session.engine);
            engine.tick();
            (engine.take_events(), engine.is_complete())
        };
        session.broadcaster.publish(&events);

        if complete {
            break;
        }
    }

    finalize(&session, sink.as_deref());
    schedule_eviction(session, sessions);
}

/// Settle the completed battle: report to the sink, then close the event
/// stream with `BATTLE_END` carrying the awarded loot.
fn finalize(session: &BattleSession, sink: Option<&dyn BattleResultsSink>) {
    let outcome = lock(&session.engine).outcome();
    let loot = outcome::settle(sink, &session.id, &outcome);

    let end = BattleEvent {
        timestamp: (outcome.duration_secs * 1000.0).round() as u64,
        kind: BattleEventKind::BattleEnd {
            destruction_percentage: outcome.destruction_percentage,
            stars: outcome.stars,
            duration: outcome.duration_secs,
            loot_gold: loot.gold,
            loot_elixir: loot.elixir,
        },
    };
    session.broadcaster.publish(&[end]);

    info!(
        session_id = %session.id,
        destruction = outcome.destruction_percentage,
        stars = outcome.stars,
        duration_secs = outcome.duration_secs,
        "battle completed"
    );
}

/// Keep the completed session queryable for the grace period, then drop
/// it from the registry.
fn schedule_eviction(session: Arc<BattleSession>, sessions: SessionMap) {
    let name = format!("rampart-evict-{}", session.id);
    std::thread::Builder::new()
        .name(name)
        .spawn(move || {
            std::thread::sleep(session.config.grace_period);
            lock(&sessions).remove(&session.id);
            debug!(session_id = %session.id, "session evicted after grace period");
        })
        .expect("Failed to spawn eviction thread");
}
