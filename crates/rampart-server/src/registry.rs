//! Registry of live battle sessions.
//!
//! The registry mutex guards only the id→session map; engine work happens
//! under each session's own lock, so one battle's tick never contends
//! with another's deploys or with session creation.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use tracing::{debug, info, warn};

use rampart_core::enums::TroopKind;
use rampart_core::errors::DeployError;
use rampart_core::state::{BattleSnapshot, BuildingRecord, DeployedTroop};
use rampart_core::types::Position;
use serde::Deserialize;

use crate::lock;
use crate::outcome::{BattleResultsSink, DefenderNotifier};
use crate::session::{self, BattleSession, SessionConfig};

/// Everything the orchestration collaborator supplies to open a battle.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    pub session_id: String,
    pub attacker_id: String,
    pub attacker_village_id: String,
    pub defender_id: String,
    pub defender_village_id: String,
    pub buildings: Vec<BuildingRecord>,
    #[serde(default)]
    pub troop_budget: Option<u32>,
}

pub struct BattleRegistry {
    sessions: Arc<Mutex<HashMap<String, Arc<BattleSession>>>>,
    config: SessionConfig,
    results_sink: Option<Arc<dyn BattleResultsSink>>,
    defender_notifier: Option<Arc<dyn DefenderNotifier>>,
}

impl BattleRegistry {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            config,
            results_sink: None,
            defender_notifier: None,
        }
    }

    pub fn with_results_sink(mut self, sink: Arc<dyn BattleResultsSink>) -> Self {
        self.results_sink = Some(sink);
        self
    }

    pub fn with_defender_notifier(mut self, notifier: Arc<dyn DefenderNotifier>) -> Self {
        self.defender_notifier = Some(notifier);
        self
    }

    /// Open a session over the defender's village snapshot. The session
    /// stays `Waiting` until the attacker's first deploy.
    pub fn create_session(&self, request: CreateSessionRequest) -> BattleSnapshot {
        let mut config = self.config;
        if let Some(budget) = request.troop_budget {
            config.battle.troop_budget = budget;
        }

        let session = Arc::new(BattleSession::new(
            request.session_id.clone(),
            request.attacker_id,
            request.attacker_village_id,
            request.defender_id.clone(),
            request.defender_village_id,
            &request.buildings,
            config,
        ));
        lock(&self.sessions).insert(request.session_id.clone(), Arc::clone(&session));

        info!(
            session_id = %request.session_id,
            attacker_id = %session.attacker_id,
            defender_id = %session.defender_id,
            buildings = request.buildings.len(),
            "battle session created"
        );

        if let Some(notifier) = &self.defender_notifier {
            if let Err(err) =
                notifier.battle_started(&request.session_id, &session.attacker_id, &request.defender_id)
            {
                warn!(session_id = %request.session_id, %err, "defender notification failed");
            }
        }

        session.snapshot()
    }

    /// Look up a live session. Absence is not an error; completed sessions
    /// disappear once their grace period runs out.
    pub fn session(&self, session_id: &str) -> Option<Arc<BattleSession>> {
        lock(&self.sessions).get(session_id).cloned()
    }

    pub fn remove(&self, session_id: &str) {
        lock(&self.sessions).remove(session_id);
    }

    pub fn session_count(&self) -> usize {
        lock(&self.sessions).len()
    }

    /// Deploy a troop on behalf of `requester_id`. Boundary checks happen
    /// here (existence, role, type parsing); budget and lifecycle checks
    /// are the engine's. The first successful deploy of a session starts
    /// its tick loop.
    pub fn deploy_troop(
        &self,
        session_id: &str,
        requester_id: &str,
        troop_type: &str,
        position: Position,
    ) -> Result<DeployedTroop, DeployError> {
        let session = self.session(session_id).ok_or(DeployError::NotFound)?;
        if session.attacker_id != requester_id {
            return Err(DeployError::NotAttacker);
        }
        let kind = TroopKind::from_str(troop_type).map_err(|_| DeployError::InvalidType)?;

        let deployed = session.deploy(kind, position)?;
        debug!(
            session_id,
            troop_id = deployed.troop_id,
            troop_type = %kind,
            "troop deployed"
        );

        if session.claim_loop_start() {
            session::spawn_tick_loop(
                Arc::clone(&session),
                self.results_sink.clone(),
                Arc::clone(&self.sessions),
            );
        }
        Ok(deployed)
    }
}

impl Default for BattleRegistry {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}
