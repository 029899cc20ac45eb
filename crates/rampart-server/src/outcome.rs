//! Outcome settlement against external collaborators.
//!
//! When a battle completes, the session layer reports the score to a
//! results sink (the orchestration service persisting trophies and loot)
//! and folds the awarded loot into the final `BATTLE_END` event. A sink
//! failure never fails the battle: it is logged and settled as zero loot.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use rampart_sim::engine::BattleOutcome;

/// Resources awarded to the attacker for a completed battle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Loot {
    pub gold: u32,
    pub elixir: u32,
}

/// Failure reported by an external collaborator.
#[derive(Debug, Error)]
pub enum CollaboratorError {
    #[error("results sink failure: {0}")]
    Sink(String),
    #[error("defender notifier failure: {0}")]
    Notifier(String),
}

/// Persists the result of a completed battle and returns the loot award.
pub trait BattleResultsSink: Send + Sync {
    fn update_battle_results(
        &self,
        session_id: &str,
        destruction_percentage: u32,
        stars: u32,
    ) -> Result<Loot, CollaboratorError>;
}

/// Optional hook fired once when a session is created, so the defender's
/// side can be told their village is under attack.
pub trait DefenderNotifier: Send + Sync {
    fn battle_started(
        &self,
        session_id: &str,
        attacker_id: &str,
        defender_id: &str,
    ) -> Result<(), CollaboratorError>;
}

/// Report the outcome to the sink, falling back to zero loot on failure
/// (or when no sink is configured).
pub(crate) fn settle(
    sink: Option<&dyn BattleResultsSink>,
    session_id: &str,
    outcome: &BattleOutcome,
) -> Loot {
    let Some(sink) = sink else {
        return Loot::default();
    };
    match sink.update_battle_results(session_id, outcome.destruction_percentage, outcome.stars) {
        Ok(loot) => loot,
        Err(err) => {
            warn!(session_id, %err, "results sink failed, settling with zero loot");
            Loot::default()
        }
    }
}
