//! Battle session layer for RAMPART.
//!
//! Hosts concurrent battle sessions around the headless engine: a
//! registry keyed by session id, a paced tick-loop thread per active
//! battle, attacker and spectator event channels, and outcome settlement
//! against pluggable collaborators. This crate is an embeddable library;
//! transports and persistence live with the embedding service.

pub mod broadcast;
pub mod outcome;
pub mod registry;
pub mod session;

pub use broadcast::EventBroadcaster;
pub use outcome::{BattleResultsSink, CollaboratorError, DefenderNotifier, Loot};
pub use registry::{BattleRegistry, CreateSessionRequest};
pub use session::{BattleSession, SessionConfig};

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Lock a mutex, recovering from poisoning. A panicked tick thread must
/// not brick the registry or other sessions.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests;
