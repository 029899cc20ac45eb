//! Rejection taxonomy for externally triggered operations.

use thiserror::Error;

/// Why a deploy request was rejected. No state changes on rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DeployError {
    /// Unknown session id, or the session already completed. Whether that
    /// means "never existed" or "already ended" is the caller's call.
    #[error("session not found")]
    NotFound,
    /// The deployed-troop count already reached the troop budget.
    #[error("troop budget exhausted")]
    CapacityExceeded,
    /// The troop type is not in the closed enumeration.
    #[error("unknown troop type")]
    InvalidType,
    /// The requester is not the session's attacker.
    #[error("only the attacker may deploy troops")]
    NotAttacker,
}

impl DeployError {
    /// Stable wire code for the rejection.
    pub fn code(&self) -> &'static str {
        match self {
            DeployError::NotFound => "NOT_FOUND",
            DeployError::CapacityExceeded => "CAPACITY_EXCEEDED",
            DeployError::InvalidType => "INVALID_TYPE",
            DeployError::NotAttacker => "NOT_ATTACKER",
        }
    }
}
