//! Fundamental geometric and timing types.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// 2D position in village space (tiles, continuous).
/// x grows East, y grows South; (0,0) is the map's North-West corner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another position in tiles.
    pub fn distance_to(&self, other: &Position) -> f64 {
        self.as_dvec2().distance(other.as_dvec2())
    }

    /// Move up to `max_step` tiles toward `target`, without overshooting.
    pub fn step_toward(&self, target: &Position, max_step: f64) -> Position {
        let here = self.as_dvec2();
        let there = target.as_dvec2();
        let delta = there - here;
        let dist = delta.length();
        if dist <= max_step || dist < f64::EPSILON {
            *target
        } else {
            Position::from_dvec2(here + delta * (max_step / dist))
        }
    }

    pub fn as_dvec2(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    pub fn from_dvec2(v: DVec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

/// Battle time tracking. Advanced by the configured tick delta, so the
/// simulation is deterministic regardless of scheduler jitter in the
/// loop that drives it.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct BattleClock {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed battle time in seconds.
    pub elapsed_secs: f64,
}

impl BattleClock {
    /// Advance by one tick of `dt` seconds.
    pub fn advance(&mut self, dt: f64) {
        self.tick += 1;
        self.elapsed_secs += dt;
    }
}
