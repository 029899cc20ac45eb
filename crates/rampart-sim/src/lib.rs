//! Battle simulation engine for RAMPART.
//!
//! Owns the hecs ECS world for one encounter, runs the per-tick systems
//! (targeting, movement, combat, defense retaliation, cleanup, scoring),
//! and buffers wire events. Completely headless (no threads, no I/O),
//! enabling deterministic testing; the session layer drives it.

pub mod engine;
pub mod nav;
pub mod systems;
pub mod world_setup;

pub use engine::{BattleConfig, BattleEngine};
