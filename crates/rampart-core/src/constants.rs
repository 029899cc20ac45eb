//! Battle tuning parameters and fixed protocol numbers.

/// Tick interval of the per-session loop (milliseconds).
pub const TICK_INTERVAL_MS: u64 = 100;

/// Simulated seconds per tick.
pub const DT: f64 = TICK_INTERVAL_MS as f64 / 1000.0;

/// Hard cap on battle duration (seconds).
pub const MAX_BATTLE_DURATION_SECS: f64 = 180.0;

/// Grace period after completion before the session is evicted (seconds),
/// allowing last-moment event delivery and late joiners.
pub const SESSION_GRACE_PERIOD_SECS: u64 = 30;

// --- Map ---

/// Village map is MAP_SIZE x MAP_SIZE tiles.
pub const MAP_SIZE: usize = 44;

/// A waypoint counts as reached within this distance (tiles).
pub const WAYPOINT_EPSILON: f64 = 0.1;

/// Sample step for wall line-of-sight ray traversal (tiles).
pub const LOS_SAMPLE_STEP: f64 = 0.25;

// --- Scoring ---

/// Destruction percentage for one star.
pub const STAR_1_THRESHOLD: u32 = 50;

/// Destruction percentage for two stars.
pub const STAR_2_THRESHOLD: u32 = 70;

/// Destruction percentage for three stars.
pub const STAR_3_THRESHOLD: u32 = 100;

// --- Broadcast ---

/// Probability that any given TROOP_MOVE event is forwarded to
/// subscribers. Presentation throttle only; simulation state is
/// unaffected.
pub const MOVE_BROADCAST_PROBABILITY: f64 = 0.5;

// --- Troop stats ---

pub const BARBARIAN_HP: f64 = 45.0;
pub const BARBARIAN_DAMAGE: f64 = 8.0;
pub const BARBARIAN_SPEED: f64 = 2.0;
pub const BARBARIAN_RANGE: f64 = 0.6;

pub const ARCHER_HP: f64 = 20.0;
pub const ARCHER_DAMAGE: f64 = 7.0;
pub const ARCHER_SPEED: f64 = 2.4;
pub const ARCHER_RANGE: f64 = 3.5;

pub const GIANT_HP: f64 = 300.0;
pub const GIANT_DAMAGE: f64 = 11.0;
pub const GIANT_SPEED: f64 = 1.2;
pub const GIANT_RANGE: f64 = 0.6;

pub const WALL_BREAKER_HP: f64 = 20.0;
pub const WALL_BREAKER_DAMAGE: f64 = 60.0;
pub const WALL_BREAKER_SPEED: f64 = 3.0;
pub const WALL_BREAKER_RANGE: f64 = 0.6;

// --- Building defaults ---

pub const TOWN_HALL_HP: f64 = 1500.0;
pub const CANNON_HP: f64 = 420.0;
pub const ARCHER_TOWER_HP: f64 = 380.0;
pub const MORTAR_HP: f64 = 400.0;
pub const GOLD_MINE_HP: f64 = 400.0;
pub const ELIXIR_COLLECTOR_HP: f64 = 400.0;
pub const ARMY_CAMP_HP: f64 = 250.0;
pub const WALL_HP: f64 = 300.0;

pub const CANNON_DAMAGE: f64 = 11.0;
pub const CANNON_RANGE: f64 = 9.0;
pub const CANNON_ATTACK_SPEED: f64 = 1.25;

pub const ARCHER_TOWER_DAMAGE: f64 = 11.0;
pub const ARCHER_TOWER_RANGE: f64 = 10.0;
pub const ARCHER_TOWER_ATTACK_SPEED: f64 = 2.0;

pub const MORTAR_DAMAGE: f64 = 20.0;
pub const MORTAR_RANGE: f64 = 11.0;
pub const MORTAR_ATTACK_SPEED: f64 = 0.2;
