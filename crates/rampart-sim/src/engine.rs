//! Headless battle engine.
//!
//! One `BattleEngine` owns the ECS world for a single encounter and is
//! advanced purely by calling [`BattleEngine::tick`]. It performs no I/O
//! and spawns no threads; emitted events accumulate in an internal buffer
//! until the caller drains them with [`BattleEngine::take_events`].

use hecs::{Entity, World};

use rampart_core::components::*;
use rampart_core::constants::{DT, MAP_SIZE, MAX_BATTLE_DURATION_SECS};
use rampart_core::enums::{BattleStatus, TroopKind, UnitState};
use rampart_core::errors::DeployError;
use rampart_core::events::{BattleEvent, BattleEventKind};
use rampart_core::state::{BuildingRecord, BuildingView, DeployedTroop};
use rampart_core::types::{BattleClock, Position};

use crate::nav::NavGrid;
use crate::systems;
use crate::world_setup;

/// Tunable limits for one battle. Defaults come from the balance
/// constants; tests shrink them to force end conditions quickly.
#[derive(Debug, Clone, Copy)]
pub struct BattleConfig {
    /// Maximum number of troops the attacker may deploy.
    pub troop_budget: u32,
    /// Battle-clock seconds before a timeout ends the battle.
    pub max_battle_secs: f64,
    /// Simulated seconds per tick.
    pub dt: f64,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            troop_budget: 30,
            max_battle_secs: MAX_BATTLE_DURATION_SECS,
            dt: DT,
        }
    }
}

/// Final score of a completed battle. Loot is attached by the
/// orchestration layer; the engine only knows destruction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BattleOutcome {
    pub destruction_percentage: u32,
    pub stars: u32,
    pub duration_secs: f64,
}

pub struct BattleEngine {
    world: World,
    clock: BattleClock,
    status: BattleStatus,
    config: BattleConfig,
    events: Vec<BattleEvent>,
    tick_events: Vec<BattleEventKind>,
    despawn_buffer: Vec<Entity>,
    next_troop_id: u32,
    troops_deployed: u32,
}

impl BattleEngine {
    pub fn new(buildings: &[BuildingRecord], config: BattleConfig) -> Self {
        let mut world = World::new();
        for record in buildings {
            world_setup::spawn_building(&mut world, record);
        }
        Self {
            world,
            clock: BattleClock::default(),
            status: BattleStatus::Waiting,
            config,
            events: Vec::new(),
            tick_events: Vec::new(),
            despawn_buffer: Vec::new(),
            next_troop_id: 1,
            troops_deployed: 0,
        }
    }

    /// Place one troop on the map. The first successful deploy flips the
    /// battle from `Waiting` to `Active`.
    pub fn deploy(
        &mut self,
        kind: TroopKind,
        position: Position,
    ) -> Result<DeployedTroop, DeployError> {
        if self.status == BattleStatus::Completed {
            return Err(DeployError::NotFound);
        }
        if self.troops_deployed >= self.config.troop_budget {
            return Err(DeployError::CapacityExceeded);
        }
        if !position.x.is_finite() || !position.y.is_finite() {
            return Err(DeployError::InvalidType);
        }

        let position = Position::new(
            position.x.clamp(0.0, MAP_SIZE as f64),
            position.y.clamp(0.0, MAP_SIZE as f64),
        );
        let troop_id = self.next_troop_id;
        self.next_troop_id += 1;
        self.troops_deployed += 1;

        world_setup::spawn_troop(&mut self.world, troop_id, kind, position);
        let health = rampart_core::catalog::troop_stats(kind).max_hp;
        self.stamp(BattleEventKind::TroopSpawn {
            troop_id,
            troop_type: kind,
            position,
            health,
        });

        if self.status == BattleStatus::Waiting {
            self.status = BattleStatus::Active;
        }

        Ok(DeployedTroop {
            troop_id,
            kind,
            position,
        })
    }

    /// Advance the simulation by one tick. A no-op unless the battle is
    /// `Active`, so a completed battle is frozen no matter how often the
    /// loop keeps calling in.
    pub fn tick(&mut self) {
        if self.status != BattleStatus::Active {
            return;
        }
        self.clock.advance(self.config.dt);

        // Wall layout may have changed last tick; rebuild the grid.
        let nav = NavGrid::from_world(&self.world);

        systems::targeting::run(&mut self.world, &nav);
        systems::movement::run(&mut self.world, &nav, self.config.dt, &mut self.tick_events);
        systems::troop_combat::run(&mut self.world, &mut self.tick_events);
        systems::defense::run(&mut self.world, self.clock.elapsed_secs, &mut self.tick_events);
        systems::cleanup::run(&mut self.world, &mut self.despawn_buffer);

        let timestamp = self.timestamp_ms();
        for kind in self.tick_events.drain(..) {
            self.events.push(BattleEvent { timestamp, kind });
        }

        self.check_end_conditions();
    }

    fn check_end_conditions(&mut self) {
        let destruction = systems::scoring::destruction_percentage(&self.world);
        let timed_out = self.clock.elapsed_secs >= self.config.max_battle_secs;
        let army_spent =
            self.living_troop_count() == 0 && self.troops_deployed >= self.config.troop_budget;

        if destruction >= 100 || timed_out || army_spent {
            self.status = BattleStatus::Completed;
        }
    }

    /// Drain the buffered events in emission order.
    pub fn take_events(&mut self) -> Vec<BattleEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn status(&self) -> BattleStatus {
        self.status
    }

    pub fn is_complete(&self) -> bool {
        self.status == BattleStatus::Completed
    }

    pub fn clock(&self) -> BattleClock {
        self.clock
    }

    pub fn troops_deployed(&self) -> u32 {
        self.troops_deployed
    }

    pub fn troop_budget(&self) -> u32 {
        self.config.troop_budget
    }

    pub fn living_troop_count(&self) -> u32 {
        let mut query = self.world.query::<(&Troop, &Hitpoints)>();
        query
            .iter()
            .filter(|(_, (troop, hitpoints))| {
                troop.state != UnitState::Dead && hitpoints.is_alive()
            })
            .count() as u32
    }

    pub fn destruction_percentage(&self) -> u32 {
        systems::scoring::destruction_percentage(&self.world)
    }

    pub fn outcome(&self) -> BattleOutcome {
        let destruction_percentage = self.destruction_percentage();
        BattleOutcome {
            destruction_percentage,
            stars: systems::scoring::stars_for(destruction_percentage),
            duration_secs: self.clock.elapsed_secs,
        }
    }

    /// Current building states for client rendering, in building-id order.
    pub fn building_views(&self) -> Vec<BuildingView> {
        let mut views: Vec<BuildingView> = Vec::new();
        let mut query = self
            .world
            .query::<(&Building, &Position, &Footprint, &Hitpoints)>();
        for (_, (building, position, footprint, hitpoints)) in query.iter() {
            views.push(BuildingView {
                id: building.id,
                kind: building.kind,
                position: *position,
                width: footprint.width,
                height: footprint.height,
                hp: hitpoints.hp,
                max_hp: hitpoints.max,
                destroyed: building.destroyed,
            });
        }
        views.sort_by_key(|v| v.id);
        views
    }

    fn stamp(&mut self, kind: BattleEventKind) {
        let timestamp = self.timestamp_ms();
        self.events.push(BattleEvent { timestamp, kind });
    }

    fn timestamp_ms(&self) -> u64 {
        (self.clock.elapsed_secs * 1000.0).round() as u64
    }

    #[cfg(test)]
    pub(crate) fn damage_building(&mut self, building_id: u32, amount: f64) {
        let entity = {
            let mut query = self.world.query::<&Building>();
            query
                .iter()
                .find(|(_, b)| b.id == building_id)
                .map(|(e, _)| e)
        };
        if let Some(entity) = entity {
            let destroyed = {
                let mut hitpoints = self.world.get::<&mut Hitpoints>(entity).unwrap();
                hitpoints.hp = (hitpoints.hp - amount).max(0.0);
                hitpoints.hp <= 0.0
            };
            if destroyed {
                self.world.get::<&mut Building>(entity).unwrap().destroyed = true;
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn set_troop_target(&mut self, troop_id: u32, building_id: u32) {
        let troop_e = {
            let mut query = self.world.query::<&Troop>();
            query
                .iter()
                .find(|(_, t)| t.id == troop_id)
                .map(|(e, _)| e)
        };
        let building_e = {
            let mut query = self.world.query::<&Building>();
            query
                .iter()
                .find(|(_, b)| b.id == building_id)
                .map(|(e, _)| e)
        };
        if let (Some(troop_e), Some(building_e)) = (troop_e, building_e) {
            let mut info = self.world.get::<&mut TargetInfo>(troop_e).unwrap();
            info.building = Some(building_e);
            info.needs_to_destroy_wall = false;
        }
    }

    #[cfg(test)]
    pub(crate) fn troop_target(&self, troop_id: u32) -> Option<u32> {
        let mut query = self.world.query::<(&Troop, &TargetInfo)>();
        let target_e = query
            .iter()
            .find(|(_, (troop, _))| troop.id == troop_id)
            .and_then(|(_, (_, info))| info.building)?;
        self.world.get::<&Building>(target_e).ok().map(|b| b.id)
    }

    #[cfg(test)]
    pub(crate) fn troop_needs_wall(&self, troop_id: u32) -> bool {
        let mut query = self.world.query::<(&Troop, &TargetInfo)>();
        query
            .iter()
            .find(|(_, (troop, _))| troop.id == troop_id)
            .map(|(_, (_, info))| info.needs_to_destroy_wall)
            .unwrap_or(false)
    }

    #[cfg(test)]
    pub(crate) fn troop_position(&self, troop_id: u32) -> Option<Position> {
        let mut query = self.world.query::<(&Troop, &Position)>();
        query
            .iter()
            .find(|(_, (troop, _))| troop.id == troop_id)
            .map(|(_, (_, position))| *position)
    }

    #[cfg(test)]
    pub(crate) fn override_troop_stats(&mut self, troop_id: u32, stats: CombatStats) {
        let entity = {
            let mut query = self.world.query::<&Troop>();
            query
                .iter()
                .find(|(_, t)| t.id == troop_id)
                .map(|(e, _)| e)
        };
        if let Some(entity) = entity {
            *self.world.get::<&mut CombatStats>(entity).unwrap() = stats;
        }
    }

    #[cfg(test)]
    pub(crate) fn troop_state(&self, troop_id: u32) -> Option<UnitState> {
        let mut query = self.world.query::<&Troop>();
        query
            .iter()
            .find(|(_, troop)| troop.id == troop_id)
            .map(|(_, troop)| troop.state)
    }
}
