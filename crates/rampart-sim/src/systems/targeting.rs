//! Target selection and engagement planning.
//!
//! Runs once per troop per tick, but only acts on troops with no live
//! cached target (or an acquired target that still needs a plan). The
//! decision is pure: filter non-destroyed buildings, narrow by the troop's
//! preference when the narrowed set is non-empty, pick the nearest
//! footprint center, ties to the lowest building id.
//!
//! Planning accounts for walls: every troop walks wall-aware routes, and
//! melee troops whose route is fully blocked flip onto the blocking wall
//! (`needs_to_destroy_wall`). The over-wall capability is an attack
//! exception only: such troops shoot through an intervening wall once in
//! range, but never path through one. When fully fenced off they drop the
//! unreachable target and reselect next tick.

use hecs::{Entity, World};

use rampart_core::catalog::troop_stats;
use rampart_core::components::*;
use rampart_core::enums::{TargetPreference, UnitState};
use rampart_core::types::Position;

use crate::nav::{NavGrid, PathPlan};
use crate::systems::{building_center, troops_in_spawn_order};

/// Maximum wall-retarget hops resolved within a single tick.
const MAX_RETARGET_HOPS: usize = 4;

pub fn run(world: &mut World, nav: &NavGrid) {
    for (troop_e, _) in troops_in_spawn_order(world, None) {
        let (kind, state) = match world.get::<&Troop>(troop_e) {
            Ok(troop) => (troop.kind, troop.state),
            Err(_) => continue,
        };
        if state == UnitState::Dead {
            continue;
        }
        let alive = world
            .get::<&Hitpoints>(troop_e)
            .map(|hp| hp.is_alive())
            .unwrap_or(false);
        if !alive {
            continue;
        }

        let (mut target, mut needs_wall) = match world.get::<&TargetInfo>(troop_e) {
            Ok(info) => (info.building, info.needs_to_destroy_wall),
            Err(_) => (None, false),
        };

        // Drop a cached target that is gone or destroyed.
        if let Some(entity) = target {
            if building_center(world, entity).is_none() {
                target = None;
                needs_wall = false;
            }
        }

        // A moving or attacking troop with a live target keeps its plan.
        if target.is_some() && matches!(state, UnitState::Moving | UnitState::Attacking) {
            continue;
        }

        let position = match world.get::<&Position>(troop_e) {
            Ok(p) => *p,
            Err(_) => continue,
        };
        let stats = match world.get::<&CombatStats>(troop_e) {
            Ok(s) => *s,
            Err(_) => continue,
        };

        let selected = match target {
            Some(entity) => Some(entity),
            None => {
                needs_wall = false;
                select_target(world, &position, troop_stats(kind).preference)
            }
        };

        match selected {
            Some(entity) => {
                plan_engagement(world, nav, troop_e, entity, &position, &stats, needs_wall);
            }
            None => commit(world, troop_e, None, false, UnitState::Idle, Vec::new()),
        }
    }
}

/// Pick the nearest non-destroyed building, honoring the preference
/// narrowing rule. Candidates are scanned in building-id order so distance
/// ties go to the first-created building.
fn select_target(world: &World, from: &Position, preference: TargetPreference) -> Option<Entity> {
    struct Candidate {
        id: u32,
        entity: Entity,
        dist: f64,
        defense: bool,
        wall: bool,
    }

    let mut candidates: Vec<Candidate> = Vec::new();
    {
        let mut query = world.query::<(&Building, &Position, &Footprint)>();
        for (entity, (building, position, footprint)) in query.iter() {
            if building.destroyed {
                continue;
            }
            let center = footprint.center(position);
            candidates.push(Candidate {
                id: building.id,
                entity,
                dist: from.distance_to(&center),
                defense: building.kind.is_defense(),
                wall: building.kind.is_wall(),
            });
        }
    }
    candidates.sort_by_key(|c| c.id);

    let narrowed: Vec<&Candidate> = match preference {
        TargetPreference::Any => Vec::new(),
        TargetPreference::Defenses => candidates.iter().filter(|c| c.defense).collect(),
        TargetPreference::Walls => candidates.iter().filter(|c| c.wall).collect(),
    };
    let pool: Vec<&Candidate> = if narrowed.is_empty() {
        candidates.iter().collect()
    } else {
        narrowed
    };

    pool.into_iter()
        .reduce(|best, c| if c.dist < best.dist { c } else { best })
        .map(|c| c.entity)
}

/// Resolve how to engage `initial`: attack in place, walk a route, or hop
/// onto a blocking wall. Bounded wall-hops keep a pathological wall maze
/// from spinning inside one tick.
fn plan_engagement(
    world: &mut World,
    nav: &NavGrid,
    troop_e: Entity,
    initial: Entity,
    position: &Position,
    stats: &CombatStats,
    mut needs_wall: bool,
) {
    let mut current = initial;

    for _ in 0..MAX_RETARGET_HOPS {
        let Some((center, is_wall)) = building_center(world, current) else {
            commit(world, troop_e, None, false, UnitState::Idle, Vec::new());
            return;
        };
        let ignore = if is_wall { Some(current) } else { None };

        if position.distance_to(&center) <= stats.range {
            match nav.wall_blocking(position, &center, ignore) {
                // Clear shot, or the projectile arcs over the wall.
                None => {
                    commit(
                        world,
                        troop_e,
                        Some(current),
                        needs_wall,
                        UnitState::Attacking,
                        Vec::new(),
                    );
                    return;
                }
                Some(_) if stats.over_walls => {
                    commit(
                        world,
                        troop_e,
                        Some(current),
                        needs_wall,
                        UnitState::Attacking,
                        Vec::new(),
                    );
                    return;
                }
                // In range but fenced off: the wall becomes the target.
                Some(wall) => {
                    current = wall;
                    needs_wall = true;
                    continue;
                }
            }
        }

        match nav.plan(position, &center, ignore) {
            PathPlan::Route(route) => {
                commit(
                    world,
                    troop_e,
                    Some(current),
                    needs_wall,
                    UnitState::Moving,
                    route,
                );
                return;
            }
            // An over-wall troop never attacks its way through a wall
            // line; an unreachable target gets dropped and reselected
            // next tick, usually as the nearest wall piece itself.
            PathPlan::Blocked { .. } if stats.over_walls => {
                commit(world, troop_e, None, false, UnitState::Idle, Vec::new());
                return;
            }
            PathPlan::Blocked { wall } => {
                current = wall;
                needs_wall = true;
            }
        }
    }

    // Unresolved within the hop budget; keep the latest wall target and
    // retry next tick.
    commit(
        world,
        troop_e,
        Some(current),
        needs_wall,
        UnitState::Idle,
        Vec::new(),
    );
}

fn commit(
    world: &mut World,
    troop_e: Entity,
    target: Option<Entity>,
    needs_wall: bool,
    state: UnitState,
    route: Vec<Position>,
) {
    if let Ok(mut info) = world.get::<&mut TargetInfo>(troop_e) {
        info.building = target;
        info.needs_to_destroy_wall = needs_wall;
    }
    if let Ok(mut troop) = world.get::<&mut Troop>(troop_e) {
        if troop.state != UnitState::Dead {
            troop.state = state;
        }
    }
    if let Ok(mut path) = world.get::<&mut NavPath>(troop_e) {
        path.waypoints = route.into();
    }
}
