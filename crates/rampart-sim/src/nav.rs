//! Wall-aware navigation: occupancy grid, line-of-sight, and pathfinding.
//!
//! Only walls obstruct movement; other buildings are walked around by the
//! path cost being identical either way. The grid is rebuilt from the live
//! world each tick, so a destroyed wall stops blocking immediately.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use hecs::{Entity, World};

use rampart_core::components::{Building, Footprint};
use rampart_core::constants::{LOS_SAMPLE_STEP, MAP_SIZE};
use rampart_core::types::Position;

/// Outcome of a path query.
#[derive(Debug, Clone)]
pub enum PathPlan {
    /// Ordered waypoints to walk through, ending at the requested point.
    Route(Vec<Position>),
    /// No route exists; `wall` is the first wall on the straight ray and
    /// must be destroyed to proceed.
    Blocked { wall: Entity },
}

/// Per-tick occupancy grid of live wall cells.
#[derive(Debug)]
pub struct NavGrid {
    cells: Vec<Option<Entity>>,
}

impl NavGrid {
    /// Build the grid from every non-destroyed wall's footprint.
    pub fn from_world(world: &World) -> Self {
        let mut cells = vec![None; MAP_SIZE * MAP_SIZE];

        let mut query = world.query::<(&Building, &Position, &Footprint)>();
        for (entity, (building, position, footprint)) in query.iter() {
            if !building.kind.is_wall() || building.destroyed {
                continue;
            }
            let x0 = position.x.floor().max(0.0) as usize;
            let y0 = position.y.floor().max(0.0) as usize;
            let x1 = ((position.x + footprint.width).ceil() as usize).min(MAP_SIZE);
            let y1 = ((position.y + footprint.height).ceil() as usize).min(MAP_SIZE);
            for y in y0..y1 {
                for x in x0..x1 {
                    cells[y * MAP_SIZE + x] = Some(entity);
                }
            }
        }

        Self { cells }
    }

    fn cell_of(position: &Position) -> (i64, i64) {
        let max = (MAP_SIZE - 1) as f64;
        (
            position.x.clamp(0.0, max).floor() as i64,
            position.y.clamp(0.0, max).floor() as i64,
        )
    }

    fn cell_center(cell: (i64, i64)) -> Position {
        Position::new(cell.0 as f64 + 0.5, cell.1 as f64 + 0.5)
    }

    /// Wall occupying the given cell, if any.
    pub fn wall_at_cell(&self, x: i64, y: i64) -> Option<Entity> {
        if x < 0 || y < 0 || x >= MAP_SIZE as i64 || y >= MAP_SIZE as i64 {
            return None;
        }
        self.cells[y as usize * MAP_SIZE + x as usize]
    }

    /// First wall on the straight segment `from -> to`, skipping `ignore`
    /// (the target itself, when the target is a wall). Stepped ray
    /// traversal at `LOS_SAMPLE_STEP` tiles.
    pub fn wall_blocking(
        &self,
        from: &Position,
        to: &Position,
        ignore: Option<Entity>,
    ) -> Option<Entity> {
        let dist = from.distance_to(to);
        if dist < LOS_SAMPLE_STEP {
            return None;
        }

        let samples = (dist / LOS_SAMPLE_STEP).ceil() as usize;
        let start_cell = Self::cell_of(from);
        for i in 1..=samples {
            let t = i as f64 / samples as f64;
            let sample = Position::new(
                from.x + (to.x - from.x) * t,
                from.y + (to.y - from.y) * t,
            );
            let cell = Self::cell_of(&sample);
            if cell == start_cell {
                continue;
            }
            if let Some(wall) = self.wall_at_cell(cell.0, cell.1) {
                if Some(wall) != ignore {
                    return Some(wall);
                }
            }
        }
        None
    }

    /// Whether the straight segment is free of walls.
    pub fn has_line_of_sight(&self, from: &Position, to: &Position) -> bool {
        self.wall_blocking(from, to, None).is_none()
    }

    /// Plan a route from `from` to `to`. `ignore` marks a wall entity that
    /// may be entered (the troop's own wall target).
    ///
    /// Straight line when unobstructed, otherwise 4-neighbour A* over the
    /// grid with waypoints at direction changes. When no route exists, the
    /// result names the first wall on the straight ray.
    pub fn plan(&self, from: &Position, to: &Position, ignore: Option<Entity>) -> PathPlan {
        let ray_wall = match self.wall_blocking(from, to, ignore) {
            Some(wall) => wall,
            None => return PathPlan::Route(vec![*to]),
        };

        let start = Self::cell_of(from);
        let goal = Self::cell_of(to);
        match self.search(start, goal, ignore) {
            Some(cells) => PathPlan::Route(Self::waypoints(&cells, to)),
            None => PathPlan::Blocked { wall: ray_wall },
        }
    }

    fn walkable(&self, cell: (i64, i64), ignore: Option<Entity>) -> bool {
        match self.wall_at_cell(cell.0, cell.1) {
            Some(wall) => Some(wall) == ignore,
            None => true,
        }
    }

    /// Deterministic A* over the cell grid. Returns the cell chain from
    /// start to goal inclusive, or None when the goal is unreachable.
    fn search(
        &self,
        start: (i64, i64),
        goal: (i64, i64),
        ignore: Option<Entity>,
    ) -> Option<Vec<(i64, i64)>> {
        if start == goal {
            return Some(vec![start]);
        }
        if !self.walkable(goal, ignore) {
            return None;
        }

        let heuristic =
            |cell: (i64, i64)| ((cell.0 - goal.0).abs() + (cell.1 - goal.1).abs()) as u64;

        // (f, x, y) ordering keeps expansion order fully deterministic.
        let mut open: BinaryHeap<Reverse<(u64, i64, i64)>> = BinaryHeap::new();
        let mut g_cost: HashMap<(i64, i64), u64> = HashMap::new();
        let mut came_from: HashMap<(i64, i64), (i64, i64)> = HashMap::new();

        g_cost.insert(start, 0);
        open.push(Reverse((heuristic(start), start.0, start.1)));

        const NEIGHBORS: [(i64, i64); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

        while let Some(Reverse((_, x, y))) = open.pop() {
            let current = (x, y);
            if current == goal {
                let mut chain = vec![goal];
                let mut cursor = goal;
                while let Some(&prev) = came_from.get(&cursor) {
                    chain.push(prev);
                    cursor = prev;
                }
                chain.reverse();
                return Some(chain);
            }

            let current_g = match g_cost.get(&current) {
                Some(&g) => g,
                None => continue,
            };

            for (dx, dy) in NEIGHBORS {
                let next = (x + dx, y + dy);
                if next.0 < 0
                    || next.1 < 0
                    || next.0 >= MAP_SIZE as i64
                    || next.1 >= MAP_SIZE as i64
                {
                    continue;
                }
                // The start cell is always escapable; every other cell
                // must be wall-free (or the ignored wall).
                if !self.walkable(next, ignore) && next != goal {
                    continue;
                }
                let tentative = current_g + 1;
                if g_cost.get(&next).is_none_or(|&g| tentative < g) {
                    g_cost.insert(next, tentative);
                    came_from.insert(next, current);
                    open.push(Reverse((tentative + heuristic(next), next.0, next.1)));
                }
            }
        }

        None
    }

    /// Compress a cell chain into waypoints at direction changes, ending
    /// at the exact requested point.
    fn waypoints(cells: &[(i64, i64)], to: &Position) -> Vec<Position> {
        let mut route = Vec::new();
        for window in cells.windows(3) {
            let a = window[0];
            let b = window[1];
            let c = window[2];
            let dir_in = (b.0 - a.0, b.1 - a.1);
            let dir_out = (c.0 - b.0, c.1 - b.1);
            if dir_in != dir_out {
                route.push(Self::cell_center(b));
            }
        }
        route.push(*to);
        route
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rampart_core::components::Hitpoints;
    use rampart_core::enums::BuildingKind;
    use rampart_core::state::BuildingRecord;

    use crate::world_setup::spawn_building;

    /// Vertical wall line at x = 10, spanning y = 0..=43 except a gap.
    fn walled_world(gap: Option<f64>) -> World {
        let mut world = World::new();
        let mut id = 1;
        for y in 0..MAP_SIZE {
            if Some(y as f64) == gap {
                id += 1;
                continue;
            }
            spawn_building(
                &mut world,
                &BuildingRecord::new(id, BuildingKind::Wall, Position::new(10.0, y as f64)),
            );
            id += 1;
        }
        world
    }

    #[test]
    fn test_clear_line_of_sight() {
        let world = World::new();
        let nav = NavGrid::from_world(&world);
        assert!(nav.has_line_of_sight(&Position::new(1.0, 1.0), &Position::new(20.0, 20.0)));
    }

    #[test]
    fn test_wall_blocks_line_of_sight() {
        let world = walled_world(None);
        let nav = NavGrid::from_world(&world);
        let from = Position::new(5.0, 20.5);
        let to = Position::new(15.0, 20.5);
        assert!(!nav.has_line_of_sight(&from, &to));
        assert!(nav.wall_blocking(&from, &to, None).is_some());
    }

    #[test]
    fn test_straight_route_when_clear() {
        let world = World::new();
        let nav = NavGrid::from_world(&world);
        let to = Position::new(30.0, 12.0);
        match nav.plan(&Position::new(2.0, 2.0), &to, None) {
            PathPlan::Route(route) => assert_eq!(route, vec![to]),
            PathPlan::Blocked { .. } => panic!("open map must not block"),
        }
    }

    #[test]
    fn test_route_through_gap() {
        // Wall line with a gap at y = 22; a path must exist and detour
        // through it.
        let world = walled_world(Some(22.0));
        let nav = NavGrid::from_world(&world);
        let from = Position::new(5.5, 5.5);
        let to = Position::new(15.5, 5.5);
        match nav.plan(&from, &to, None) {
            PathPlan::Route(route) => {
                assert!(!route.is_empty());
                assert_eq!(*route.last().unwrap(), to);
                // The detour must pass through the gap row.
                assert!(
                    route.iter().any(|wp| (wp.y - 22.5).abs() < 1.0),
                    "route should thread the gap, got {route:?}"
                );
            }
            PathPlan::Blocked { .. } => panic!("gap exists, route expected"),
        }
    }

    #[test]
    fn test_fully_blocked_names_ray_wall() {
        let world = walled_world(None);
        let nav = NavGrid::from_world(&world);
        let from = Position::new(5.5, 20.5);
        let to = Position::new(15.5, 20.5);
        match nav.plan(&from, &to, None) {
            PathPlan::Blocked { wall } => {
                // The named wall is the one straight ahead (x = 10 column,
                // row 20).
                let building = world.get::<&Building>(wall).unwrap();
                assert!(building.kind.is_wall());
                let position = world.get::<&Position>(wall).unwrap();
                assert_eq!(position.y, 20.0);
            }
            PathPlan::Route(route) => panic!("full wall must block, got {route:?}"),
        }
    }

    #[test]
    fn test_destroyed_wall_stops_blocking() {
        let mut world = walled_world(None);
        let from = Position::new(5.5, 20.5);
        let to = Position::new(15.5, 20.5);

        let nav = NavGrid::from_world(&world);
        let wall = match nav.plan(&from, &to, None) {
            PathPlan::Blocked { wall } => wall,
            PathPlan::Route(_) => panic!("expected blocked"),
        };

        world.get::<&mut Building>(wall).unwrap().destroyed = true;
        world.get::<&mut Hitpoints>(wall).unwrap().hp = 0.0;

        // Rebuilt grid routes through the breach.
        let nav = NavGrid::from_world(&world);
        match nav.plan(&from, &to, None) {
            PathPlan::Route(route) => assert_eq!(*route.last().unwrap(), to),
            PathPlan::Blocked { .. } => panic!("breached wall must not block"),
        }
    }

    #[test]
    fn test_target_wall_is_enterable() {
        let world = walled_world(None);
        let nav = NavGrid::from_world(&world);
        let from = Position::new(5.5, 20.5);
        // Aim at the wall segment itself; with ignore set, the goal cell
        // is enterable and the plan is a straight approach.
        let wall = nav
            .wall_blocking(&from, &Position::new(15.5, 20.5), None)
            .unwrap();
        let wall_center = Position::new(10.5, 20.5);
        match nav.plan(&from, &wall_center, Some(wall)) {
            PathPlan::Route(route) => assert_eq!(*route.last().unwrap(), wall_center),
            PathPlan::Blocked { .. } => panic!("own wall target must be reachable"),
        }
    }
}
