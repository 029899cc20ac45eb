//! Destruction percentage and star award.
//!
//! Walls are excluded from the destruction tally. The percentage is the
//! floor of `100 * damage_dealt / total_max_hp` over non-wall buildings,
//! which only ever grows because health never regenerates. A village with
//! no non-wall buildings counts as fully destroyed.

use hecs::World;

use rampart_core::components::{Building, Hitpoints};
use rampart_core::constants::{STAR_1_THRESHOLD, STAR_2_THRESHOLD, STAR_3_THRESHOLD};

pub fn destruction_percentage(world: &World) -> u32 {
    let mut total_max = 0.0_f64;
    let mut total_lost = 0.0_f64;

    let mut query = world.query::<(&Building, &Hitpoints)>();
    for (_, (building, hitpoints)) in query.iter() {
        if building.kind.is_wall() {
            continue;
        }
        total_max += hitpoints.max;
        total_lost += hitpoints.max - hitpoints.hp;
    }

    if total_max <= 0.0 {
        return 100;
    }
    ((total_lost / total_max) * 100.0).floor() as u32
}

pub fn stars_for(destruction_pct: u32) -> u32 {
    if destruction_pct >= STAR_3_THRESHOLD {
        3
    } else if destruction_pct >= STAR_2_THRESHOLD {
        2
    } else if destruction_pct >= STAR_1_THRESHOLD {
        1
    } else {
        0
    }
}
