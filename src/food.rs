// Food placement
//
// Random probing first, then a row-major scan, then the origin as a last resort.
// The function always terminates, even on a completely filled grid.

use log::debug;
use rand::Rng;
use std::collections::HashSet;

use crate::types::Coord;

/// Picks a free cell for the next food item
///
/// # Arguments
/// * `occupied` - Every segment of every snake, heads included
/// * `size` - Grid side length
/// * `max_attempts` - Number of uniform random probes before scanning
/// * `rng` - Random source
///
/// # Returns
/// * `Coord` - A cell not in `occupied`, or (0, 0) if the grid is full
pub fn place_food<R: Rng>(
    occupied: &HashSet<Coord>,
    size: i32,
    max_attempts: u32,
    rng: &mut R,
) -> Coord {
    for _ in 0..max_attempts {
        let candidate = Coord {
            x: rng.random_range(0..size),
            y: rng.random_range(0..size),
        };
        if !occupied.contains(&candidate) {
            return candidate;
        }
    }

    debug!(
        "No free cell after {} random probes, scanning the grid",
        max_attempts
    );

    for y in 0..size {
        for x in 0..size {
            let candidate = Coord { x, y };
            if !occupied.contains(&candidate) {
                return candidate;
            }
        }
    }

    Coord { x: 0, y: 0 }
}
