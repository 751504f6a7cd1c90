//! A* pathfinding over the hex grid
//!
//! Every step between adjacent passable hexes costs 1; the hex distance is
//! the heuristic, so it never overestimates. Ties on f-cost are broken by
//! insertion order to keep results reproducible.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use rustc_hash::FxHashMap;

use crate::hex::HexCoord;
use crate::terrain::{is_passable, move_duration_minutes, UnitKind};
use crate::world::TerrainGrid;

/// Node in the A* open set
#[derive(Debug, Clone, PartialEq, Eq)]
struct PathNode {
    coord: HexCoord,
    f_cost: u32,
    order: u64,
}

impl Ord for PathNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap; earlier insertion wins ties
        other
            .f_cost
            .cmp(&self.f_cost)
            .then_with(|| other.order.cmp(&self.order))
    }
}

impl PartialOrd for PathNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Find a path from `start` to `goal` for a unit of `kind`.
///
/// The returned path includes `start` as its first element and `goal` as its
/// last. Returns None if `goal` is off the map, impassable or unreachable.
/// `start` itself is never checked for passability.
pub fn find_path(
    terrain: &TerrainGrid,
    kind: UnitKind,
    start: HexCoord,
    goal: HexCoord,
) -> Option<Vec<HexCoord>> {
    let rows = terrain.rows();
    let cols = terrain.cols();

    if !terrain.contains(start) {
        return None;
    }
    if start == goal {
        return Some(vec![start]);
    }

    let passable = |hex: HexCoord| terrain.get(hex).map_or(false, |t| is_passable(kind, t));
    if !passable(goal) {
        return None;
    }

    let mut open_set = BinaryHeap::new();
    let mut came_from: FxHashMap<HexCoord, HexCoord> = FxHashMap::default();
    let mut g_scores: FxHashMap<HexCoord, u32> = FxHashMap::default();
    let mut counter = 0u64;

    g_scores.insert(start, 0);
    open_set.push(PathNode {
        coord: start,
        f_cost: start.distance_to(goal),
        order: counter,
    });

    while let Some(current) = open_set.pop() {
        if current.coord == goal {
            return Some(reconstruct_path(&came_from, current.coord));
        }

        let current_g = g_scores.get(&current.coord).copied().unwrap_or(u32::MAX);
        // Stale heap entry
        if current.f_cost > current_g.saturating_add(current.coord.distance_to(goal)) {
            continue;
        }

        for neighbor in current.coord.neighbors(rows, cols) {
            if !passable(neighbor) {
                continue;
            }

            let tentative_g = current_g + 1;
            let neighbor_g = g_scores.get(&neighbor).copied().unwrap_or(u32::MAX);

            if tentative_g < neighbor_g {
                came_from.insert(neighbor, current.coord);
                g_scores.insert(neighbor, tentative_g);
                counter += 1;
                open_set.push(PathNode {
                    coord: neighbor,
                    f_cost: tentative_g + neighbor.distance_to(goal),
                    order: counter,
                });
            }
        }
    }

    None // No path found
}

/// Reconstruct path from came_from map
fn reconstruct_path(came_from: &FxHashMap<HexCoord, HexCoord>, mut current: HexCoord) -> Vec<HexCoord> {
    let mut path = vec![current];
    while let Some(&prev) = came_from.get(&current) {
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}

/// First hex to move to along `path` (the start hex is not a move target)
pub fn next_step(path: &[HexCoord]) -> Option<HexCoord> {
    path.get(1).copied()
}

/// Game minutes needed to walk `path`, entering every hex after the start
pub fn path_duration_minutes(terrain: &TerrainGrid, kind: UnitKind, path: &[HexCoord]) -> f32 {
    path.iter()
        .skip(1)
        .map(|&hex| match terrain.get(hex) {
            Some(t) => move_duration_minutes(kind, t),
            None => f32::INFINITY,
        })
        .sum()
}
