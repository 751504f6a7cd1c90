//! Fog-of-war computation
//!
//! Each live friendly unit runs its own breadth-first expansion bounded by
//! its vision radius. The mask is rebuilt from scratch every snapshot.

use std::collections::VecDeque;

use rustc_hash::FxHashSet;

use crate::hex::HexCoord;
use crate::terrain::{vision_radius, TerrainKind};
use crate::unit::{Faction, Unit};
use crate::world::{TerrainGrid, VisibilityMask};

/// Compute the visibility mask of `faction` over the whole grid
pub fn compute_visibility(terrain: &TerrainGrid, units: &[Unit], faction: Faction) -> VisibilityMask {
    let rows = terrain.rows();
    let cols = terrain.cols();
    let mut mask = VisibilityMask::new(rows, cols);

    let friendly: Vec<&Unit> = units
        .iter()
        .filter(|u| u.faction == faction && u.is_alive() && terrain.contains(u.position))
        .collect();

    for unit in &friendly {
        let standing_on = terrain.get(unit.position).unwrap_or(TerrainKind::Unassigned);
        let radius = vision_radius(unit.kind, standing_on);
        reveal_from(&mut mask, unit.position, radius, rows, cols);
    }

    // A unit always sees its own hex, even with zero radius
    for unit in &friendly {
        mask.mark(unit.position);
    }

    mask
}

/// Breadth-first expansion from `origin` up to `radius` steps
fn reveal_from(mask: &mut VisibilityMask, origin: HexCoord, radius: u32, rows: usize, cols: usize) {
    let mut queue = VecDeque::new();
    let mut enqueued = FxHashSet::default();

    queue.push_back((origin, 0u32));
    enqueued.insert(origin);

    while let Some((hex, dist)) = queue.pop_front() {
        mask.mark(hex);

        if dist >= radius {
            continue;
        }

        for next in hex.neighbors(rows, cols) {
            if enqueued.insert(next) {
                queue.push_back((next, dist + 1));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hex::hexes_within;
    use crate::terrain::UnitKind;

    fn flat(rows: usize, cols: usize) -> TerrainGrid {
        TerrainGrid::filled(rows, cols, TerrainKind::Flat)
    }

    #[test]
    fn test_single_unit_radius() {
        let terrain = flat(10, 10);
        let origin = HexCoord::new(0, 0);
        let units = vec![Unit::new(1, UnitKind::Infantry, Faction::Red, origin, 12.0)];

        let mask = compute_visibility(&terrain, &units, Faction::Red);
        let expected = hexes_within(origin, 4, 10, 10);

        assert_eq!(mask.visible_count(), expected.len());
        for row in 0..10 {
            for col in 0..10 {
                let hex = HexCoord::new(row, col);
                assert_eq!(mask.is_visible(hex), origin.distance_to(hex) <= 4, "{}", hex);
            }
        }
    }

    #[test]
    fn test_hill_extends_vision() {
        let mut terrain = flat(20, 20);
        let origin = HexCoord::new(10, 10);
        terrain.set(origin, TerrainKind::Hill);
        let units = vec![Unit::new(1, UnitKind::Cavalry, Faction::Red, origin, 15.0)];

        let mask = compute_visibility(&terrain, &units, Faction::Red);
        assert!(mask.is_visible(HexCoord::new(10, 16)));
        assert!(!mask.is_visible(HexCoord::new(10, 17)));
    }

    #[test]
    fn test_enemy_and_dead_units_ignored() {
        let terrain = flat(10, 10);
        let units = vec![
            Unit::new(1, UnitKind::Scout, Faction::Blue, HexCoord::new(2, 2), 5.0),
            Unit::new(2, UnitKind::Scout, Faction::Red, HexCoord::new(8, 8), 0.0),
        ];
        let mask = compute_visibility(&terrain, &units, Faction::Red);
        assert_eq!(mask.visible_count(), 0);
    }

    #[test]
    fn test_unit_hexes_always_visible() {
        let terrain = flat(6, 6);
        let units = vec![
            Unit::new(1, UnitKind::Supply, Faction::Red, HexCoord::new(0, 0), 5.0),
            Unit::new(2, UnitKind::Supply, Faction::Red, HexCoord::new(5, 5), 5.0),
        ];
        let mask = compute_visibility(&terrain, &units, Faction::Red);
        for unit in &units {
            assert!(mask.is_visible(unit.position));
        }
    }

    #[test]
    fn test_standing_on_impassable_terrain_uses_base_radius() {
        let mut terrain = flat(10, 10);
        let origin = HexCoord::new(4, 4);
        terrain.set(origin, TerrainKind::Base);
        let units = vec![Unit::new(1, UnitKind::Supply, Faction::Red, origin, 5.0)];
        let mask = compute_visibility(&terrain, &units, Faction::Red);
        assert_eq!(mask.visible_count(), hexes_within(origin, 2, 10, 10).len());
    }
}
