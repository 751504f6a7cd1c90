//! Compact textual map encoding
//!
//! One string per grid row, one space-separated token per hex:
//!
//! - fogged hex: `0`
//! - visible empty hex: terrain symbol, e.g. `F`
//! - visible occupied hex: terrain, faction, unit kind, health bucket and an
//!   optional `F` when the hex is in combat, e.g. `HRC5F`

use rustc_hash::FxHashMap;

use crate::hex::HexCoord;
use crate::terrain::TerrainKind;
use crate::unit::Unit;
use crate::world::{CombatSet, TerrainGrid, VisibilityMask};

/// Token for hexes outside the visibility mask
pub const UNKNOWN_TOKEN: &str = "0";

/// Suffix appended to occupied hexes in combat
pub const COMBAT_SUFFIX: char = 'F';

/// Health rendered as a single digit: floored, then clamped to 1..=9
pub fn health_bucket(health: f32) -> u8 {
    let floored = health.floor();
    if floored.is_nan() || floored < 1.0 {
        1
    } else if floored > 9.0 {
        9
    } else {
        floored as u8
    }
}

/// Token for a single visible hex
pub fn encode_hex(terrain: TerrainKind, occupant: Option<&Unit>, in_combat: bool) -> String {
    let mut token = String::with_capacity(5);
    token.push(terrain.symbol());

    if let Some(unit) = occupant {
        token.push(unit.faction.symbol());
        token.push(unit.kind.symbol());
        token.push(char::from(b'0' + health_bucket(unit.health)));
        if in_combat {
            token.push(COMBAT_SUFFIX);
        }
    }

    token
}

/// Encode the grid as seen through `visibility`
pub fn encode_map(
    terrain: &TerrainGrid,
    units: &[Unit],
    combat: &CombatSet,
    visibility: &VisibilityMask,
) -> Vec<String> {
    // First live unit listed wins when two share a hex
    let mut occupants: FxHashMap<HexCoord, &Unit> = FxHashMap::default();
    for unit in units.iter().filter(|u| u.is_alive()) {
        occupants.entry(unit.position).or_insert(unit);
    }

    (0..terrain.rows() as i32)
        .map(|row| {
            (0..terrain.cols() as i32)
                .map(|col| {
                    let hex = HexCoord::new(row, col);
                    if !visibility.is_visible(hex) {
                        return UNKNOWN_TOKEN.to_string();
                    }
                    let kind = terrain.get(hex).unwrap_or(TerrainKind::Unassigned);
                    encode_hex(kind, occupants.get(&hex).copied(), combat.contains(&hex))
                })
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}
