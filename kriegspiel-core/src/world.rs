//! World view: the locally derived picture of one snapshot

use rustc_hash::FxHashSet;

use crate::error::{CoreError, Result};
use crate::hex::HexCoord;
use crate::terrain::{TerrainKind, UnitKind};
use crate::unit::{Faction, Unit, UnitId};

// ============================================================================
// TERRAIN GRID
// ============================================================================

/// Immutable `rows x cols` terrain array, row-major
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TerrainGrid {
    rows: usize,
    cols: usize,
    cells: Vec<TerrainKind>,
}

impl TerrainGrid {
    /// Uniform grid, mostly for tests and fixtures
    pub fn filled(rows: usize, cols: usize, terrain: TerrainKind) -> Self {
        Self {
            rows,
            cols,
            cells: vec![terrain; rows * cols],
        }
    }

    /// Build from nested rows, checking the declared dimensions
    pub fn from_rows(grid: Vec<Vec<TerrainKind>>, rows: usize, cols: usize) -> Result<Self> {
        if grid.len() != rows {
            return Err(CoreError::RowCountMismatch {
                expected: rows,
                actual: grid.len(),
            });
        }

        let mut cells = Vec::with_capacity(rows * cols);
        for (row, line) in grid.into_iter().enumerate() {
            if line.len() != cols {
                return Err(CoreError::ColumnCountMismatch {
                    row,
                    expected: cols,
                    actual: line.len(),
                });
            }
            cells.extend(line);
        }

        Ok(Self { rows, cols, cells })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn contains(&self, hex: HexCoord) -> bool {
        hex.is_valid(self.rows, self.cols)
    }

    /// Terrain at `hex`, None when off the map
    pub fn get(&self, hex: HexCoord) -> Option<TerrainKind> {
        if !self.contains(hex) {
            return None;
        }
        Some(self.cells[hex.row as usize * self.cols + hex.col as usize])
    }

    pub fn set(&mut self, hex: HexCoord, terrain: TerrainKind) {
        if self.contains(hex) {
            self.cells[hex.row as usize * self.cols + hex.col as usize] = terrain;
        }
    }
}

/// Hexes currently hosting active combat
pub type CombatSet = FxHashSet<HexCoord>;

// ============================================================================
// VISIBILITY MASK
// ============================================================================

/// `rows x cols` booleans; true means visible to the local faction
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VisibilityMask {
    rows: usize,
    cols: usize,
    bits: Vec<bool>,
}

impl VisibilityMask {
    /// All-false mask
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            bits: vec![false; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_visible(&self, hex: HexCoord) -> bool {
        hex.is_valid(self.rows, self.cols) && self.bits[hex.row as usize * self.cols + hex.col as usize]
    }

    pub fn mark(&mut self, hex: HexCoord) {
        if hex.is_valid(self.rows, self.cols) {
            self.bits[hex.row as usize * self.cols + hex.col as usize] = true;
        }
    }

    pub fn visible_count(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    /// Fogged hexes in row-major order
    pub fn hidden_hexes(&self) -> impl Iterator<Item = HexCoord> + '_ {
        let cols = self.cols;
        self.bits
            .iter()
            .enumerate()
            .filter(|(_, visible)| !**visible)
            .map(move |(i, _)| HexCoord::new((i / cols) as i32, (i % cols) as i32))
    }
}

// ============================================================================
// WORLD VIEW
// ============================================================================

/// Everything derived from the latest accepted snapshot.
///
/// Replaced wholesale on every accepted snapshot, never patched in place.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WorldView {
    /// Sequence number of the snapshot this view was built from
    pub sequence_number: Option<i64>,
    pub game_time_minutes: f64,
    pub terrain: TerrainGrid,
    pub units: Vec<Unit>,
    pub combat: CombatSet,
    pub visibility: VisibilityMask,
    /// Encoded grid, one string per row
    pub encoded_map: Vec<String>,
}

impl WorldView {
    /// Empty view, as held before the first snapshot
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> usize {
        self.terrain.rows()
    }

    pub fn cols(&self) -> usize {
        self.terrain.cols()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence_number.is_none()
    }

    /// The dividing row between the two starting halves
    pub fn frontier_row(&self) -> i32 {
        (self.rows() / 2) as i32
    }

    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.iter().find(|u| u.id == id)
    }

    pub fn unit_at(&self, hex: HexCoord) -> Option<&Unit> {
        self.units.iter().find(|u| u.position == hex)
    }

    pub fn live_units(&self, faction: Faction) -> impl Iterator<Item = &Unit> + '_ {
        self.units
            .iter()
            .filter(move |u| u.faction == faction && u.is_alive())
    }

    /// Live general of `faction`, if still on the map
    pub fn general(&self, faction: Faction) -> Option<&Unit> {
        self.live_units(faction).find(|u| u.kind == UnitKind::General)
    }

    pub fn is_visible(&self, hex: HexCoord) -> bool {
        self.visibility.is_visible(hex)
    }

    pub fn in_combat(&self, hex: HexCoord) -> bool {
        self.combat.contains(&hex)
    }

    /// Live enemy units standing on hexes visible to `faction`
    pub fn visible_enemies(&self, faction: Faction) -> impl Iterator<Item = &Unit> + '_ {
        self.live_units(faction.opponent())
            .filter(move |u| self.visibility.is_visible(u.position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_from_rows() {
        let grid = TerrainGrid::from_rows(
            vec![
                vec![TerrainKind::Flat, TerrainKind::Hill],
                vec![TerrainKind::Lake, TerrainKind::Forest],
            ],
            2,
            2,
        )
        .unwrap();
        assert_eq!(grid.get(HexCoord::new(0, 1)), Some(TerrainKind::Hill));
        assert_eq!(grid.get(HexCoord::new(1, 0)), Some(TerrainKind::Lake));
        assert_eq!(grid.get(HexCoord::new(2, 0)), None);
        assert_eq!(grid.get(HexCoord::new(0, -1)), None);
    }

    #[test]
    fn test_grid_dimension_mismatch() {
        let ragged = vec![vec![TerrainKind::Flat; 3], vec![TerrainKind::Flat; 2]];
        assert_eq!(
            TerrainGrid::from_rows(ragged, 2, 3),
            Err(CoreError::ColumnCountMismatch { row: 1, expected: 3, actual: 2 })
        );
        let short = vec![vec![TerrainKind::Flat; 3]];
        assert_eq!(
            TerrainGrid::from_rows(short, 2, 3),
            Err(CoreError::RowCountMismatch { expected: 2, actual: 1 })
        );
    }

    #[test]
    fn test_mask_marks() {
        let mut mask = VisibilityMask::new(3, 4);
        assert_eq!(mask.visible_count(), 0);
        mask.mark(HexCoord::new(2, 3));
        mask.mark(HexCoord::new(5, 5)); // off map, ignored
        assert!(mask.is_visible(HexCoord::new(2, 3)));
        assert_eq!(mask.visible_count(), 1);
        assert_eq!(mask.hidden_hexes().count(), 11);
    }

    #[test]
    fn test_world_queries() {
        let mut world = WorldView::empty();
        assert!(world.is_empty());
        world.terrain = TerrainGrid::filled(10, 10, TerrainKind::Flat);
        world.units = vec![
            Unit::new(1, UnitKind::General, Faction::Blue, HexCoord::new(1, 1), 10.0),
            Unit::new(2, UnitKind::Infantry, Faction::Red, HexCoord::new(8, 1), 0.0),
            Unit::new(3, UnitKind::Infantry, Faction::Red, HexCoord::new(8, 2), 12.0),
        ];
        assert_eq!(world.frontier_row(), 5);
        assert_eq!(world.live_units(Faction::Red).count(), 1);
        assert_eq!(world.general(Faction::Blue).map(|u| u.id), Some(1));
        assert_eq!(world.unit_at(HexCoord::new(8, 2)).map(|u| u.id), Some(3));
        // Nothing visible yet
        assert_eq!(world.visible_enemies(Faction::Red).count(), 0);
    }
}
