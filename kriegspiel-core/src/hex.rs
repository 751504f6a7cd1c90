//! Hex grid geometry with offset (odd-row shifted) storage
//!
//! Hexes are stored as `(row, col)` on a `rows x cols` rectangle. Every
//! distance and adjacency computation goes through cube coordinates.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Offset coordinates of a hex on the map
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HexCoord {
    pub row: i32,
    pub col: i32,
}

/// Axial coordinates (q, r)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Axial {
    pub q: i32,
    pub r: i32,
}

/// Cube coordinates, x + y + z == 0
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cube {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

/// Neighbor offsets (drow, dcol) for even rows
/// Index: 0=E, 1=W, 2=NE, 3=NW, 4=SE, 5=SW
pub const EVEN_ROW_OFFSETS: [(i32, i32); 6] = [
    (0, 1),   // E
    (0, -1),  // W
    (-1, 0),  // NE
    (-1, -1), // NW
    (1, 0),   // SE
    (1, -1),  // SW
];

/// Neighbor offsets (drow, dcol) for odd rows
pub const ODD_ROW_OFFSETS: [(i32, i32); 6] = [
    (0, 1),  // E
    (0, -1), // W
    (-1, 1), // NE
    (-1, 0), // NW
    (1, 1),  // SE
    (1, 0),  // SW
];

impl HexCoord {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Check if this hex lies on a `rows x cols` map
    pub fn is_valid(&self, rows: usize, cols: usize) -> bool {
        self.row >= 0 && self.col >= 0 && (self.row as usize) < rows && (self.col as usize) < cols
    }

    /// q = col - floor(row / 2), r = row
    pub fn to_axial(&self) -> Axial {
        Axial {
            q: self.col - self.row.div_euclid(2),
            r: self.row,
        }
    }

    pub fn to_cube(&self) -> Cube {
        let Axial { q, r } = self.to_axial();
        Cube { x: q, y: -q - r, z: r }
    }

    /// Distance between two hexes
    pub fn distance_to(&self, other: HexCoord) -> u32 {
        let a = self.to_cube();
        let b = other.to_cube();
        let dx = (a.x - b.x).unsigned_abs();
        let dy = (a.y - b.y).unsigned_abs();
        let dz = (a.z - b.z).unsigned_abs();
        dx.max(dy).max(dz)
    }

    /// On-map neighbors, in E, W, NE, NW, SE, SW order
    pub fn neighbors(&self, rows: usize, cols: usize) -> impl Iterator<Item = HexCoord> {
        let offsets = if self.row.rem_euclid(2) == 0 {
            &EVEN_ROW_OFFSETS
        } else {
            &ODD_ROW_OFFSETS
        };
        let origin = *self;
        offsets
            .iter()
            .map(move |&(dr, dc)| HexCoord::new(origin.row + dr, origin.col + dc))
            .filter(move |hex| hex.is_valid(rows, cols))
    }
}

/// Free-function form of [`HexCoord::distance_to`]
pub fn distance(a: HexCoord, b: HexCoord) -> u32 {
    a.distance_to(b)
}

/// Free-function form of [`HexCoord::neighbors`]
pub fn neighbors(hex: HexCoord, rows: usize, cols: usize) -> Vec<HexCoord> {
    hex.neighbors(rows, cols).collect()
}

/// All on-map hexes within `radius` of `center`, in row-major order
pub fn hexes_within(center: HexCoord, radius: u32, rows: usize, cols: usize) -> Vec<HexCoord> {
    let mut result = Vec::new();
    for row in 0..rows as i32 {
        for col in 0..cols as i32 {
            let hex = HexCoord::new(row, col);
            if center.distance_to(hex) <= radius {
                result.push(hex);
            }
        }
    }
    result
}

/// Wire key form: "r,c"
impl fmt::Display for HexCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.row, self.col)
    }
}

impl FromStr for HexCoord {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad_key = || CoreError::InvalidHexKey(s.to_string());
        let (row, col) = s.split_once(',').ok_or_else(bad_key)?;
        let row = row.trim().parse().map_err(|_| bad_key())?;
        let col = col.trim().parse().map_err(|_| bad_key())?;
        Ok(HexCoord::new(row, col))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axial_conversion() {
        assert_eq!(HexCoord::new(0, 0).to_axial(), Axial { q: 0, r: 0 });
        assert_eq!(HexCoord::new(3, 4).to_axial(), Axial { q: 3, r: 3 });
        assert_eq!(HexCoord::new(4, 4).to_axial(), Axial { q: 2, r: 4 });
        let cube = HexCoord::new(5, 2).to_cube();
        assert_eq!(cube.x + cube.y + cube.z, 0);
    }

    #[test]
    fn test_distance() {
        let origin = HexCoord::new(0, 0);
        assert_eq!(origin.distance_to(origin), 0);
        assert_eq!(origin.distance_to(HexCoord::new(0, 3)), 3);
        assert_eq!(origin.distance_to(HexCoord::new(2, 1)), 2);
        assert_eq!(origin.distance_to(HexCoord::new(4, 0)), 4);
        assert_eq!(HexCoord::new(4, 0).distance_to(origin), 4);
    }

    #[test]
    fn test_distance_symmetric() {
        for r1 in 0..8 {
            for c1 in 0..8 {
                for r2 in 0..8 {
                    for c2 in 0..8 {
                        let a = HexCoord::new(r1, c1);
                        let b = HexCoord::new(r2, c2);
                        assert_eq!(a.distance_to(b), b.distance_to(a));
                    }
                }
            }
        }
    }

    #[test]
    fn test_neighbors_are_adjacent() {
        for row in 0..7 {
            for col in 0..7 {
                let hex = HexCoord::new(row, col);
                for n in hex.neighbors(7, 7) {
                    assert_ne!(n, hex);
                    assert!(n.is_valid(7, 7));
                    assert_eq!(hex.distance_to(n), 1, "{} -> {}", hex, n);
                }
            }
        }
    }

    #[test]
    fn test_neighbors_row_parity() {
        let even = neighbors(HexCoord::new(2, 2), 10, 10);
        assert!(even.contains(&HexCoord::new(1, 1)));
        assert!(even.contains(&HexCoord::new(3, 1)));
        assert!(!even.contains(&HexCoord::new(1, 3)));

        let odd = neighbors(HexCoord::new(3, 2), 10, 10);
        assert!(odd.contains(&HexCoord::new(2, 3)));
        assert!(odd.contains(&HexCoord::new(4, 3)));
        assert!(!odd.contains(&HexCoord::new(2, 1)));
    }

    #[test]
    fn test_neighbors_clipped_at_corner() {
        let corner = neighbors(HexCoord::new(0, 0), 10, 10);
        assert_eq!(corner.len(), 2);
        assert!(corner.contains(&HexCoord::new(0, 1)));
        assert!(corner.contains(&HexCoord::new(1, 0)));
    }

    #[test]
    fn test_hex_key_roundtrip() {
        let hex: HexCoord = "12,7".parse().unwrap();
        assert_eq!(hex, HexCoord::new(12, 7));
        assert_eq!(hex.to_string(), "12,7");
        assert!("12".parse::<HexCoord>().is_err());
        assert!("a,b".parse::<HexCoord>().is_err());
    }
}
