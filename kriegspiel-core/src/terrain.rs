//! Terrain and unit kind definitions with static cost/vision tables

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Terrain category of a hex
///
/// Wire codes: 0=Flat, 1=Mountain, 2=Hill, 3=Swamp, 4=Lake, 5=Forest,
/// 6=Base, -1=Unassigned. Unrecognized codes decode as `Unassigned`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum TerrainKind {
    Flat,
    Mountain,
    Hill,
    Swamp,
    Lake,
    Forest,
    Base,
    Unassigned,
}

impl TerrainKind {
    /// Index into the movement cost columns (None for Base/Unassigned)
    fn cost_column(self) -> Option<usize> {
        match self {
            TerrainKind::Flat => Some(0),
            TerrainKind::Mountain => Some(1),
            TerrainKind::Hill => Some(2),
            TerrainKind::Swamp => Some(3),
            TerrainKind::Lake => Some(4),
            TerrainKind::Forest => Some(5),
            TerrainKind::Base | TerrainKind::Unassigned => None,
        }
    }

    /// Map encoding symbol
    pub fn symbol(self) -> char {
        match self {
            TerrainKind::Flat => 'F',
            TerrainKind::Mountain => 'M',
            TerrainKind::Hill => 'H',
            TerrainKind::Swamp => 'S',
            TerrainKind::Lake => 'L',
            TerrainKind::Forest => 'R', // F is taken by Flat
            TerrainKind::Base | TerrainKind::Unassigned => 'X',
        }
    }
}

impl From<i64> for TerrainKind {
    fn from(code: i64) -> Self {
        match code {
            0 => TerrainKind::Flat,
            1 => TerrainKind::Mountain,
            2 => TerrainKind::Hill,
            3 => TerrainKind::Swamp,
            4 => TerrainKind::Lake,
            5 => TerrainKind::Forest,
            6 => TerrainKind::Base,
            _ => TerrainKind::Unassigned,
        }
    }
}

impl From<TerrainKind> for i64 {
    fn from(terrain: TerrainKind) -> Self {
        match terrain {
            TerrainKind::Flat => 0,
            TerrainKind::Mountain => 1,
            TerrainKind::Hill => 2,
            TerrainKind::Swamp => 3,
            TerrainKind::Lake => 4,
            TerrainKind::Forest => 5,
            TerrainKind::Base => 6,
            TerrainKind::Unassigned => -1,
        }
    }
}

/// Unit category
///
/// Wire codes: 0=Infantry, 1=Artillery, 2=Cavalry, 3=Supply, 4=Scout, 5=General.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum UnitKind {
    Infantry = 0,
    Artillery = 1,
    Cavalry = 2,
    Supply = 3,
    Scout = 4,
    General = 5,
}

pub const ALL_UNIT_KINDS: [UnitKind; 6] = [
    UnitKind::Infantry,
    UnitKind::Artillery,
    UnitKind::Cavalry,
    UnitKind::Supply,
    UnitKind::Scout,
    UnitKind::General,
];

impl UnitKind {
    fn index(self) -> usize {
        self as usize
    }

    /// Map encoding symbol
    pub fn symbol(self) -> char {
        match self {
            UnitKind::Infantry => 'I',
            UnitKind::Artillery => 'A',
            UnitKind::Cavalry => 'C',
            UnitKind::Supply => 'U', // S is taken by Scout
            UnitKind::Scout => 'S',
            UnitKind::General => 'G',
        }
    }
}

impl TryFrom<i64> for UnitKind {
    type Error = CoreError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        ALL_UNIT_KINDS
            .iter()
            .copied()
            .find(|kind| kind.index() as i64 == code)
            .ok_or(CoreError::UnknownUnitKind(code))
    }
}

impl From<UnitKind> for i64 {
    fn from(kind: UnitKind) -> Self {
        kind as i64
    }
}

// ============================================================================
// STATIC TABLES
// ============================================================================

/// Cost to enter a hex, per unit kind (rows) and terrain (Flat, Mountain,
/// Hill, Swamp, Lake, Forest). None means impassable.
static MOVEMENT_COSTS: [[Option<f32>; 6]; 6] = [
    // Infantry
    [Some(1.0), Some(3.0), Some(2.0), Some(2.0), None, Some(2.0)],
    // Artillery
    [Some(1.5), None, Some(3.0), Some(3.0), None, Some(2.0)],
    // Cavalry
    [Some(0.8), None, Some(1.5), Some(2.0), None, Some(1.5)],
    // Supply
    [Some(1.0), None, Some(2.0), Some(3.0), None, Some(2.0)],
    // Scout
    [Some(0.7), Some(1.0), Some(1.0), Some(1.0), None, Some(1.0)],
    // General
    [Some(1.0), Some(3.0), Some(2.0), Some(2.0), None, Some(2.0)],
];

/// Movement cost units covered per game hour
static BASE_SPEED_PER_HOUR: [f32; 6] = [4.0, 3.0, 6.0, 3.0, 7.0, 5.0];

/// Vision radius in hexes; hill/mountain entries replace the base value
#[derive(Clone, Copy, Debug)]
pub struct VisionRange {
    pub base: u32,
    pub hill: Option<u32>,
    pub mountain: Option<u32>,
}

static VISION_RANGES: [VisionRange; 6] = [
    VisionRange { base: 4, hill: Some(6), mountain: Some(8) },   // Infantry
    VisionRange { base: 4, hill: Some(6), mountain: None },      // Artillery
    VisionRange { base: 4, hill: Some(6), mountain: None },      // Cavalry
    VisionRange { base: 2, hill: None, mountain: None },         // Supply
    VisionRange { base: 5, hill: Some(10), mountain: Some(15) }, // Scout
    VisionRange { base: 7, hill: Some(12), mountain: Some(17) }, // General
];

/// Cost for `kind` to enter a hex of `terrain`; None if impassable
pub fn movement_cost(kind: UnitKind, terrain: TerrainKind) -> Option<f32> {
    terrain
        .cost_column()
        .and_then(|column| MOVEMENT_COSTS[kind.index()][column])
}

pub fn is_passable(kind: UnitKind, terrain: TerrainKind) -> bool {
    movement_cost(kind, terrain).is_some()
}

pub fn base_speed_per_hour(kind: UnitKind) -> f32 {
    BASE_SPEED_PER_HOUR[kind.index()]
}

pub fn vision_range(kind: UnitKind) -> &'static VisionRange {
    &VISION_RANGES[kind.index()]
}

/// Vision radius of a unit standing on `terrain`
pub fn vision_radius(kind: UnitKind, terrain: TerrainKind) -> u32 {
    let range = vision_range(kind);
    let elevated = match terrain {
        TerrainKind::Hill => range.hill,
        TerrainKind::Mountain => range.mountain,
        _ => None,
    };
    elevated.unwrap_or(range.base)
}

/// Game minutes to move into a hex; `f32::INFINITY` if impassable
pub fn move_duration_minutes(kind: UnitKind, terrain: TerrainKind) -> f32 {
    let cost = match movement_cost(kind, terrain) {
        Some(cost) if cost > 0.0 => cost,
        _ => return f32::INFINITY,
    };
    let speed = base_speed_per_hour(kind);
    if speed <= 0.0 {
        return f32::INFINITY;
    }
    (cost / speed) * 60.0
}
