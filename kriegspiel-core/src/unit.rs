//! Units and factions

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::hex::HexCoord;
use crate::terrain::UnitKind;

/// Army color as sent on the wire
pub const ARMY_COLOR_BLUE: &str = "#0000FF";
pub const ARMY_COLOR_RED: &str = "#FF0000";

/// One of the two opposing sides
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Faction {
    Blue,
    Red,
}

impl Faction {
    pub fn opponent(self) -> Self {
        match self {
            Faction::Blue => Faction::Red,
            Faction::Red => Faction::Blue,
        }
    }

    pub fn army_color(self) -> &'static str {
        match self {
            Faction::Blue => ARMY_COLOR_BLUE,
            Faction::Red => ARMY_COLOR_RED,
        }
    }

    /// Map encoding symbol
    pub fn symbol(self) -> char {
        match self {
            Faction::Blue => 'B',
            Faction::Red => 'R',
        }
    }

    /// Parse the faction name used by color assignment ("red" / "blue")
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "red" => Some(Faction::Red),
            "blue" => Some(Faction::Blue),
            _ => None,
        }
    }

    /// Parse an army color ("#FF0000") or a faction name ("red")
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        if value.eq_ignore_ascii_case(ARMY_COLOR_RED) {
            Ok(Faction::Red)
        } else if value.eq_ignore_ascii_case(ARMY_COLOR_BLUE) {
            Ok(Faction::Blue)
        } else {
            Faction::from_name(value).ok_or_else(|| CoreError::UnknownFaction(value.to_string()))
        }
    }

    /// Whether a unit of this faction standing on `row` is past the frontier.
    ///
    /// Blue deploys on the low rows and Red on the high rows, so Red has
    /// crossed at `row <= frontier` and Blue at `row > frontier`.
    pub fn has_crossed(self, row: i32, frontier: i32) -> bool {
        match self {
            Faction::Red => row <= frontier,
            Faction::Blue => row > frontier,
        }
    }
}

impl fmt::Display for Faction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Faction::Blue => write!(f, "blue"),
            Faction::Red => write!(f, "red"),
        }
    }
}

impl TryFrom<String> for Faction {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Faction::parse(&value)
    }
}

impl From<Faction> for String {
    fn from(faction: Faction) -> Self {
        faction.army_color().to_string()
    }
}

/// Stable unit identifier
pub type UnitId = u32;

/// A unit as described by the latest snapshot
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub kind: UnitKind,
    pub faction: Faction,
    pub position: HexCoord,
    pub health: f32,
    /// Progress toward the next hex of the current order
    pub move_points_remaining: f32,
    /// Destination of the last accepted move order, if any
    pub last_order: Option<HexCoord>,
}

impl Unit {
    pub fn new(id: UnitId, kind: UnitKind, faction: Faction, position: HexCoord, health: f32) -> Self {
        Self {
            id,
            kind,
            faction,
            position,
            health,
            move_points_remaining: 0.0,
            last_order: None,
        }
    }

    /// Health 0 means eliminated
    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }
}
