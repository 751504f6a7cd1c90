//! Kriegspiel Core - Client-side game-state engine
//!
//! This crate provides the pure engine behind the Kriegspiel client:
//! - Hex geometry (offset storage, cube-coordinate distance)
//! - Terrain and unit tables (movement cost, speed, vision)
//! - World view built from authoritative snapshots
//! - Fog-of-war visibility and compact map encoding
//! - A* pathfinding
//! - End-of-game scoring

pub mod error;
pub mod hex;
pub mod terrain;
pub mod unit;
pub mod world;
pub mod visibility;
pub mod encoding;
pub mod pathfinding;
pub mod scoring;

// Re-exports for convenient access
pub use error::CoreError;
pub use hex::{distance, hexes_within, neighbors, HexCoord};
pub use terrain::{
    base_speed_per_hour, is_passable, move_duration_minutes, movement_cost, vision_radius,
    TerrainKind, UnitKind,
};
pub use unit::{Faction, Unit, UnitId};
pub use world::{CombatSet, TerrainGrid, VisibilityMask, WorldView};
pub use visibility::compute_visibility;
pub use encoding::{encode_map, UNKNOWN_TOKEN};
pub use pathfinding::{find_path, next_step, path_duration_minutes};
pub use scoring::{compute_score, GameOutcome, ScoreBaseline, ScoreResult, ScoringConfig};
