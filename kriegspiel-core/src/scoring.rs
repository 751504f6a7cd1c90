//! End-of-game scoring
//!
//! A win scores a fixed maximum. Any other outcome is scored from the frozen
//! world view and normalised against the same formula evaluated on the first
//! snapshot, so games with different army sizes stay comparable.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::hex::HexCoord;
use crate::terrain::UnitKind;
use crate::unit::{Faction, Unit, UnitId};
use crate::world::WorldView;

/// Tuning constants for the scoring formula
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Score for a won game
    pub win_score: f64,
    /// Constant added to every raw score
    pub base_offset: f64,
    /// Bonus per unit past the frontier (penalty for opposing units)
    pub crossing_bonus: f64,
    /// Normalised score of a game that ends exactly as it started
    pub normalization_scale: f64,
    /// Value of each unit kind, indexed by wire code
    pub unit_values: [f64; 6],
}

impl Default for ScoringConfig {
    fn default() -> Self {
        let mut values = [0.0f64; 6];
        values[UnitKind::Supply as usize] = 10.0;
        values[UnitKind::Scout as usize] = 20.0;
        values[UnitKind::Infantry as usize] = 30.0;
        values[UnitKind::Cavalry as usize] = 40.0;
        values[UnitKind::Artillery as usize] = 50.0;
        values[UnitKind::General as usize] = 100.0;

        Self {
            win_score: 10000.0,
            base_offset: 1000.0,
            crossing_bonus: 10.0,
            normalization_scale: 100.0,
            unit_values: values,
        }
    }
}

impl ScoringConfig {
    pub fn unit_value(&self, kind: UnitKind) -> f64 {
        self.unit_values[kind as usize]
    }

    fn army_value<'a>(&self, units: impl Iterator<Item = &'a Unit>) -> f64 {
        units.map(|u| self.unit_value(u.kind)).sum()
    }
}

/// How the game ended, as reported by the authoritative side
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameOutcome {
    Won(Faction),
    Other(String),
}

impl GameOutcome {
    /// Parse "red_wins" / "red" style outcome strings
    pub fn parse(outcome: &str) -> Self {
        let name = outcome.trim().to_ascii_lowercase();
        let name = name.strip_suffix("_wins").unwrap_or(&name);
        match Faction::from_name(name) {
            Some(faction) => GameOutcome::Won(faction),
            None => GameOutcome::Other(outcome.to_string()),
        }
    }

    pub fn is_win_for(&self, faction: Faction) -> bool {
        matches!(self, GameOutcome::Won(winner) if *winner == faction)
    }
}

/// State captured from the first accepted snapshot
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScoreBaseline {
    /// Initial position of every unit, by id
    pub initial_positions: FxHashMap<UnitId, HexCoord>,
    /// Number of live opposing units at game start
    pub opposing_count: usize,
    /// Total value of the opposing army at game start
    pub opposing_value: f64,
    /// Raw score of the starting position, used for normalisation
    pub reference_score: f64,
}

impl ScoreBaseline {
    /// Capture the baseline from the first snapshot of a game
    pub fn capture(world: &WorldView, faction: Faction, config: &ScoringConfig) -> Self {
        let initial_positions = world.units.iter().map(|u| (u.id, u.position)).collect();
        let opposing_count = world.live_units(faction.opponent()).count();
        let opposing_value = config.army_value(world.live_units(faction.opponent()));

        let mut baseline = Self {
            initial_positions,
            opposing_count,
            opposing_value,
            reference_score: 0.0,
        };
        baseline.reference_score = raw_score(world, faction, &baseline, config);
        baseline
    }
}

/// Final score of a game; immutable once computed
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoreResult {
    pub value: f64,
}

/// Unnormalised score of `world` from `faction`'s point of view
pub fn raw_score(world: &WorldView, faction: Faction, baseline: &ScoreBaseline, config: &ScoringConfig) -> f64 {
    let frontier = world.frontier_row();
    let opponent = faction.opponent();
    let opposing_general = world.general(opponent).map(|u| u.position);

    let mut friendly_value = 0.0;
    let mut crossing = 0.0;
    let mut moved = 0u32;
    // Capped at twice the frontier so the proximity term never goes negative
    let mut closest = (frontier * 2).max(0) as u32;

    for unit in world.live_units(faction) {
        friendly_value += config.unit_value(unit.kind);
        if faction.has_crossed(unit.position.row, frontier) {
            crossing += config.crossing_bonus;
        }
        if let Some(general) = opposing_general {
            closest = closest.min(unit.position.distance_to(general));
        }
        if let Some(&start) = baseline.initial_positions.get(&unit.id) {
            moved += start.distance_to(unit.position);
        }
    }

    let mut opposing_value = 0.0;
    for unit in world.live_units(opponent) {
        opposing_value += config.unit_value(unit.kind);
        if opponent.has_crossed(unit.position.row, frontier) {
            crossing -= config.crossing_bonus;
        }
    }

    let attrition = baseline.opposing_value - opposing_value;
    let proximity = f64::from(frontier * 2) - f64::from(closest);

    config.base_offset + friendly_value + attrition + crossing + f64::from(moved) + proximity
}

/// Score a finished game
pub fn compute_score(
    outcome: &GameOutcome,
    world: &WorldView,
    faction: Faction,
    baseline: &ScoreBaseline,
    config: &ScoringConfig,
) -> ScoreResult {
    if outcome.is_win_for(faction) {
        return ScoreResult { value: config.win_score };
    }

    let raw = raw_score(world, faction, baseline, config);
    let value = if baseline.reference_score > 0.0 {
        raw / baseline.reference_score * config.normalization_scale
    } else {
        raw
    };
    ScoreResult { value }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::TerrainKind;
    use crate::world::TerrainGrid;

    fn world_with(units: Vec<Unit>) -> WorldView {
        WorldView {
            sequence_number: Some(1),
            terrain: TerrainGrid::filled(10, 10, TerrainKind::Flat),
            units,
            ..WorldView::default()
        }
    }

    fn armies() -> Vec<Unit> {
        vec![
            Unit::new(1, UnitKind::General, Faction::Red, HexCoord::new(9, 5), 10.0),
            Unit::new(2, UnitKind::Infantry, Faction::Red, HexCoord::new(8, 4), 12.0),
            Unit::new(10, UnitKind::General, Faction::Blue, HexCoord::new(0, 5), 10.0),
            Unit::new(11, UnitKind::Cavalry, Faction::Blue, HexCoord::new(1, 4), 15.0),
        ]
    }

    #[test]
    fn test_outcome_parse() {
        assert_eq!(GameOutcome::parse("red_wins"), GameOutcome::Won(Faction::Red));
        assert_eq!(GameOutcome::parse("blue"), GameOutcome::Won(Faction::Blue));
        assert_eq!(GameOutcome::parse("draw"), GameOutcome::Other("draw".to_string()));
        assert!(GameOutcome::parse("RED").is_win_for(Faction::Red));
    }

    #[test]
    fn test_win_is_max_regardless_of_state() {
        let config = ScoringConfig::default();
        let start = world_with(armies());
        let baseline = ScoreBaseline::capture(&start, Faction::Red, &config);
        let wiped = world_with(vec![]);
        let score = compute_score(&GameOutcome::parse("red_wins"), &wiped, Faction::Red, &baseline, &config);
        assert_eq!(score.value, config.win_score);
    }

    #[test]
    fn test_unchanged_game_normalises_to_scale() {
        let config = ScoringConfig::default();
        let world = world_with(armies());
        let baseline = ScoreBaseline::capture(&world, Faction::Red, &config);
        assert_eq!(baseline.opposing_count, 2);
        assert_eq!(baseline.opposing_value, 140.0);
        let score = compute_score(&GameOutcome::parse("blue_wins"), &world, Faction::Red, &baseline, &config);
        assert!((score.value - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_attrition_and_movement_reward() {
        let config = ScoringConfig::default();
        let start = world_with(armies());
        let baseline = ScoreBaseline::capture(&start, Faction::Red, &config);

        let mut later = armies();
        later.retain(|u| u.id != 11); // Blue cavalry destroyed
        later[1].position = HexCoord::new(4, 4); // Red infantry advanced past the frontier
        let later = world_with(later);

        let before = raw_score(&start, Faction::Red, &baseline, &config);
        let after = raw_score(&later, Faction::Red, &baseline, &config);
        // +40 attrition, +10 crossing, +4 moved, proximity improves too
        assert!(after >= before + 54.0, "before={} after={}", before, after);
    }

    #[test]
    fn test_survivors_beat_wipeout() {
        let config = ScoringConfig::default();
        let start = world_with(armies());
        let baseline = ScoreBaseline::capture(&start, Faction::Red, &config);
        let outcome = GameOutcome::parse("blue_wins");

        let survivors = world_with(armies());
        let mut wiped_units = armies();
        for unit in wiped_units.iter_mut().filter(|u| u.faction == Faction::Red) {
            unit.health = 0.0;
        }
        let wiped = world_with(wiped_units);

        let with = compute_score(&outcome, &survivors, Faction::Red, &baseline, &config);
        let without = compute_score(&outcome, &wiped, Faction::Red, &baseline, &config);
        assert!(with.value > without.value);
    }
}
