//! Strategy seam
//!
//! A strategy reads a world view and proposes moves; it never mutates the
//! view. Anything from a hand-written policy to a closure in a test can
//! drive the client.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use kriegspiel_core::{find_path, is_passable, next_step, Faction, HexCoord, Unit, UnitId, UnitKind, WorldView};

/// A proposed move of one unit to an adjacent hex
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveIntent {
    pub unit_id: UnitId,
    pub target: HexCoord,
}

/// Decide this tick's moves for `faction`, proposing at most `max_orders`
pub trait Strategy: Send {
    fn plan(&mut self, faction: Faction, world: &WorldView, max_orders: usize) -> Vec<MoveIntent>;
}

impl<F> Strategy for F
where
    F: FnMut(Faction, &WorldView, usize) -> Vec<MoveIntent> + Send,
{
    fn plan(&mut self, faction: Faction, world: &WorldView, max_orders: usize) -> Vec<MoveIntent> {
        self(faction, world, max_orders)
    }
}

// ============================================================================
// ADVANCE STRATEGY
// ============================================================================

/// Hexes from the frontier row within which units stop marching and explore
pub const FRONTIER_MARGIN: u32 = 3;

/// Default policy: engage what is visible, otherwise march to the frontier,
/// otherwise scout the fog.
#[derive(Clone, Debug)]
pub struct AdvanceStrategy {
    rng: ChaCha8Rng,
}

impl AdvanceStrategy {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    fn choose_target(unit: &Unit, enemies: &[&Unit], world: &WorldView) -> Option<HexCoord> {
        // Generals never lead the attack
        if unit.kind != UnitKind::General {
            let nearest = enemies
                .iter()
                .min_by_key(|e| (unit.position.distance_to(e.position), e.id));
            if let Some(enemy) = nearest {
                return Some(enemy.position);
            }
        }

        let frontier = world.frontier_row();
        if unit.position.row.abs_diff(frontier) > FRONTIER_MARGIN {
            let crossing = (0..world.cols() as i32)
                .map(|col| HexCoord::new(frontier, col))
                .filter(|&hex| world.terrain.get(hex).map_or(false, |t| is_passable(unit.kind, t)))
                .min_by_key(|&hex| {
                    let drift = hex.col.abs_diff(unit.position.col);
                    (unit.position.distance_to(hex), drift, hex.col)
                });
            if crossing.is_some() {
                return crossing;
            }
        }

        world
            .visibility
            .hidden_hexes()
            .min_by_key(|&hex| (unit.position.distance_to(hex), hex))
    }
}

impl Strategy for AdvanceStrategy {
    fn plan(&mut self, faction: Faction, world: &WorldView, max_orders: usize) -> Vec<MoveIntent> {
        let mut units: Vec<&Unit> = world.live_units(faction).collect();
        units.sort_by_key(|u| u.id);
        units.shuffle(&mut self.rng);
        let enemies: Vec<&Unit> = world.visible_enemies(faction).collect();

        let mut intents = Vec::new();
        for unit in units {
            if intents.len() >= max_orders {
                break;
            }
            let Some(goal) = Self::choose_target(unit, &enemies, world) else {
                continue;
            };
            // Unreachable or already there: hold
            let Some(step) = find_path(&world.terrain, unit.kind, unit.position, goal)
                .as_deref()
                .and_then(next_step)
            else {
                continue;
            };
            intents.push(MoveIntent {
                unit_id: unit.id,
                target: step,
            });
        }
        intents
    }
}
