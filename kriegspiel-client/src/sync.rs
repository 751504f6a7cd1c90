//! Sequence-gated snapshot synchronisation
//!
//! [`SyncHandler`] is the inbound state machine. It owns the faction
//! assignment, the last accepted sequence number and the scoring baseline,
//! all of which outlive a single connection.

use tracing::{debug, info, warn};

use kriegspiel_core::{
    compute_score, compute_visibility, encode_map, Faction, GameOutcome, ScoreBaseline,
    ScoreResult, ScoringConfig, WorldView,
};

use crate::error::ClientError;
use crate::protocol::{decode, InboundMessage, Snapshot};
use crate::state::SharedWorld;

/// How a session ended without error
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEnd {
    GameOver {
        outcome: GameOutcome,
        score: ScoreResult,
        final_map: Vec<String>,
    },
    PlayerLeft { army: String },
    /// A send hit a cleanly closed connection
    ConnectionClosed,
}

/// What the inbound loop should do after a message
#[derive(Clone, Debug, PartialEq)]
pub enum Flow {
    Continue,
    Finished(SessionEnd),
}

pub struct SyncHandler {
    supported: Faction,
    faction: Option<Faction>,
    last_accepted: Option<i64>,
    baseline: Option<ScoreBaseline>,
    scoring: ScoringConfig,
    world: SharedWorld,
    finished: bool,
}

impl SyncHandler {
    pub fn new(supported: Faction, scoring: ScoringConfig, world: SharedWorld) -> Self {
        Self {
            supported,
            faction: None,
            last_accepted: None,
            baseline: None,
            scoring,
            world,
            finished: false,
        }
    }

    pub fn world(&self) -> &SharedWorld {
        &self.world
    }

    pub fn faction(&self) -> Option<Faction> {
        self.faction
    }

    pub fn last_accepted(&self) -> Option<i64> {
        self.last_accepted
    }

    pub fn baseline(&self) -> Option<&ScoreBaseline> {
        self.baseline.as_ref()
    }

    /// True once the game has ended; later messages are ignored
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Decode and handle one inbound line. Undecodable lines are logged and
    /// skipped.
    pub fn handle_line(&mut self, line: &str) -> Result<Flow, ClientError> {
        match decode(line) {
            Ok(message) => self.handle(message),
            Err(e) => {
                warn!("Ignoring malformed message: {}", e);
                Ok(Flow::Continue)
            }
        }
    }

    pub fn handle(&mut self, message: InboundMessage) -> Result<Flow, ClientError> {
        if self.finished {
            debug!("Game already over, ignoring {}", message_kind(&message));
            return Ok(Flow::Continue);
        }

        match message {
            InboundMessage::AssignColor { color } => self.assign(&color),
            InboundMessage::StateSync(snapshot) => {
                self.apply_snapshot(*snapshot);
                Ok(Flow::Continue)
            }
            InboundMessage::CombatResult(details) => {
                debug!("Combat result: {}", details);
                Ok(Flow::Continue)
            }
            InboundMessage::GameOver { outcome } => Ok(Flow::Finished(self.game_over(&outcome))),
            InboundMessage::PlayerLeft { army } => {
                info!("Player left: {}", army);
                self.finished = true;
                Ok(Flow::Finished(SessionEnd::PlayerLeft { army }))
            }
            InboundMessage::ChatMessage { sender, text } => {
                info!("[chat] {}: {}", sender, text);
                Ok(Flow::Continue)
            }
            InboundMessage::Unknown { kind } => {
                warn!("Ignoring unknown message type {:?}", kind);
                Ok(Flow::Continue)
            }
        }
    }

    fn assign(&mut self, color: &str) -> Result<Flow, ClientError> {
        let assigned = match Faction::parse(color) {
            Ok(faction) => faction,
            Err(e) => {
                warn!("Ignoring assignment: {}", e);
                return Ok(Flow::Continue);
            }
        };

        if assigned != self.supported {
            return Err(ClientError::UnsupportedFaction {
                assigned,
                supported: self.supported,
            });
        }

        if self.faction.is_none() {
            info!("Assigned to the {} army", assigned);
        }
        self.faction = Some(assigned);
        Ok(Flow::Continue)
    }

    fn apply_snapshot(&mut self, snapshot: Snapshot) {
        let Some(faction) = self.faction else {
            debug!(
                "Discarding snapshot {} received before faction assignment",
                snapshot.sequence_number
            );
            return;
        };

        if let Some(last) = self.last_accepted {
            if snapshot.sequence_number <= last {
                debug!(
                    "Discarding stale snapshot {} (last accepted {})",
                    snapshot.sequence_number, last
                );
                return;
            }
        }

        let view = build_view(snapshot, faction);
        if self.baseline.is_none() {
            self.baseline = Some(ScoreBaseline::capture(&view, faction, &self.scoring));
        }

        debug!(
            "Accepted snapshot {:?} at {} min with {} units",
            view.sequence_number,
            view.game_time_minutes,
            view.units.len()
        );
        self.last_accepted = view.sequence_number;
        self.world.publish(view);
    }

    fn game_over(&mut self, outcome: &str) -> SessionEnd {
        self.finished = true;

        let outcome = GameOutcome::parse(outcome);
        let faction = self.faction.unwrap_or(self.supported);
        let view = self.world.snapshot();
        // Without a snapshot the game is scored against itself
        let baseline = match &self.baseline {
            Some(baseline) => baseline.clone(),
            None => ScoreBaseline::capture(&view, faction, &self.scoring),
        };

        let score = compute_score(&outcome, &view, faction, &baseline, &self.scoring);
        info!("Game over ({:?}), final score {:.2}", outcome, score.value);

        SessionEnd::GameOver {
            outcome,
            score,
            final_map: view.encoded_map.clone(),
        }
    }
}

/// Build the complete view for an accepted snapshot
pub fn build_view(snapshot: Snapshot, faction: Faction) -> WorldView {
    let visibility = compute_visibility(&snapshot.terrain, &snapshot.units, faction);
    let encoded_map = encode_map(&snapshot.terrain, &snapshot.units, &snapshot.combat, &visibility);

    WorldView {
        sequence_number: Some(snapshot.sequence_number),
        game_time_minutes: snapshot.game_time_minutes,
        terrain: snapshot.terrain,
        units: snapshot.units,
        combat: snapshot.combat,
        visibility,
        encoded_map,
    }
}

fn message_kind(message: &InboundMessage) -> &str {
    match message {
        InboundMessage::AssignColor { .. } => "ASSIGN_COLOR",
        InboundMessage::StateSync(_) => "STATE_SYNC",
        InboundMessage::CombatResult(_) => "COMBAT_RESULT",
        InboundMessage::GameOver { .. } => "GAME_OVER",
        InboundMessage::PlayerLeft { .. } => "PLAYER_LEFT",
        InboundMessage::ChatMessage { .. } => "CHAT_MESSAGE",
        InboundMessage::Unknown { kind } => kind,
    }
}
