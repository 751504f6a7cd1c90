//! Wire protocol
//!
//! One JSON object per line, tagged by its `type` field. Inbound lines are
//! decoded into [`InboundMessage`]; snapshots are validated into engine types
//! here so the sync handler only ever sees well-formed state.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use kriegspiel_core::{
    CombatSet, CoreError, Faction, HexCoord, TerrainGrid, TerrainKind, Unit, UnitId, UnitKind,
};

use crate::error::ProtocolError;

pub const ASSIGN_COLOR: &str = "ASSIGN_COLOR";
pub const STATE_SYNC: &str = "STATE_SYNC";
pub const COMBAT_RESULT: &str = "COMBAT_RESULT";
pub const GAME_OVER: &str = "GAME_OVER";
pub const PLAYER_LEFT: &str = "PLAYER_LEFT";
pub const CHAT_MESSAGE: &str = "CHAT_MESSAGE";

// ============================================================================
// INBOUND
// ============================================================================

/// A decoded inbound message
#[derive(Clone, Debug, PartialEq)]
pub enum InboundMessage {
    AssignColor { color: String },
    StateSync(Box<Snapshot>),
    /// Informational only; the next snapshot is authoritative
    CombatResult(Value),
    GameOver { outcome: String },
    PlayerLeft { army: String },
    ChatMessage { sender: String, text: String },
    Unknown { kind: String },
}

/// A validated state snapshot
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub sequence_number: i64,
    pub game_time_minutes: f64,
    pub terrain: TerrainGrid,
    pub units: Vec<Unit>,
    pub combat: CombatSet,
}

#[derive(Deserialize)]
struct AssignColorPayload {
    color: String,
}

#[derive(Deserialize)]
struct StateSyncPayload {
    state: StateRecord,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StateRecord {
    sequence_number: i64,
    game_time_in_minutes: f64,
    map: Vec<Vec<TerrainKind>>,
    current_map_rows: usize,
    current_map_cols: usize,
    units: Vec<UnitRecord>,
    #[serde(default)]
    combat_hexes: Vec<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UnitRecord {
    id: UnitId,
    #[serde(rename = "type")]
    kind: UnitKind,
    army_color: Faction,
    row: i32,
    col: i32,
    health: f32,
    #[serde(default)]
    target_row: Option<i32>,
    #[serde(default)]
    target_col: Option<i32>,
    #[serde(default)]
    movement_progress: Option<f32>,
}

impl From<UnitRecord> for Unit {
    fn from(record: UnitRecord) -> Self {
        let mut unit = Unit::new(
            record.id,
            record.kind,
            record.army_color,
            HexCoord::new(record.row, record.col),
            record.health,
        );
        unit.move_points_remaining = record.movement_progress.unwrap_or(0.0);
        unit.last_order = match (record.target_row, record.target_col) {
            (Some(row), Some(col)) => Some(HexCoord::new(row, col)),
            _ => None,
        };
        unit
    }
}

impl StateRecord {
    fn validate(self) -> Result<Snapshot, ProtocolError> {
        let terrain = TerrainGrid::from_rows(self.map, self.current_map_rows, self.current_map_cols)?;
        let combat = self
            .combat_hexes
            .iter()
            .map(|key| key.parse::<HexCoord>())
            .collect::<Result<CombatSet, _>>()?;

        let units: Vec<Unit> = self.units.into_iter().map(Unit::from).collect();
        if let Some(stray) = units.iter().find(|u| !terrain.contains(u.position)) {
            return Err(CoreError::UnitOffMap {
                id: stray.id,
                row: stray.position.row,
                col: stray.position.col,
            }
            .into());
        }

        Ok(Snapshot {
            sequence_number: self.sequence_number,
            game_time_minutes: self.game_time_in_minutes,
            terrain,
            units,
            combat,
        })
    }
}

#[derive(Deserialize)]
struct GameOverPayload {
    outcome: String,
}

#[derive(Deserialize)]
struct PlayerLeftPayload {
    army: String,
}

#[derive(Deserialize)]
struct ChatPayload {
    sender: String,
    text: String,
}

fn payload<T: DeserializeOwned>(kind: &str, value: Value) -> Result<T, ProtocolError> {
    serde_json::from_value(value).map_err(|source| ProtocolError::InvalidPayload {
        kind: kind.to_string(),
        source,
    })
}

/// Decode one inbound line
pub fn decode(text: &str) -> Result<InboundMessage, ProtocolError> {
    let value: Value = serde_json::from_str(text)?;
    let kind = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or(ProtocolError::MissingType)?
        .to_string();

    let message = match kind.as_str() {
        ASSIGN_COLOR => {
            let p: AssignColorPayload = payload(&kind, value)?;
            InboundMessage::AssignColor { color: p.color }
        }
        STATE_SYNC => {
            let p: StateSyncPayload = payload(&kind, value)?;
            InboundMessage::StateSync(Box::new(p.state.validate()?))
        }
        COMBAT_RESULT => InboundMessage::CombatResult(value),
        GAME_OVER => {
            let p: GameOverPayload = payload(&kind, value)?;
            InboundMessage::GameOver { outcome: p.outcome }
        }
        PLAYER_LEFT => {
            let p: PlayerLeftPayload = payload(&kind, value)?;
            InboundMessage::PlayerLeft { army: p.army }
        }
        CHAT_MESSAGE => {
            let p: ChatPayload = payload(&kind, value)?;
            InboundMessage::ChatMessage {
                sender: p.sender,
                text: p.text,
            }
        }
        _ => InboundMessage::Unknown { kind },
    };

    Ok(message)
}

// ============================================================================
// OUTBOUND
// ============================================================================

/// Request to move a unit toward an adjacent hex
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename = "MOVE_ORDER", rename_all = "camelCase")]
pub struct MoveOrder {
    pub unit_id: UnitId,
    pub target_r: i32,
    pub target_c: i32,
}

impl MoveOrder {
    pub fn new(unit_id: UnitId, target: HexCoord) -> Self {
        Self {
            unit_id,
            target_r: target.row,
            target_c: target.col,
        }
    }

    pub fn target(&self) -> HexCoord {
        HexCoord::new(self.target_r, self.target_c)
    }

    /// Encode as a single line, without the trailing newline
    pub fn to_line(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn snapshot_json(seq: i64) -> Value {
        json!({
            "type": "STATE_SYNC",
            "state": {
                "sequenceNumber": seq,
                "gameTimeInMinutes": 90,
                "map": [[0, 1, 2], [3, 4, 5]],
                "currentMapRows": 2,
                "currentMapCols": 3,
                "units": [{
                    "id": 4,
                    "type": 2,
                    "armyColor": "#FF0000",
                    "row": 1,
                    "col": 2,
                    "health": 14.5,
                    "targetRow": 0,
                    "targetCol": 2,
                    "movementProgress": 0.25,
                    "previousRow": 1,
                    "previousCol": 1
                }],
                "combatHexes": ["1,2"]
            }
        })
    }

    #[test]
    fn test_decode_state_sync() {
        let message = decode(&snapshot_json(7).to_string()).unwrap();
        let InboundMessage::StateSync(snapshot) = message else {
            panic!("expected a snapshot");
        };
        assert_eq!(snapshot.sequence_number, 7);
        assert_eq!(snapshot.game_time_minutes, 90.0);
        assert_eq!(snapshot.terrain.get(HexCoord::new(1, 1)), Some(TerrainKind::Lake));

        let unit = &snapshot.units[0];
        assert_eq!(unit.kind, UnitKind::Cavalry);
        assert_eq!(unit.faction, Faction::Red);
        assert_eq!(unit.position, HexCoord::new(1, 2));
        assert_eq!(unit.last_order, Some(HexCoord::new(0, 2)));
        assert!(snapshot.combat.contains(&HexCoord::new(1, 2)));
    }

    #[test]
    fn test_null_target_means_no_order() {
        let mut value = snapshot_json(1);
        value["state"]["units"][0]["targetRow"] = Value::Null;
        value["state"]["units"][0]["movementProgress"] = Value::Null;
        let InboundMessage::StateSync(snapshot) = decode(&value.to_string()).unwrap() else {
            panic!("expected a snapshot");
        };
        assert_eq!(snapshot.units[0].last_order, None);
        assert_eq!(snapshot.units[0].move_points_remaining, 0.0);
    }

    #[test]
    fn test_missing_unit_field_is_an_error() {
        let mut value = snapshot_json(1);
        if let Some(unit) = value["state"]["units"][0].as_object_mut() {
            unit.remove("health");
        }
        assert!(matches!(
            decode(&value.to_string()),
            Err(ProtocolError::InvalidPayload { .. })
        ));
    }

    #[test]
    fn test_dimension_mismatch_is_rejected() {
        let mut value = snapshot_json(1);
        value["state"]["currentMapRows"] = json!(3);
        assert!(matches!(
            decode(&value.to_string()),
            Err(ProtocolError::InvalidSnapshot(_))
        ));
    }

    #[test]
    fn test_unit_off_the_map_is_rejected() {
        let mut value = snapshot_json(1);
        value["state"]["units"][0]["col"] = json!(2147483647);
        assert!(matches!(
            decode(&value.to_string()),
            Err(ProtocolError::InvalidSnapshot(CoreError::UnitOffMap { id: 4, .. }))
        ));

        let mut value = snapshot_json(1);
        value["state"]["units"][0]["row"] = json!(-5);
        assert!(matches!(
            decode(&value.to_string()),
            Err(ProtocolError::InvalidSnapshot(CoreError::UnitOffMap { .. }))
        ));
    }

    #[test]
    fn test_bad_combat_key_is_rejected() {
        let mut value = snapshot_json(1);
        value["state"]["combatHexes"] = json!(["12"]);
        assert!(matches!(
            decode(&value.to_string()),
            Err(ProtocolError::InvalidSnapshot(_))
        ));
    }

    #[test]
    fn test_decode_simple_messages() {
        assert_eq!(
            decode(r#"{"type":"ASSIGN_COLOR","color":"red"}"#).unwrap(),
            InboundMessage::AssignColor { color: "red".to_string() }
        );
        assert_eq!(
            decode(r#"{"type":"GAME_OVER","outcome":"red_wins"}"#).unwrap(),
            InboundMessage::GameOver { outcome: "red_wins".to_string() }
        );
        assert_eq!(
            decode(r#"{"type":"PLAYER_LEFT","army":"blue"}"#).unwrap(),
            InboundMessage::PlayerLeft { army: "blue".to_string() }
        );
        assert!(matches!(
            decode(r#"{"type":"COMBAT_RESULT","attacker":1}"#).unwrap(),
            InboundMessage::CombatResult(_)
        ));
        assert_eq!(
            decode(r#"{"type":"WEATHER","rain":true}"#).unwrap(),
            InboundMessage::Unknown { kind: "WEATHER".to_string() }
        );
    }

    #[test]
    fn test_decode_errors() {
        assert!(matches!(decode("not json"), Err(ProtocolError::Json(_))));
        assert!(matches!(decode(r#"{"color":"red"}"#), Err(ProtocolError::MissingType)));
        assert!(matches!(
            decode(r#"{"type":"CHAT_MESSAGE","sender":"blue"}"#),
            Err(ProtocolError::InvalidPayload { .. })
        ));
    }

    #[test]
    fn test_move_order_wire_format() {
        let order = MoveOrder::new(3, HexCoord::new(1, 2));
        let value: Value = serde_json::from_str(&order.to_line().unwrap()).unwrap();
        assert_eq!(
            value,
            json!({"type": "MOVE_ORDER", "unitId": 3, "targetR": 1, "targetC": 2})
        );
        assert_eq!(order.target(), HexCoord::new(1, 2));
    }
}
