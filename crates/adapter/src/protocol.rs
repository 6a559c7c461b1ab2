//! Protocol module - JSON message types for the presentation bridge
//!
//! Line-delimited JSON, one message per line. Every message has `type` and
//! `seq`; replies and events echo the `seq` of the request that caused them.

use serde::{Deserialize, Serialize};

use crate::core::{BoardSnapshot as CoreSnapshot, SwapError};
use crate::types::{
    BombKind, Color, FallMove, GameEvent, Orientation, Phase, Pos, RejectReason, SpawnedTile, Tile,
};

/// `[row, col]` on the wire
pub type WirePos = [u8; 2];

fn wire_pos(pos: Pos) -> WirePos {
    [pos.row, pos.col]
}

pub fn pos_from_wire(pos: WirePos) -> Pos {
    Pos::new(pos[0], pos[1])
}

// ============== Client -> Engine Messages ==============

/// Swap request: move the tile at `from` into `to`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapMessage {
    pub seq: u64,
    pub from: WirePos,
    pub to: WirePos,
}

/// Acknowledges the last batch of events (its animation finished)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AckMessage {
    pub seq: u64,
}

/// Asks for the best available swap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HintRequest {
    pub seq: u64,
}

/// Asks for a full board snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotRequest {
    pub seq: u64,
}

// ============== Engine -> Client Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    #[serde(rename = "event")]
    Event,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HintType {
    #[serde(rename = "hint")]
    Hint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SnapshotType {
    #[serde(rename = "snapshot")]
    Snapshot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorType {
    #[serde(rename = "error")]
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    #[serde(rename = "invalid_command")]
    InvalidCommand,
    #[serde(rename = "invalid_swap")]
    InvalidSwap,
    #[serde(rename = "busy")]
    Busy,
}

impl From<SwapError> for ErrorCode {
    fn from(value: SwapError) -> Self {
        match value {
            SwapError::Busy => ErrorCode::Busy,
            SwapError::OutOfBounds(_) | SwapError::NotAdjacent(..) | SwapError::EmptyCell(_) => {
                ErrorCode::InvalidSwap
            }
        }
    }
}

/// One engine event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMessage {
    #[serde(rename = "type")]
    pub msg_type: EventType,
    pub seq: u64,
    pub event: WireEvent,
}

/// Reply to a hint request; `move` is null when no swap does anything
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HintMessage {
    #[serde(rename = "type")]
    pub msg_type: HintType,
    pub seq: u64,
    #[serde(rename = "move")]
    pub swap: Option<[WirePos; 2]>,
}

/// Full board state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotMessage {
    #[serde(rename = "type")]
    pub msg_type: SnapshotType,
    pub seq: u64,
    pub rows: u8,
    pub cols: u8,
    /// Tile codes, one inner array per row
    pub board: Vec<Vec<u8>>,
    pub board_hash: StateHash,
    pub score: u32,
    pub combo: u32,
    pub phase: PhaseLower,
    pub active_colors: u8,
}

/// Error message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorMessage {
    #[serde(rename = "type")]
    pub msg_type: ErrorType,
    pub seq: u64,
    pub code: ErrorCode,
    pub message: String,
}

/// Board hash serialized as 16 lowercase hex digits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateHash(pub u64);

impl Serialize for StateHash {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&format!("{:016x}", self.0))
    }
}

impl<'de> Deserialize<'de> for StateHash {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = <&str>::deserialize(deserializer)?;
        u64::from_str_radix(s.trim(), 16)
            .map(StateHash)
            .map_err(|_| serde::de::Error::custom("invalid hex"))
    }
}

// ============== Wire Enums ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorLower {
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Purple,
    White,
}

impl From<Color> for ColorLower {
    fn from(value: Color) -> Self {
        match value {
            Color::Red => Self::Red,
            Color::Orange => Self::Orange,
            Color::Yellow => Self::Yellow,
            Color::Green => Self::Green,
            Color::Blue => Self::Blue,
            Color::Purple => Self::Purple,
            Color::White => Self::White,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrientationLower {
    Row,
    Column,
}

impl From<Orientation> for OrientationLower {
    fn from(value: Orientation) -> Self {
        match value {
            Orientation::Row => Self::Row,
            Orientation::Column => Self::Column,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BombKindLower {
    Line,
    Color,
}

impl From<BombKind> for BombKindLower {
    fn from(value: BombKind) -> Self {
        match value {
            BombKind::Line => Self::Line,
            BombKind::Color => Self::Color,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RejectReasonWire {
    Invalid,
    NoMatch,
    Busy,
}

impl From<RejectReason> for RejectReasonWire {
    fn from(value: RejectReason) -> Self {
        match value {
            RejectReason::Invalid => Self::Invalid,
            RejectReason::NoMatch => Self::NoMatch,
            RejectReason::Busy => Self::Busy,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhaseLower {
    Idle,
    Resolving,
    Chaining,
    Stalemate,
}

impl From<Phase> for PhaseLower {
    fn from(value: Phase) -> Self {
        match value {
            Phase::Idle => Self::Idle,
            Phase::Resolving => Self::Resolving,
            Phase::Chaining => Self::Chaining,
            Phase::Stalemate => Self::Stalemate,
        }
    }
}

/// A tile as the presentation layer sees it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum WireTile {
    Regular {
        color: ColorLower,
    },
    LineBomb {
        orientation: OrientationLower,
        color: ColorLower,
    },
    ColorBomb,
}

impl From<Tile> for WireTile {
    fn from(value: Tile) -> Self {
        match value {
            Tile::Regular(c) => Self::Regular { color: c.into() },
            Tile::LineBomb { orientation, base } => Self::LineBomb {
                orientation: orientation.into(),
                color: base.into(),
            },
            Tile::ColorBomb => Self::ColorBomb,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireFall {
    pub from: WirePos,
    pub to: WirePos,
    /// Column the tile falls in (tiles never change column)
    pub col: u8,
}

impl From<FallMove> for WireFall {
    fn from(value: FallMove) -> Self {
        Self {
            from: wire_pos(value.from),
            to: wire_pos(value.to),
            col: value.to.col,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireSpawn {
    pub pos: WirePos,
    pub tile: WireTile,
    pub fall: u8,
}

impl From<SpawnedTile> for WireSpawn {
    fn from(value: SpawnedTile) -> Self {
        Self {
            pos: wire_pos(value.pos),
            tile: value.tile.into(),
            fall: value.fall,
        }
    }
}

/// [`GameEvent`] on the wire, tagged by `kind`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum WireEvent {
    TilesSwapped {
        a: WirePos,
        b: WirePos,
    },
    SwapRejected {
        a: WirePos,
        b: WirePos,
        reason: RejectReasonWire,
    },
    TilesMatched {
        positions: Vec<WirePos>,
        score_delta: u32,
    },
    BonusSpawned {
        pos: WirePos,
        tile: WireTile,
    },
    BombDetonated {
        pos: WirePos,
        bomb: BombKindLower,
        destroyed: Vec<WirePos>,
        score_delta: u32,
    },
    TilesFell {
        moves: Vec<WireFall>,
    },
    TilesSpawned {
        tiles: Vec<WireSpawn>,
    },
    ScoreChanged {
        score: u32,
        combo: u32,
    },
    NoValidMoves,
    BoardReshuffled {
        rows: u8,
        cols: u8,
        cells: Vec<u8>,
    },
}

impl From<&GameEvent> for WireEvent {
    fn from(value: &GameEvent) -> Self {
        let positions = |ps: &[Pos]| ps.iter().copied().map(wire_pos).collect::<Vec<_>>();
        match value {
            GameEvent::TilesSwapped { a, b } => Self::TilesSwapped {
                a: wire_pos(*a),
                b: wire_pos(*b),
            },
            GameEvent::SwapRejected { a, b, reason } => Self::SwapRejected {
                a: wire_pos(*a),
                b: wire_pos(*b),
                reason: (*reason).into(),
            },
            GameEvent::TilesMatched {
                positions: ps,
                score_delta,
            } => Self::TilesMatched {
                positions: positions(ps),
                score_delta: *score_delta,
            },
            GameEvent::BonusSpawned { pos, tile } => Self::BonusSpawned {
                pos: wire_pos(*pos),
                tile: (*tile).into(),
            },
            GameEvent::BombDetonated {
                pos,
                kind,
                destroyed,
                score_delta,
            } => Self::BombDetonated {
                pos: wire_pos(*pos),
                bomb: (*kind).into(),
                destroyed: positions(destroyed),
                score_delta: *score_delta,
            },
            GameEvent::TilesFell { moves } => Self::TilesFell {
                moves: moves.iter().copied().map(WireFall::from).collect(),
            },
            GameEvent::TilesSpawned { tiles } => Self::TilesSpawned {
                tiles: tiles.iter().copied().map(WireSpawn::from).collect(),
            },
            GameEvent::ScoreChanged { score, combo } => Self::ScoreChanged {
                score: *score,
                combo: *combo,
            },
            GameEvent::NoValidMoves => Self::NoValidMoves,
            GameEvent::BoardReshuffled { rows, cols, cells } => Self::BoardReshuffled {
                rows: *rows,
                cols: *cols,
                cells: cells
                    .iter()
                    .map(|cell| cell.map_or(crate::types::EMPTY_CODE, |t| t.code()))
                    .collect(),
            },
        }
    }
}

// ============== Message Parsing ==============

/// Parse a JSON message from a string
pub fn parse_message(json: &str) -> Result<ParsedMessage, serde_json::Error> {
    #[derive(Debug, Deserialize)]
    #[serde(tag = "type")]
    enum InboundMessage {
        #[serde(rename = "swap")]
        Swap(SwapMessage),
        #[serde(rename = "ack")]
        Ack(AckMessage),
        #[serde(rename = "hint")]
        Hint(HintRequest),
        #[serde(rename = "snapshot")]
        Snapshot(SnapshotRequest),
    }

    const KNOWN: [&str; 4] = ["swap", "ack", "hint", "snapshot"];

    match serde_json::from_str::<InboundMessage>(json) {
        Ok(InboundMessage::Swap(m)) => Ok(ParsedMessage::Swap(m)),
        Ok(InboundMessage::Ack(m)) => Ok(ParsedMessage::Ack(m)),
        Ok(InboundMessage::Hint(m)) => Ok(ParsedMessage::Hint(m)),
        Ok(InboundMessage::Snapshot(m)) => Ok(ParsedMessage::Snapshot(m)),
        Err(e) => {
            // Unknown message type is not a hard parse error for the protocol.
            #[derive(Debug, Deserialize)]
            struct TypeOnly {
                #[serde(rename = "type")]
                msg_type: Option<String>,
                seq: Option<u64>,
            }
            let head = serde_json::from_str::<TypeOnly>(json)?;
            let msg_type = head.msg_type.unwrap_or_default();
            if !KNOWN.contains(&msg_type.as_str()) {
                return Ok(ParsedMessage::Unknown(UnknownMessage {
                    seq: head.seq.unwrap_or(0),
                    msg_type,
                }));
            }
            Err(e)
        }
    }
}

/// Parsed incoming message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedMessage {
    Swap(SwapMessage),
    Ack(AckMessage),
    Hint(HintRequest),
    Snapshot(SnapshotRequest),
    Unknown(UnknownMessage),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMessage {
    pub seq: u64,
    pub msg_type: String,
}

/// Pull `seq` out of a line that failed to parse, if it is there at all
pub fn extract_seq_best_effort(s: &str) -> Option<u64> {
    let start = s.find("\"seq\"")?;
    let after_key = &s[start + 5..];
    let colon = after_key.find(':')?;
    let rest = after_key[colon + 1..].trim_start();
    let end = rest.bytes().take_while(u8::is_ascii_digit).count();
    if end == 0 {
        return None;
    }
    rest[..end].parse::<u64>().ok()
}

// ============== Utility Functions ==============

pub fn create_event(seq: u64, event: &GameEvent) -> EventMessage {
    EventMessage {
        msg_type: EventType::Event,
        seq,
        event: event.into(),
    }
}

pub fn create_hint(seq: u64, swap: Option<(Pos, Pos)>) -> HintMessage {
    HintMessage {
        msg_type: HintType::Hint,
        seq,
        swap: swap.map(|(a, b)| [wire_pos(a), wire_pos(b)]),
    }
}

pub fn create_snapshot(seq: u64, snapshot: &CoreSnapshot) -> SnapshotMessage {
    SnapshotMessage {
        msg_type: SnapshotType::Snapshot,
        seq,
        rows: snapshot.rows,
        cols: snapshot.cols,
        board: snapshot.rows_iter().map(<[u8]>::to_vec).collect(),
        board_hash: StateHash(snapshot.board_hash),
        score: snapshot.score,
        combo: snapshot.combo,
        phase: snapshot.phase.into(),
        active_colors: snapshot.active_colors,
    }
}

/// Create an error message
pub fn create_error(seq: u64, code: ErrorCode, message: &str) -> ErrorMessage {
    ErrorMessage {
        msg_type: ErrorType::Error,
        seq,
        code,
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_swap() {
        let json = r#"{"type":"swap","seq":4,"from":[3,6],"to":[3,5]}"#;
        match parse_message(json).unwrap() {
            ParsedMessage::Swap(msg) => {
                assert_eq!(msg.seq, 4);
                assert_eq!(pos_from_wire(msg.from), Pos::new(3, 6));
                assert_eq!(pos_from_wire(msg.to), Pos::new(3, 5));
            }
            other => panic!("Expected Swap message, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_ack_hint_snapshot() {
        assert_eq!(
            parse_message(r#"{"type":"ack","seq":2}"#).unwrap(),
            ParsedMessage::Ack(AckMessage { seq: 2 })
        );
        assert_eq!(
            parse_message(r#"{"type":"hint","seq":3}"#).unwrap(),
            ParsedMessage::Hint(HintRequest { seq: 3 })
        );
        assert_eq!(
            parse_message(r#"{"type":"snapshot","seq":5}"#).unwrap(),
            ParsedMessage::Snapshot(SnapshotRequest { seq: 5 })
        );
    }

    #[test]
    fn test_unknown_type_is_not_a_parse_error() {
        match parse_message(r#"{"type":"dance","seq":9}"#).unwrap() {
            ParsedMessage::Unknown(m) => {
                assert_eq!(m.seq, 9);
                assert_eq!(m.msg_type, "dance");
            }
            other => panic!("Expected Unknown message, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_known_type_is_an_error() {
        assert!(parse_message(r#"{"type":"swap","seq":1,"from":[0,0]}"#).is_err());
        assert!(parse_message("not json").is_err());
    }

    #[test]
    fn test_extract_seq_best_effort() {
        assert_eq!(extract_seq_best_effort(r#"{"seq": 42, "from":"#), Some(42));
        assert_eq!(extract_seq_best_effort(r#"{"type":"swap"}"#), None);
    }

    #[test]
    fn test_event_serialization() {
        let event = GameEvent::BombDetonated {
            pos: Pos::new(2, 2),
            kind: BombKind::Line,
            destroyed: vec![Pos::new(2, 2), Pos::new(2, 3)],
            score_delta: 70,
        };
        let value = serde_json::to_value(create_event(7, &event)).unwrap();
        assert_eq!(value["type"], "event");
        assert_eq!(value["seq"], 7);
        assert_eq!(value["event"]["kind"], "bombDetonated");
        assert_eq!(value["event"]["bomb"], "line");
        assert_eq!(value["event"]["scoreDelta"], 70);
        assert_eq!(value["event"]["destroyed"][1], serde_json::json!([2, 3]));
    }

    #[test]
    fn test_event_kind_matches_core_name() {
        let events = [
            GameEvent::NoValidMoves,
            GameEvent::ScoreChanged { score: 1, combo: 1 },
            GameEvent::SwapRejected {
                a: Pos::new(0, 0),
                b: Pos::new(0, 1),
                reason: RejectReason::NoMatch,
            },
        ];
        for event in &events {
            let value = serde_json::to_value(WireEvent::from(event)).unwrap();
            assert_eq!(value["kind"], event.kind());
        }
    }

    #[test]
    fn test_tile_serialization() {
        let tile = Tile::LineBomb {
            orientation: Orientation::Column,
            base: Color::Purple,
        };
        let value = serde_json::to_value(WireTile::from(tile)).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"kind":"lineBomb","orientation":"column","color":"purple"})
        );
        let value = serde_json::to_value(WireTile::from(Tile::ColorBomb)).unwrap();
        assert_eq!(value, serde_json::json!({"kind":"colorBomb"}));
    }

    #[test]
    fn test_fall_move_carries_column() {
        let event = GameEvent::TilesFell {
            moves: vec![FallMove {
                from: Pos::new(1, 4),
                to: Pos::new(3, 4),
            }],
        };
        let value = serde_json::to_value(create_event(3, &event)).unwrap();
        assert_eq!(
            value["event"]["moves"][0],
            serde_json::json!({"from":[1,4],"to":[3,4],"col":4})
        );
    }

    #[test]
    fn test_hint_null_when_no_move() {
        let json = serde_json::to_string(&create_hint(1, None)).unwrap();
        assert_eq!(json, r#"{"type":"hint","seq":1,"move":null}"#);
        let json = serde_json::to_string(&create_hint(
            2,
            Some((Pos::new(0, 2), Pos::new(1, 2))),
        ))
        .unwrap();
        assert_eq!(json, r#"{"type":"hint","seq":2,"move":[[0,2],[1,2]]}"#);
    }

    #[test]
    fn test_state_hash_hex_round_trip() {
        let json = serde_json::to_string(&StateHash(0xabc)).unwrap();
        assert_eq!(json, r#""0000000000000abc""#);
        let back: StateHash = serde_json::from_str(&json).unwrap();
        assert_eq!(back, StateHash(0xabc));
    }

    #[test]
    fn test_swap_error_codes() {
        assert_eq!(ErrorCode::from(SwapError::Busy), ErrorCode::Busy);
        assert_eq!(
            ErrorCode::from(SwapError::EmptyCell(Pos::new(0, 0))),
            ErrorCode::InvalidSwap
        );
        let json = serde_json::to_string(&create_error(1, ErrorCode::InvalidSwap, "x")).unwrap();
        assert!(json.contains(r#""code":"invalid_swap""#));
    }
}
