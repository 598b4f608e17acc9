//! Events emitted by the controller
//!
//! Presentation events describe what happened to the local game. Network
//! events are what a versus transport forwards to the opponent. Both are
//! buffered in the controller and drained by the embedding application.

use serde::{Deserialize, Serialize};

use crate::board::U8Grid;
use crate::garbage::Attack;
use crate::pieces::PieceState;
use crate::scoring::ScoreResult;
use crate::types::PieceKind;

/// Outcome of resolving one lock
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockResult {
    /// Piece as it was committed
    pub piece: PieceState,
    /// Rows removed, top to bottom, as indexed before the collapse
    pub cleared_rows: Vec<usize>,
    pub score: ScoreResult,
    pub leveled_up: bool,
    /// The lock left blocks in the spawn buffer
    pub topped_out: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GameEvent {
    PieceSpawned {
        piece: PieceState,
    },
    PieceMoved {
        piece: PieceState,
    },
    PieceLocked {
        result: LockResult,
    },
    LinesCleared {
        rows: Vec<usize>,
    },
    LevelChanged {
        level: u32,
        to_next: u32,
        total: u32,
    },
    ScoreChanged {
        total: u64,
        delta: u32,
        label: String,
        combo: u32,
        leveled_up: bool,
    },
    GarbageInserted {
        rows: usize,
        blank_column: u8,
    },
    GameOver,
    Reset,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum NetEvent {
    /// Spawned kind, the preview queue and the hold slot
    PieceSync {
        current: PieceKind,
        next: Vec<PieceKind>,
        hold: Option<PieceKind>,
    },
    /// Full grid as cell codes
    BoardSync {
        grid: U8Grid,
    },
    Attack {
        attack: Attack,
    },
    GameOver,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::garbage::AttackLabel;

    #[test]
    fn test_event_json_shape() {
        let event = GameEvent::LevelChanged {
            level: 2,
            to_next: 25,
            total: 25,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "levelChanged");
        assert_eq!(json["level"], 2);

        let net = NetEvent::Attack {
            attack: Attack::new(AttackLabel::TSpinDouble, 4),
        };
        let json = serde_json::to_value(&net).unwrap();
        assert_eq!(json["type"], "attack");
        assert_eq!(json["attack"]["label"], "tspind");
    }
}
