use serde::{Deserialize, Serialize};

use crate::board::U8Grid;
use crate::pieces::PieceState;
use crate::types::{GameMode, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};

/// Point-in-time copy of everything a renderer needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub board: U8Grid,
    pub active: Option<PieceState>,
    pub ghost: Option<PieceState>,
    pub hold: Option<PieceKind>,
    pub next_queue: Vec<PieceKind>,
    pub can_hold: bool,
    pub mode: GameMode,
    pub episode_id: u32,
    pub piece_id: u32,
    pub score: u64,
    pub combo: u32,
    pub level: u32,
    pub lines: u32,
    pub to_next: u32,
    pub drop_interval_ms: u32,
    /// Elapsed time in the current drop/lock/spawn phase
    pub mode_timer_ms: u32,
    pub pending_garbage_rows: usize,
}

impl GameSnapshot {
    pub fn playable(&self) -> bool {
        self.mode.accepts_movement()
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            board: [[0u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
            active: None,
            ghost: None,
            hold: None,
            next_queue: Vec::new(),
            can_hold: true,
            mode: GameMode::Drop,
            episode_id: 0,
            piece_id: 0,
            score: 0,
            combo: 0,
            level: 1,
            lines: 0,
            to_next: 0,
            drop_interval_ms: 0,
            mode_timer_ms: 0,
            pending_garbage_rows: 0,
        }
    }
}
