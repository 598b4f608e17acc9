//! Session statistics
//!
//! Plain counters fed by the controller, plus per-minute rates derived from
//! the active play time.

use serde::{Deserialize, Serialize};

use crate::scoring::ScoreResult;
use crate::types::Classification;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub pieces: u32,
    pub hard_drops: u32,
    pub soft_drops: u32,
    pub rotations: u32,
    pub holds: u32,

    pub singles: u32,
    pub doubles: u32,
    pub triples: u32,
    pub tetrises: u32,

    pub twist_no_lines: u32,
    pub twist_singles: u32,
    pub twist_doubles: u32,
    pub twist_triples: u32,

    pub tspin_no_lines: u32,
    pub tspin_singles: u32,
    pub tspin_doubles: u32,
    pub tspin_triples: u32,

    pub cleared_lines: u32,
    pub cleared_line_value: u32,
    pub total_score: u64,
    /// Milliseconds spent in running modes
    pub active_ms: u64,
    pub garbage_rows_received: u32,
    pub attacks_sent: u32,
}

impl SessionStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a resolved lock into the counters
    pub fn record_lock(&mut self, result: &ScoreResult, total_score: u64) {
        let counter = match (result.classification, result.lines) {
            (Classification::LineClear, 1) => Some(&mut self.singles),
            (Classification::LineClear, 2) => Some(&mut self.doubles),
            (Classification::LineClear, 3) => Some(&mut self.triples),
            (Classification::LineClear, 4) => Some(&mut self.tetrises),
            (Classification::Twist, 0) => Some(&mut self.twist_no_lines),
            (Classification::Twist, 1) => Some(&mut self.twist_singles),
            (Classification::Twist, 2) => Some(&mut self.twist_doubles),
            (Classification::Twist, 3) => Some(&mut self.twist_triples),
            (Classification::TSpin, 0) => Some(&mut self.tspin_no_lines),
            (Classification::TSpin, 1) => Some(&mut self.tspin_singles),
            (Classification::TSpin, 2) => Some(&mut self.tspin_doubles),
            (Classification::TSpin, 3) => Some(&mut self.tspin_triples),
            _ => None,
        };
        if let Some(counter) = counter {
            *counter += 1;
        }
        self.cleared_lines += result.lines as u32;
        self.cleared_line_value += result.line_clear_value;
        self.attacks_sent += result.attacks.len() as u32;
        self.total_score = total_score;
    }

    fn per_minute(&self, count: u32) -> f64 {
        if self.active_ms == 0 {
            return 0.0;
        }
        let per_min = count as f64 * 60_000.0 / self.active_ms as f64;
        (per_min * 10.0).round() / 10.0
    }

    /// Pieces per minute, one decimal
    pub fn pieces_per_minute(&self) -> f64 {
        self.per_minute(self.pieces)
    }

    /// Cleared rows per minute, one decimal
    pub fn lines_per_minute(&self) -> f64 {
        self.per_minute(self.cleared_lines)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
