//! Scoring module - lock classification, score tables and the running total
//!
//! Rules:
//! - Classification is decided before the piece is committed: T-spin (T piece,
//!   last input a rotation, 3 of 4 box corners occupied), then twist (piece
//!   cannot move left, right or up), then line clear.
//! - Back-to-back applies a 3/2 multiplier to the base points (before combo
//!   bonus) and to the line-clear value.
//! - Combo bonus is `combo * 100 * level`, using the count before this lock.
//! - The total is sealed after every change; a mismatched seal is reported as
//!   [`EngineError::Integrity`] and the total is left untouched.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::error::{EngineError, EngineResult};
use crate::garbage::AttackLabel;
use crate::pieces::PieceState;
use crate::types::{Classification, PieceKind};

/// Points per combo step, multiplied by the combo count and level
pub const COMBO_INCREMENT: u32 = 100;

/// Combo length from which every further clear sends an attack
pub const COMBO_ATTACK_MIN: u32 = 3;

const B2B_NUMERATOR: u32 = 3;
const B2B_DENOMINATOR: u32 = 2;

/// Bounding-box corners probed for a T-spin, relative to the anchor
const TSPIN_CORNERS: [(i8, i8); 4] = [(0, 0), (2, 0), (0, 2), (2, 2)];

/// At least three box corners blocked (walls and floor count as blocked)
pub fn is_tspin(board: &Board, piece: &PieceState) -> bool {
    if piece.kind != PieceKind::T {
        return false;
    }
    TSPIN_CORNERS
        .iter()
        .filter(|&&(dx, dy)| {
            !board.is_cell_free(piece.x.saturating_add(dx), piece.y.saturating_add(dy))
        })
        .count()
        >= 3
}

/// Piece is wedged: it cannot move left, right or up
pub fn is_twist(board: &Board, piece: &PieceState) -> bool {
    [(-1, 0), (1, 0), (0, -1)]
        .iter()
        .all(|&(dx, dy)| !board.can_place(&piece.shifted(dx, dy)))
}

/// Classify a lock
///
/// `board` is the grid before the piece is committed; `rows_cleared` is the
/// number of rows the commit completes.
pub fn classify(
    board: &Board,
    piece: &PieceState,
    last_move_rotate: bool,
    rows_cleared: usize,
) -> Classification {
    if last_move_rotate && is_tspin(board, piece) {
        Classification::TSpin
    } else if is_twist(board, piece) {
        Classification::Twist
    } else if rows_cleared > 0 {
        Classification::LineClear
    } else {
        Classification::None
    }
}

/// Base points for a classification and row count
pub fn base_score(classification: Classification, lines: usize) -> u32 {
    match (classification, lines) {
        (Classification::LineClear, 1) => 100,
        (Classification::LineClear, 2) => 300,
        (Classification::LineClear, 3) => 500,
        (Classification::LineClear, 4) => 800,
        (Classification::Twist, 0) => 100,
        (Classification::Twist, 1) => 200,
        (Classification::Twist, 2) => 600,
        (Classification::Twist, 3) => 1000,
        (Classification::TSpin, 0) => 300,
        (Classification::TSpin, 1) => 600,
        (Classification::TSpin, 2 | 3) => 900,
        _ => 0,
    }
}

/// Level progress credited for a lock, before back-to-back
fn raw_line_clear_value(classification: Classification, lines: usize) -> u32 {
    match (classification, lines) {
        (Classification::LineClear, 1) => 1,
        (Classification::LineClear, 2) => 3,
        (Classification::LineClear, 3) => 5,
        (Classification::LineClear, 4) => 8,
        (Classification::Twist, 0) => 1,
        (Classification::Twist, 1) => 2,
        (Classification::Twist, 2) => 4,
        (Classification::TSpin, 0) => 8,
        (Classification::TSpin, 1) => 12,
        (Classification::TSpin, 2) => 16,
        (Classification::TSpin, 3) => 20,
        _ => 0,
    }
}

/// Level progress credited for a lock
pub fn line_clear_value(classification: Classification, lines: usize, back_to_back: bool) -> u32 {
    let value = raw_line_clear_value(classification, lines);
    if back_to_back {
        apply_b2b_multiplier(value)
    } else {
        value
    }
}

/// Tetris or T-spin with rows
pub fn qualifies_for_b2b(classification: Classification, lines: usize) -> bool {
    matches!(
        (classification, lines),
        (Classification::LineClear, 4) | (Classification::TSpin, 1..=4)
    )
}

/// Apply the B2B multiplier (3/2, floored)
pub fn apply_b2b_multiplier(points: u32) -> u32 {
    points.saturating_mul(B2B_NUMERATOR) / B2B_DENOMINATOR
}

/// Display name of a move; a plain single has no name
pub fn move_name(classification: Classification, lines: usize, back_to_back: bool) -> String {
    let name = match (classification, lines) {
        (Classification::LineClear, 2) => "Double",
        (Classification::LineClear, 3) => "Triple",
        (Classification::LineClear, 4) => "Tetris",
        (Classification::Twist, 0) => "Twist",
        (Classification::Twist, 1) => "Twist Single",
        (Classification::Twist, 2) => "Twist Double",
        (Classification::Twist, 3) => "Twist Triple",
        (Classification::TSpin, 0) => "T-Spin",
        (Classification::TSpin, 1) => "T-Spin Single",
        (Classification::TSpin, 2) => "T-Spin Double",
        (Classification::TSpin, 3) => "T-Spin Triple",
        _ => "",
    };
    if back_to_back {
        format!("Back2Back {}", name)
    } else {
        name.to_string()
    }
}

/// Attack sent for the clear itself (combos are handled separately)
pub fn clear_attack(classification: Classification, lines: usize) -> Option<AttackLabel> {
    match (classification, lines) {
        (Classification::LineClear, 3) => Some(AttackLabel::Triple),
        (Classification::LineClear, 4) => Some(AttackLabel::Tetris),
        (Classification::TSpin, 1) => Some(AttackLabel::TSpinSingle),
        (Classification::TSpin, 2) => Some(AttackLabel::TSpinDouble),
        (Classification::TSpin, 3) => Some(AttackLabel::TSpinTriple),
        _ => None,
    }
}

/// Seal of a score total
///
/// A splitmix64 finalizer; not cryptographic, only a tamper tripwire.
pub fn seal(total: u64) -> u64 {
    let mut z = total ^ 0x9e37_79b9_7f4a_7c15;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

/// Score calculation result for one lock
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub classification: Classification,
    pub lines: usize,
    /// Base points for the clear (includes B2B multiplier, excludes combo bonus).
    pub line_clear_score: u32,
    pub combo_bonus: u32,
    /// Points added to the total by this lock
    pub total: u32,
    pub line_clear_value: u32,
    pub back_to_back: bool,
    /// Combo count after this lock
    pub combo: u32,
    pub name: String,
    /// Attacks to send, in order
    pub attacks: Vec<AttackLabel>,
}

/// Cumulative score with combo and back-to-back memory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    total: u64,
    seal: u64,
    combo: u32,
    prev_classification: Classification,
    prev_lines: usize,
}

impl Default for Score {
    fn default() -> Self {
        Self::new()
    }
}

impl Score {
    pub fn new() -> Self {
        Self {
            total: 0,
            seal: seal(0),
            combo: 0,
            prev_classification: Classification::None,
            prev_lines: 0,
        }
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    /// Previous qualifying lock as (classification, lines)
    pub fn previous(&self) -> (Classification, usize) {
        (self.prev_classification, self.prev_lines)
    }

    /// Whether a lock would chain back-to-back with the previous one
    pub fn is_back_to_back(&self, classification: Classification, lines: usize) -> bool {
        qualifies_for_b2b(classification, lines)
            && self.prev_classification == classification
            && self.prev_lines == lines
    }

    /// Check the seal against the current total
    pub fn verify(&self) -> EngineResult<()> {
        let found = seal(self.total);
        if found != self.seal {
            warn!("score seal mismatch at total {}", self.total);
            return Err(EngineError::Integrity {
                expected: self.seal,
                found,
            });
        }
        Ok(())
    }

    fn credit(&mut self, amount: u32) -> EngineResult<()> {
        self.verify()?;
        self.total = self.total.saturating_add(amount as u64);
        self.seal = seal(self.total);
        Ok(())
    }

    /// One point per soft drop step
    pub fn add_soft_drop_bonus(&mut self) -> EngineResult<u32> {
        self.credit(1)?;
        Ok(1)
    }

    /// Two points per row dropped
    pub fn add_hard_drop_bonus(&mut self, rows: u32) -> EngineResult<u32> {
        let bonus = rows.saturating_mul(2);
        self.credit(bonus)?;
        Ok(bonus)
    }

    /// Score a lock and update combo and back-to-back memory
    pub fn resolve(
        &mut self,
        classification: Classification,
        lines: usize,
        level: u32,
    ) -> EngineResult<ScoreResult> {
        // Fail before touching combo or memory
        self.verify()?;

        let back_to_back = self.is_back_to_back(classification, lines);
        let base = base_score(classification, lines);
        let line_clear_score = if back_to_back {
            apply_b2b_multiplier(base)
        } else {
            base
        };

        let mut attacks = Vec::new();
        if let Some(label) = clear_attack(classification, lines) {
            attacks.push(label);
        }

        let combo_bonus = if lines == 0 {
            self.combo = 0;
            0
        } else {
            let bonus = self
                .combo
                .saturating_mul(COMBO_INCREMENT)
                .saturating_mul(level);
            self.combo += 1;
            if self.combo >= COMBO_ATTACK_MIN {
                attacks.push(AttackLabel::Combo(self.combo));
            }
            bonus
        };

        let total = line_clear_score.saturating_add(combo_bonus);
        self.credit(total)?;

        let value = line_clear_value(classification, lines, back_to_back);
        if value >= 1 {
            self.prev_classification = classification;
            self.prev_lines = lines;
        }

        let name = move_name(classification, lines, back_to_back);
        if total > 0 {
            debug!(
                "{} {} rows: +{} (combo {}, b2b {})",
                classification.as_str(),
                lines,
                total,
                self.combo,
                back_to_back
            );
        }

        Ok(ScoreResult {
            classification,
            lines,
            line_clear_score,
            combo_bonus,
            total,
            line_clear_value: value,
            back_to_back,
            combo: self.combo,
            name,
            attacks,
        })
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
