//! Rotation module - SRS rotation with wall kicks
//!
//! Kicks are derived from per-rotation reference offsets rather than stored as
//! per-transition deltas. For attempt `i` going from rotation `a` to `b`, the
//! trial shift is `ref[a][i] - ref[b][i]`, with y negated because board rows
//! grow downward. Reference: <https://tetris.wiki/SRS>

use log::debug;

use crate::board::Board;
use crate::pieces::PieceState;
use crate::types::{PieceKind, RotateDirection};

/// Reference offsets as (x, y), y pointing up
pub type Offset = (i8, i8);

/// I piece reference offsets, indexed `[rotation][attempt]`
const I_OFFSETS: [[Offset; 5]; 4] = [
    [(0, 0), (-1, 0), (2, 0), (-1, 0), (2, 0)],
    [(-1, 0), (0, 0), (0, 0), (0, 1), (0, -2)],
    [(-1, 1), (1, 1), (-2, 1), (1, 0), (-2, 0)],
    [(0, 1), (0, 1), (0, 1), (0, -1), (0, 2)],
];

/// Reference offsets shared by J, L, S, Z and T
const JLSZT_OFFSETS: [[Offset; 5]; 4] = [
    [(0, 0), (0, 0), (0, 0), (0, 0), (0, 0)],
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    [(0, 0), (0, 0), (0, 0), (0, 0), (0, 0)],
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
];

/// The O matrix drifts inside its 3x3 box; this single offset per rotation
/// cancels the drift so the O stays put.
const O_OFFSETS: [[Offset; 1]; 4] = [[(0, 0)], [(0, -1)], [(-1, -1)], [(-1, 0)]];

/// Reference offsets for a kind at one rotation
pub fn reference_offsets(kind: PieceKind, rotation: usize) -> &'static [Offset] {
    match kind {
        PieceKind::I => &I_OFFSETS[rotation],
        PieceKind::O => &O_OFFSETS[rotation],
        _ => &JLSZT_OFFSETS[rotation],
    }
}

/// Board-space shift for attempt `attempt` when rotating `from` -> `to`
pub fn kick_offset(kind: PieceKind, from: usize, to: usize, attempt: usize) -> Option<(i8, i8)> {
    let a = reference_offsets(kind, from).get(attempt)?;
    let b = reference_offsets(kind, to).get(attempt)?;
    Some((a.0 - b.0, -(a.1 - b.1)))
}

/// Rotate with wall kicks
///
/// Returns the first kicked placement that fits, or `None` when every attempt
/// collides. The input is never modified.
pub fn try_rotate(board: &Board, piece: &PieceState, direction: RotateDirection) -> Option<PieceState> {
    let target = piece.rotation.rotate(direction);
    let from = piece.rotation.index();
    let to = target.index();
    let attempts = reference_offsets(piece.kind, from).len();

    for attempt in 0..attempts {
        let Some((dx, dy)) = kick_offset(piece.kind, from, to, attempt) else {
            continue;
        };
        let candidate = PieceState {
            rotation: target,
            x: piece.x.saturating_add(dx),
            y: piece.y.saturating_add(dy),
            ..*piece
        };
        if board.can_place(&candidate) {
            if attempt > 0 {
                debug!(
                    "{} kicked by ({}, {}) on attempt {}",
                    piece.kind.label(),
                    dx,
                    dy,
                    attempt
                );
            }
            return Some(candidate);
        }
    }

    None
}

/// Rotate with wall kicks, falling back to the original state
pub fn rotate(board: &Board, piece: &PieceState, direction: RotateDirection) -> PieceState {
    try_rotate(board, piece, direction).unwrap_or(*piece)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Block, Rotation};

    #[test]
    fn test_o_rotation_keeps_cells() {
        let board = Board::new();
        let mut piece = PieceState::spawn(PieceKind::O);
        let mut before: Vec<_> = piece.cells().collect();
        before.sort();
        for _ in 0..4 {
            piece = rotate(&board, &piece, RotateDirection::Clockwise);
            let mut after: Vec<_> = piece.cells().collect();
            after.sort();
            assert_eq!(before, after);
        }
        assert_eq!(piece.rotation, Rotation::North);
    }

    #[test]
    fn test_t_rotates_in_place_on_open_board() {
        let board = Board::new();
        let piece = PieceState::spawn(PieceKind::T);
        let rotated = rotate(&board, &piece, RotateDirection::Clockwise);
        assert_eq!(rotated.rotation, Rotation::East);
        assert_eq!((rotated.x, rotated.y), (piece.x, piece.y));
    }

    #[test]
    fn test_i_clockwise_first_attempt_shift() {
        assert_eq!(kick_offset(PieceKind::I, 0, 1, 0), Some((1, 0)));
        assert_eq!(kick_offset(PieceKind::I, 0, 1, 4), Some((2, -2)));
        assert_eq!(kick_offset(PieceKind::O, 1, 2, 1), None);
    }

    #[test]
    fn test_wall_kick_off_left_wall() {
        let board = Board::new();
        // East-facing T with its stem in column 0; the South shape needs one
        // more column on the left, so the first kick shifts it right.
        let piece = PieceState {
            kind: PieceKind::T,
            rotation: Rotation::East,
            x: -1,
            y: 10,
        };
        assert!(board.can_place(&piece));
        let rotated = rotate(&board, &piece, RotateDirection::Clockwise);
        assert_eq!(rotated.rotation, Rotation::South);
        assert!(board.can_place(&rotated));
        assert_eq!(rotated.x, 0);
    }

    #[test]
    fn test_rotation_near_i8_limit_is_rejected() {
        let board = Board::new();
        let piece = PieceState::new(0, 0, i8::MAX - 1, 0);
        assert!(!board.can_place(&piece));
        assert!(try_rotate(&board, &piece, RotateDirection::Clockwise).is_none());
        assert_eq!(rotate(&board, &piece, RotateDirection::Clockwise), piece);
    }

    #[test]
    fn test_blocked_rotation_returns_original() {
        let mut board = Board::new();
        // Box the I piece in so that every kick collides.
        for y in 0..22 {
            for x in 0..10 {
                board.set(x, y, Some(Block::Garbage));
            }
        }
        let piece = PieceState::spawn(PieceKind::I);
        for (x, y) in piece.cells() {
            board.set(x, y, None);
        }
        assert!(board.can_place(&piece));
        assert_eq!(rotate(&board, &piece, RotateDirection::Clockwise), piece);
        assert!(try_rotate(&board, &piece, RotateDirection::CounterClockwise).is_none());
    }
}
