//! Pieces module - piece catalog and piece state
//!
//! Each kind has four fixed occupancy matrices, one per rotation. The I piece
//! lives in a 5x5 box, every other kind in a 3x3 box. Matrices are stored
//! padded to 5x5; [`size`] says how much of the box is in use.
//!
//! Matrix rows are indexed by local y (top to bottom), columns by local x.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::types::{PieceKind, Rotation};

/// Offset of a single block relative to the piece anchor
pub type MinoOffset = (i8, i8);

/// Occupied offsets of a piece in one rotation
pub type Minos = [MinoOffset; 4];

/// Occupancy matrix of one (kind, rotation) pair, padded to 5x5
pub type PieceShape = [[u8; 5]; 5];

const fn pad3(m: [[u8; 3]; 3]) -> PieceShape {
    [
        [m[0][0], m[0][1], m[0][2], 0, 0],
        [m[1][0], m[1][1], m[1][2], 0, 0],
        [m[2][0], m[2][1], m[2][2], 0, 0],
        [0; 5],
        [0; 5],
    ]
}

#[rustfmt::skip]
static SHAPES: [[PieceShape; 4]; 7] = [
    // I
    [
        [[0,0,0,0,0], [0,0,0,0,0], [0,1,1,1,1], [0,0,0,0,0], [0,0,0,0,0]],
        [[0,0,0,0,0], [0,0,1,0,0], [0,0,1,0,0], [0,0,1,0,0], [0,0,1,0,0]],
        [[0,0,0,0,0], [0,0,0,0,0], [1,1,1,1,0], [0,0,0,0,0], [0,0,0,0,0]],
        [[0,0,1,0,0], [0,0,1,0,0], [0,0,1,0,0], [0,0,1,0,0], [0,0,0,0,0]],
    ],
    // J
    [
        pad3([[1,0,0], [1,1,1], [0,0,0]]),
        pad3([[0,1,1], [0,1,0], [0,1,0]]),
        pad3([[0,0,0], [1,1,1], [0,0,1]]),
        pad3([[0,1,0], [0,1,0], [1,1,0]]),
    ],
    // L
    [
        pad3([[0,0,1], [1,1,1], [0,0,0]]),
        pad3([[0,1,0], [0,1,0], [0,1,1]]),
        pad3([[0,0,0], [1,1,1], [1,0,0]]),
        pad3([[1,1,0], [0,1,0], [0,1,0]]),
    ],
    // O
    [
        pad3([[0,1,1], [0,1,1], [0,0,0]]),
        pad3([[0,0,0], [0,1,1], [0,1,1]]),
        pad3([[0,0,0], [1,1,0], [1,1,0]]),
        pad3([[1,1,0], [1,1,0], [0,0,0]]),
    ],
    // S
    [
        pad3([[0,1,1], [1,1,0], [0,0,0]]),
        pad3([[0,1,0], [0,1,1], [0,0,1]]),
        pad3([[0,0,0], [0,1,1], [1,1,0]]),
        pad3([[1,0,0], [1,1,0], [0,1,0]]),
    ],
    // Z
    [
        pad3([[1,1,0], [0,1,1], [0,0,0]]),
        pad3([[0,0,1], [0,1,1], [0,1,0]]),
        pad3([[0,0,0], [1,1,0], [0,1,1]]),
        pad3([[0,1,0], [1,1,0], [1,0,0]]),
    ],
    // T
    [
        pad3([[0,1,0], [1,1,1], [0,0,0]]),
        pad3([[0,1,0], [0,1,1], [0,1,0]]),
        pad3([[0,0,0], [1,1,1], [0,1,0]]),
        pad3([[0,1,0], [1,1,0], [0,1,0]]),
    ],
];

/// Occupancy matrix for a kind and rotation
pub fn get_shape(kind: PieceKind, rotation: Rotation) -> &'static PieceShape {
    &SHAPES[kind.index() as usize][rotation.index()]
}

/// Edge length of the bounding box: 5 for I, 3 otherwise
pub fn size(kind: PieceKind) -> u8 {
    match kind {
        PieceKind::I => 5,
        _ => 3,
    }
}

/// Spawn anchor for a kind
pub fn initial_position(kind: PieceKind) -> (i8, i8) {
    match kind {
        PieceKind::I => (2, 0),
        _ => (3, 1),
    }
}

/// Occupancy bit at a local offset; false outside the bounding box
pub fn is_block(kind: PieceKind, rotation: Rotation, local_x: u8, local_y: u8) -> bool {
    let n = size(kind);
    if local_x >= n || local_y >= n {
        return false;
    }
    get_shape(kind, rotation)[local_y as usize][local_x as usize] != 0
}

/// Occupied offsets for a kind and rotation, in row-major order
pub fn minos(kind: PieceKind, rotation: Rotation) -> Minos {
    let shape = get_shape(kind, rotation);
    let n = size(kind) as usize;
    let mut out = [(0i8, 0i8); 4];
    let mut i = 0;
    for (y, row) in shape.iter().enumerate().take(n) {
        for (x, &bit) in row.iter().enumerate().take(n) {
            if bit != 0 && i < out.len() {
                out[i] = (x as i8, y as i8);
                i += 1;
            }
        }
    }
    out
}

/// A piece kind, rotation and anchor position (top-left of the bounding box)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PieceState {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
}

impl PieceState {
    /// Build a piece from raw indices, clamping an out-of-range kind to I and
    /// an out-of-range rotation to North
    pub fn new(kind: i32, rotation: i32, x: i8, y: i8) -> Self {
        Self {
            kind: PieceKind::from_index(kind),
            rotation: Rotation::from_index(rotation),
            x,
            y,
        }
    }

    /// Build a piece from raw indices, failing on out-of-range values
    pub fn try_new(kind: i32, rotation: i32, x: i8, y: i8) -> EngineResult<Self> {
        let kind = PieceKind::try_from_index(kind).ok_or(EngineError::InvalidArgument {
            what: "piece kind",
            value: kind as i64,
        })?;
        let rotation = Rotation::try_from_index(rotation).ok_or(EngineError::InvalidArgument {
            what: "rotation",
            value: rotation as i64,
        })?;
        Ok(Self { kind, rotation, x, y })
    }

    /// A piece at its kind's spawn anchor in rotation 0
    pub fn spawn(kind: PieceKind) -> Self {
        let (x, y) = initial_position(kind);
        Self {
            kind,
            rotation: Rotation::North,
            x,
            y,
        }
    }

    pub fn minos(&self) -> Minos {
        minos(self.kind, self.rotation)
    }

    /// Board coordinates of every occupied block
    ///
    /// Coordinates saturate at the `i8` limits, which always lie off the board.
    pub fn cells(&self) -> impl Iterator<Item = (i8, i8)> + '_ {
        self.minos()
            .into_iter()
            .map(move |(dx, dy)| (self.x.saturating_add(dx), self.y.saturating_add(dy)))
    }

    /// Clone shifted by (dx, dy), saturating at the `i8` limits
    pub fn shifted(&self, dx: i8, dy: i8) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
            ..*self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_shape_has_four_blocks() {
        for kind in PieceKind::ALL {
            for r in 0..4 {
                let rotation = Rotation::from_index(r);
                let n = size(kind);
                let count = (0..n)
                    .flat_map(|y| (0..n).map(move |x| (x, y)))
                    .filter(|&(x, y)| is_block(kind, rotation, x, y))
                    .count();
                assert_eq!(count, 4, "{:?} {:?}", kind, rotation);
            }
        }
    }

    #[test]
    fn test_minos_match_matrix() {
        let m = minos(PieceKind::T, Rotation::North);
        assert_eq!(m, [(1, 0), (0, 1), (1, 1), (2, 1)]);

        let m = minos(PieceKind::I, Rotation::North);
        assert_eq!(m, [(1, 2), (2, 2), (3, 2), (4, 2)]);
    }

    #[test]
    fn test_is_block_outside_box() {
        assert!(!is_block(PieceKind::T, Rotation::North, 3, 0));
        assert!(!is_block(PieceKind::I, Rotation::North, 0, 5));
    }

    #[test]
    fn test_initial_positions() {
        assert_eq!(initial_position(PieceKind::I), (2, 0));
        for kind in &PieceKind::ALL[1..] {
            assert_eq!(initial_position(*kind), (3, 1));
        }
    }

    #[test]
    fn test_cells_saturate_at_i8_limits() {
        let far = PieceState::new(0, 0, i8::MAX, i8::MIN);
        assert!(far.cells().all(|(x, y)| x == i8::MAX && y <= i8::MIN + 3));
        assert_eq!(far.shifted(5, -5).x, i8::MAX);
        assert_eq!(far.shifted(5, -5).y, i8::MIN);
    }

    #[test]
    fn test_piece_state_clamps() {
        let p = PieceState::new(9, 7, 4, 4);
        assert_eq!(p.kind, PieceKind::I);
        assert_eq!(p.rotation, Rotation::North);
    }

    #[test]
    fn test_piece_state_try_new_rejects() {
        assert_eq!(
            PieceState::try_new(7, 0, 0, 0),
            Err(EngineError::InvalidArgument {
                what: "piece kind",
                value: 7
            })
        );
        assert!(PieceState::try_new(0, 4, 0, 0).is_err());
        assert!(PieceState::try_new(6, 3, 0, 0).is_ok());
    }
}
