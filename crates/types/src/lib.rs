//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are plain data with no behaviour beyond conversions, making them
//! usable from the simulation core, replay tooling, and any presentation or
//! network collaborator that consumes engine events.
//!
//! # Board Dimensions
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 22 rows (indexed 0-21), rows 0-1 are the hidden spawn buffer
//!
//! # Timing Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 50 | Reference tick cadence (20 Hz) |
//! | `LOCK_WAIT_MS` | 500 | Grace period before a resting piece locks |
//! | `SPAWN_WAIT_MS` | 200 | Pause between a lock and the next spawn |
//!
//! # Examples
//!
//! ```
//! use stackfall_types::{PieceKind, Rotation, GameAction, BOARD_WIDTH, BOARD_HEIGHT};
//!
//! let piece = PieceKind::from_index(6);
//! assert_eq!(piece, PieceKind::T);
//!
//! // Out-of-range indices clamp to the first kind
//! assert_eq!(PieceKind::from_index(42), PieceKind::I);
//!
//! assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
//! assert_eq!(GameAction::from_str("hardDrop"), Some(GameAction::HardDrop));
//!
//! assert_eq!(BOARD_WIDTH, 10);
//! assert_eq!(BOARD_HEIGHT, 22);
//! ```

use serde::{Deserialize, Serialize};

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Board height in cells (22 rows, including the spawn buffer)
pub const BOARD_HEIGHT: u8 = 22;

/// Rows at the top of the board that pieces spawn into
pub const SPAWN_BUFFER_ROWS: u8 = 2;

/// Reference tick interval in milliseconds (20 Hz)
pub const TICK_MS: u32 = 50;

/// Time a grounded piece may rest before it locks
pub const LOCK_WAIT_MS: u32 = 500;

/// Delay between a lock and the next spawn
pub const SPAWN_WAIT_MS: u32 = 200;

/// Line-clear value needed per level
pub const LINES_PER_LEVEL: u32 = 25;

/// First playable level
pub const MIN_LEVEL: u32 = 1;

/// Highest reachable level
pub const MAX_LEVEL: u32 = 15;

/// Number of upcoming pieces kept in the preview queue
pub const NEXT_DEPTH: usize = 5;

/// Board cell code used for garbage blocks in serialized grids
pub const GARBAGE_CODE: u8 = 8;

/// Number of distinct piece kinds
pub const PIECE_KINDS: usize = 7;

/// The seven piece kinds, in catalog order
///
/// The numeric id (`I = 0` .. `T = 6`) is the identity used everywhere a kind
/// crosses a boundary: board cell codes are `id + 1`, and preview sync
/// messages carry the raw id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PieceKind {
    I,
    J,
    L,
    O,
    S,
    Z,
    T,
}

impl PieceKind {
    /// All kinds in catalog order
    pub const ALL: [PieceKind; PIECE_KINDS] = [
        PieceKind::I,
        PieceKind::J,
        PieceKind::L,
        PieceKind::O,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::T,
    ];

    /// Build a kind from its numeric id, clamping anything outside 0..=6 to `I`
    pub fn from_index(index: i32) -> Self {
        Self::try_from_index(index).unwrap_or(PieceKind::I)
    }

    /// Build a kind from its numeric id, rejecting anything outside 0..=6
    pub fn try_from_index(index: i32) -> Option<Self> {
        if (0..PIECE_KINDS as i32).contains(&index) {
            Some(Self::ALL[index as usize])
        } else {
            None
        }
    }

    /// Numeric id (0..=6)
    pub fn index(self) -> u8 {
        match self {
            PieceKind::I => 0,
            PieceKind::J => 1,
            PieceKind::L => 2,
            PieceKind::O => 3,
            PieceKind::S => 4,
            PieceKind::Z => 5,
            PieceKind::T => 6,
        }
    }

    /// Parse piece kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use stackfall_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("t"), Some(PieceKind::T));
    /// assert_eq!(PieceKind::from_str("O"), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_str("x"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            "o" => Some(PieceKind::O),
            "s" => Some(PieceKind::S),
            "z" => Some(PieceKind::Z),
            "t" => Some(PieceKind::T),
            _ => None,
        }
    }

    /// Display label
    pub fn label(self) -> &'static str {
        match self {
            PieceKind::I => "I",
            PieceKind::J => "J",
            PieceKind::L => "L",
            PieceKind::O => "O",
            PieceKind::S => "S",
            PieceKind::Z => "Z",
            PieceKind::T => "T",
        }
    }
}

/// Rotation states following the Super Rotation System (SRS)
///
/// - **North**: Spawn orientation (index 0)
/// - **East**: Rotated 90° clockwise (index 1)
/// - **South**: Rotated 180° (index 2)
/// - **West**: Rotated 90° counter-clockwise (index 3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rotation {
    North,
    East,
    South,
    West,
}

impl Rotation {
    /// Build a rotation from its index, clamping anything outside 0..=3 to `North`
    pub fn from_index(index: i32) -> Self {
        Self::try_from_index(index).unwrap_or(Rotation::North)
    }

    /// Build a rotation from its index, rejecting anything outside 0..=3
    pub fn try_from_index(index: i32) -> Option<Self> {
        match index {
            0 => Some(Rotation::North),
            1 => Some(Rotation::East),
            2 => Some(Rotation::South),
            3 => Some(Rotation::West),
            _ => None,
        }
    }

    /// Rotation index (0..=3)
    pub fn index(self) -> usize {
        match self {
            Rotation::North => 0,
            Rotation::East => 1,
            Rotation::South => 2,
            Rotation::West => 3,
        }
    }

    /// Rotate clockwise (90°)
    ///
    /// # Examples
    ///
    /// ```
    /// use stackfall_types::Rotation;
    ///
    /// assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
    /// assert_eq!(Rotation::West.rotate_cw(), Rotation::North);
    /// ```
    pub fn rotate_cw(self) -> Self {
        match self {
            Rotation::North => Rotation::East,
            Rotation::East => Rotation::South,
            Rotation::South => Rotation::West,
            Rotation::West => Rotation::North,
        }
    }

    /// Rotate counter-clockwise (-90°)
    pub fn rotate_ccw(self) -> Self {
        match self {
            Rotation::North => Rotation::West,
            Rotation::West => Rotation::South,
            Rotation::South => Rotation::East,
            Rotation::East => Rotation::North,
        }
    }

    /// Apply a rotation direction
    pub fn rotate(self, direction: RotateDirection) -> Self {
        match direction {
            RotateDirection::Clockwise => self.rotate_cw(),
            RotateDirection::CounterClockwise => self.rotate_ccw(),
        }
    }
}

/// Direction of a rotation request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RotateDirection {
    Clockwise,
    CounterClockwise,
}

/// Commands accepted by the game controller
///
/// These are used by live input, replays, and tests alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GameAction {
    /// Slide piece one cell left
    MoveLeft,
    /// Slide piece one cell right
    MoveRight,
    /// Drop piece one cell (locks immediately during lock delay)
    SoftDrop,
    /// Drop piece to its landing row and lock it
    HardDrop,
    /// Rotate piece 90° clockwise with wall kicks
    RotateCw,
    /// Rotate piece 90° counter-clockwise with wall kicks
    RotateCcw,
    /// Swap the active piece with the hold slot
    Hold,
    Pause,
    Resume,
    OpenSettings,
    CloseSettings,
    OpenStats,
    CloseStats,
    /// Reset everything and spawn a fresh piece
    Restart,
}

impl GameAction {
    /// Parse action from its camelCase name (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use stackfall_types::GameAction;
    ///
    /// assert_eq!(GameAction::from_str("moveLeft"), Some(GameAction::MoveLeft));
    /// assert_eq!(GameAction::from_str("ROTATECCW"), Some(GameAction::RotateCcw));
    /// assert_eq!(GameAction::from_str("jump"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" => Some(GameAction::MoveLeft),
            "moveright" => Some(GameAction::MoveRight),
            "softdrop" => Some(GameAction::SoftDrop),
            "harddrop" => Some(GameAction::HardDrop),
            "rotatecw" => Some(GameAction::RotateCw),
            "rotateccw" => Some(GameAction::RotateCcw),
            "hold" => Some(GameAction::Hold),
            "pause" => Some(GameAction::Pause),
            "resume" => Some(GameAction::Resume),
            "opensettings" => Some(GameAction::OpenSettings),
            "closesettings" => Some(GameAction::CloseSettings),
            "openstats" => Some(GameAction::OpenStats),
            "closestats" => Some(GameAction::CloseStats),
            "restart" => Some(GameAction::Restart),
            _ => None,
        }
    }

    /// Convert to camelCase name
    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::MoveLeft => "moveLeft",
            GameAction::MoveRight => "moveRight",
            GameAction::SoftDrop => "softDrop",
            GameAction::HardDrop => "hardDrop",
            GameAction::RotateCw => "rotateCw",
            GameAction::RotateCcw => "rotateCcw",
            GameAction::Hold => "hold",
            GameAction::Pause => "pause",
            GameAction::Resume => "resume",
            GameAction::OpenSettings => "openSettings",
            GameAction::CloseSettings => "closeSettings",
            GameAction::OpenStats => "openStats",
            GameAction::CloseStats => "closeStats",
            GameAction::Restart => "restart",
        }
    }
}

/// Controller mode
///
/// `Drop`, `LockDelay` and `SpawnDelay` are the active play modes; the
/// remaining modes freeze the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GameMode {
    Drop,
    LockDelay,
    SpawnDelay,
    Paused,
    Settings,
    Stats,
    GameOver,
}

impl GameMode {
    /// Whether elapsed time advances the simulation in this mode
    pub fn is_running(self) -> bool {
        matches!(
            self,
            GameMode::Drop | GameMode::LockDelay | GameMode::SpawnDelay
        )
    }

    /// Whether movement commands are accepted in this mode
    pub fn accepts_movement(self) -> bool {
        matches!(self, GameMode::Drop | GameMode::LockDelay)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Drop => "drop",
            GameMode::LockDelay => "lockDelay",
            GameMode::SpawnDelay => "spawnDelay",
            GameMode::Paused => "paused",
            GameMode::Settings => "settings",
            GameMode::Stats => "stats",
            GameMode::GameOver => "gameOver",
        }
    }
}

/// Classification of a lock event
///
/// Precedence when classifying is `TSpin`, then `Twist`, then `LineClear`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    #[default]
    None,
    LineClear,
    Twist,
    TSpin,
}

impl Classification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::None => "none",
            Classification::LineClear => "lineclear",
            Classification::Twist => "twist",
            Classification::TSpin => "tspin",
        }
    }
}

/// Contents of an occupied board cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Block {
    /// Placed by a locked piece of this kind
    Piece(PieceKind),
    /// Inserted by an incoming attack
    Garbage,
}

impl Block {
    /// Serialized cell code: `kind + 1` for pieces, [`GARBAGE_CODE`] for garbage
    pub fn code(self) -> u8 {
        match self {
            Block::Piece(kind) => kind.index() + 1,
            Block::Garbage => GARBAGE_CODE,
        }
    }
}

/// A cell on the game board
///
/// - `None`: Empty cell
/// - `Some(Block)`: Occupied cell
pub type Cell = Option<Block>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_timing_defaults() {
        assert_eq!(TICK_MS, 50);
        assert_eq!(LOCK_WAIT_MS, 500);
        assert_eq!(SPAWN_WAIT_MS, 200);
        assert_eq!(LINES_PER_LEVEL, 25);
        assert_eq!(MAX_LEVEL, 15);
    }

    #[test]
    fn test_piece_kind_index_roundtrip() {
        for (i, kind) in PieceKind::ALL.iter().enumerate() {
            assert_eq!(kind.index() as usize, i);
            assert_eq!(PieceKind::from_index(i as i32), *kind);
        }
    }

    #[test]
    fn test_piece_kind_clamps_out_of_range() {
        assert_eq!(PieceKind::from_index(-1), PieceKind::I);
        assert_eq!(PieceKind::from_index(7), PieceKind::I);
        assert_eq!(PieceKind::try_from_index(7), None);
    }

    #[test]
    fn test_rotation_clamps_out_of_range() {
        assert_eq!(Rotation::from_index(4), Rotation::North);
        assert_eq!(Rotation::from_index(-2), Rotation::North);
        assert_eq!(Rotation::from_index(3), Rotation::West);
    }

    #[test]
    fn test_rotation_cycle() {
        let mut r = Rotation::North;
        for _ in 0..4 {
            r = r.rotate(RotateDirection::Clockwise);
        }
        assert_eq!(r, Rotation::North);
        assert_eq!(Rotation::North.rotate(RotateDirection::CounterClockwise), Rotation::West);
    }

    #[test]
    fn test_block_codes() {
        assert_eq!(Block::Piece(PieceKind::I).code(), 1);
        assert_eq!(Block::Piece(PieceKind::T).code(), 7);
        assert_eq!(Block::Garbage.code(), GARBAGE_CODE);
    }

    #[test]
    fn test_mode_flags() {
        assert!(GameMode::LockDelay.accepts_movement());
        assert!(!GameMode::SpawnDelay.accepts_movement());
        assert!(GameMode::SpawnDelay.is_running());
        assert!(!GameMode::Stats.is_running());
    }

    #[test]
    fn test_action_names_roundtrip() {
        for action in [
            GameAction::MoveLeft,
            GameAction::HardDrop,
            GameAction::OpenStats,
            GameAction::Restart,
        ] {
            assert_eq!(GameAction::from_str(action.as_str()), Some(action));
        }
    }
}
