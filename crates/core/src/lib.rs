//! Core game logic - pure, deterministic, and testable
//!
//! This crate contains all the game rules, state management, and simulation logic.
//! It has no dependencies on rendering, input devices, networking or I/O:
//!
//! - **Deterministic**: Same seed and inputs produce identical games
//! - **Clock-free**: the embedding application calls [`GameState::tick`] with elapsed time
//! - **Event driven**: presentation and network events are buffered for the caller to drain
//!
//! # Module Structure
//!
//! - [`board`]: 10x22 grid with collision queries, row collapse and garbage insertion
//! - [`pieces`]: shape tables for the seven kinds and the [`PieceState`] value type
//! - [`rotation`]: SRS rotation with wall kicks
//! - [`rng`]: bag randomizer and the preview queue
//! - [`level`]: line quota, level tier and drop speed
//! - [`scoring`]: lock classification, score tables, combo and back-to-back
//! - [`garbage`]: attack labels and pending garbage
//! - [`game_state`]: the controller state machine
//!
//! # Game Rules
//!
//! - **Bag Randomizer**: each kind appears once per bag of seven
//! - **SRS Rotation**: five kick attempts (one for O, which stays in place)
//! - **Lock Delay**: 500ms before a grounded piece locks; slides and rotations restart it
//! - **Spawn Delay**: 200ms between a lock and the next spawn
//! - **Hold**: once per spawn; the first hold takes the next piece
//! - **T-Spins and Twists**: corner and wedge checks made before the piece is committed
//! - **Levels**: 25 line-clear value per level, levels 1 to 15
//!
//! # Example
//!
//! ```
//! use stackfall_core::GameState;
//! use stackfall_types::GameAction;
//!
//! let mut game = GameState::new(12345);
//! game.start();
//!
//! game.apply_action(GameAction::MoveRight).unwrap();
//! game.apply_action(GameAction::RotateCw).unwrap();
//! game.apply_action(GameAction::HardDrop).unwrap();
//!
//! assert!(game.score() > 0); // Hard drop awards points
//! ```

pub mod board;
pub mod config;
pub mod error;
pub mod events;
pub mod game_state;
pub mod garbage;
pub mod level;
pub mod pieces;
pub mod rng;
pub mod rotation;
pub mod scoring;
pub mod snapshot;
pub mod stats;

pub use stackfall_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use config::{EngineConfig, SpeedCurve};
pub use error::{EngineError, EngineResult};
pub use events::{GameEvent, LockResult, NetEvent};
pub use game_state::GameState;
pub use garbage::{Attack, AttackLabel, GarbageQueue};
pub use level::LevelProgression;
pub use pieces::{get_shape, PieceState};
pub use rng::{NumberBag, PieceQueue, SimpleRng};
pub use rotation::{rotate, try_rotate};
pub use scoring::{Score, ScoreResult};
pub use snapshot::GameSnapshot;
pub use stats::SessionStats;
