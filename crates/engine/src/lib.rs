//! Headless driver for the core
//!
//! - [`Session`]: fixed-timestep clock around a [`GameState`](stackfall_core::GameState)
//! - [`Replay`]: timestamped inputs that rebuild a session deterministically
//! - [`place`]: placement planning and a greedy autoplayer

pub mod place;
pub mod replay;
pub mod runner;

pub use stackfall_core as core;
pub use stackfall_types as types;

pub use place::{choose_placement, plan_place, PlaceError};
pub use replay::{Replay, TimedInput};
pub use runner::Session;
