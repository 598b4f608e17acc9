//! Replay recording and playback
//!
//! A replay is the config (seed included) plus every accepted-or-not input
//! stamped with the session clock. Because the core is deterministic,
//! playing the inputs back at the same timestamps rebuilds the same game.

use serde::{Deserialize, Serialize};

use stackfall_core::types::GameAction;
use stackfall_core::{EngineConfig, EngineResult};

use crate::runner::Session;

/// An input stamped with the session clock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimedInput {
    pub at_ms: u64,
    pub action: GameAction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replay {
    pub config: EngineConfig,
    pub tick_ms: u32,
    pub inputs: Vec<TimedInput>,
    /// Session clock when recording stopped
    pub duration_ms: u64,
}

impl Replay {
    pub fn new(config: EngineConfig, tick_ms: u32) -> Self {
        Self {
            config,
            tick_ms,
            inputs: Vec::new(),
            duration_ms: 0,
        }
    }

    pub fn record(&mut self, at_ms: u64, action: GameAction) {
        self.inputs.push(TimedInput { at_ms, action });
        self.duration_ms = self.duration_ms.max(at_ms);
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    /// Rebuild the session this replay was recorded from
    ///
    /// Inputs are applied in recorded order once the clock reaches their
    /// timestamp; the clock is then run out to `duration_ms`.
    pub fn play(&self) -> EngineResult<Session> {
        let mut session = Session::new(self.config.clone(), self.tick_ms)?;
        for input in &self.inputs {
            session.run_until(input.at_ms)?;
            session.apply(input.action)?;
        }
        session.run_until(self.duration_ms)?;
        Ok(session)
    }
}
