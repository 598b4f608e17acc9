//! Fixed-timestep session driver
//!
//! Wall-clock time goes into an accumulator; the game only ever sees whole
//! ticks of `tick_ms`. Inputs are stamped with the session clock, which is
//! always a multiple of the tick, so a recording replays exactly.

use log::debug;

use stackfall_core::types::{GameAction, TICK_MS};
use stackfall_core::{EngineConfig, EngineResult, GameState};

use crate::replay::Replay;

#[derive(Debug, Clone)]
pub struct Session {
    config: EngineConfig,
    game: GameState,
    tick_ms: u32,
    clock_ms: u64,
    accumulator_ms: u64,
    recording: Option<Replay>,
}

impl Session {
    /// Validate the config, build the game and start it
    pub fn new(config: EngineConfig, tick_ms: u32) -> EngineResult<Self> {
        let mut game = GameState::from_config(config.clone())?;
        game.start();
        Ok(Self {
            config,
            game,
            tick_ms: tick_ms.max(1),
            clock_ms: 0,
            accumulator_ms: 0,
            recording: None,
        })
    }

    /// Session with the reference 50ms tick
    pub fn with_config(config: EngineConfig) -> EngineResult<Self> {
        Self::new(config, TICK_MS)
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut GameState {
        &mut self.game
    }

    pub fn clock_ms(&self) -> u64 {
        self.clock_ms
    }

    pub fn tick_ms(&self) -> u32 {
        self.tick_ms
    }

    /// Run one fixed tick
    pub fn step(&mut self) -> EngineResult<bool> {
        self.clock_ms += self.tick_ms as u64;
        self.game.tick(self.tick_ms)
    }

    /// Feed wall-clock time; returns the number of ticks run
    pub fn advance(&mut self, elapsed_ms: u64) -> EngineResult<u32> {
        self.accumulator_ms += elapsed_ms;
        let mut steps = 0;
        while self.accumulator_ms >= self.tick_ms as u64 {
            self.accumulator_ms -= self.tick_ms as u64;
            self.step()?;
            steps += 1;
        }
        Ok(steps)
    }

    /// Tick until the clock reaches `at_ms`
    pub fn run_until(&mut self, at_ms: u64) -> EngineResult<()> {
        while self.clock_ms + self.tick_ms as u64 <= at_ms {
            self.step()?;
        }
        Ok(())
    }

    /// Apply an action now, recording it if a recording is running
    pub fn apply(&mut self, action: GameAction) -> EngineResult<bool> {
        if let Some(replay) = self.recording.as_mut() {
            replay.record(self.clock_ms, action);
        }
        self.game.apply_action(action)
    }

    /// Restart from the seed with the clock at zero and record from there
    pub fn start_recording(&mut self) -> EngineResult<()> {
        let mut game = GameState::from_config(self.config.clone())?;
        game.start();
        self.game = game;
        self.clock_ms = 0;
        self.accumulator_ms = 0;
        self.recording = Some(Replay::new(self.config.clone(), self.tick_ms));
        debug!("recording started (seed {})", self.config.seed);
        Ok(())
    }

    pub fn is_recording(&self) -> bool {
        self.recording.is_some()
    }

    /// Stop recording and hand back the replay
    pub fn take_replay(&mut self) -> Option<Replay> {
        let mut replay = self.recording.take()?;
        replay.duration_ms = replay.duration_ms.max(self.clock_ms);
        Some(replay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stackfall_core::types::GameMode;

    #[test]
    fn test_advance_runs_whole_ticks() {
        let mut session = Session::with_config(EngineConfig::default()).unwrap();
        assert_eq!(session.advance(120).unwrap(), 2);
        assert_eq!(session.clock_ms(), 100);
        assert_eq!(session.advance(30).unwrap(), 1);
        assert_eq!(session.clock_ms(), 150);
    }

    #[test]
    fn test_run_until_stops_on_tick_boundary() {
        let mut session = Session::new(EngineConfig::default(), 50).unwrap();
        session.run_until(1_020).unwrap();
        assert_eq!(session.clock_ms(), 1_000);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = EngineConfig {
            lines_per_level: 0,
            ..EngineConfig::default()
        };
        assert!(Session::with_config(config).is_err());
    }

    #[test]
    fn test_recording_captures_clock() {
        let mut session = Session::with_config(EngineConfig::with_seed(5)).unwrap();
        session.advance(500).unwrap();
        session.start_recording().unwrap();
        assert_eq!(session.clock_ms(), 0);
        session.advance(100).unwrap();
        session.apply(GameAction::MoveLeft).unwrap();
        session.apply(GameAction::HardDrop).unwrap();
        session.advance(250).unwrap();

        let replay = session.take_replay().unwrap();
        assert!(!session.is_recording());
        assert_eq!(replay.inputs.len(), 2);
        assert_eq!(replay.inputs[0].at_ms, 100);
        assert_eq!(replay.duration_ms, 350);
        assert_eq!(session.game().mode(), GameMode::Drop);
    }
}
