//! Level module - line quota, level tier and drop speed
//!
//! Progress is measured in line-clear value (see
//! [`line_clear_value`](crate::scoring::line_clear_value)), not raw rows, so a
//! T-spin double moves the level along as much as sixteen single clears.

use log::info;
use serde::{Deserialize, Serialize};

use crate::config::{EngineConfig, SpeedCurve};

/// Drop interval of the constant curve, in milliseconds
///
/// The reference rules fix the exponent input at level 1.2 regardless of the
/// live level: `(0.8 - 1.2 * 0.007) ^ 1.2` seconds.
pub fn constant_drop_interval_ms() -> u32 {
    ((0.8f64 - 1.2 * 0.007).powf(1.2) * 1000.0).round() as u32
}

/// Drop interval of the guideline curve for `level`
pub fn guideline_drop_interval_ms(level: u32) -> u32 {
    let l = level.saturating_sub(1) as f64;
    ((0.8 - l * 0.007).powf(l) * 1000.0).round().max(1.0) as u32
}

pub fn drop_interval_ms(curve: SpeedCurve, level: u32) -> u32 {
    match curve {
        SpeedCurve::Constant => constant_drop_interval_ms(),
        SpeedCurve::Guideline => guideline_drop_interval_ms(level),
    }
}

/// Level tier and quota tracking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelProgression {
    level: u32,
    /// Cumulative line-clear value
    lines: u32,
    /// Remaining value until the next level
    to_next: i64,
    drop_interval_ms: u32,
    start_level: u32,
    max_level: u32,
    lines_per_level: u32,
    curve: SpeedCurve,
}

impl LevelProgression {
    pub fn new(config: &EngineConfig) -> Self {
        let mut progression = Self {
            level: config.start_level,
            lines: 0,
            to_next: config.lines_per_level as i64,
            drop_interval_ms: drop_interval_ms(config.speed_curve, config.start_level),
            start_level: config.start_level,
            max_level: config.max_level,
            lines_per_level: config.lines_per_level,
            curve: config.speed_curve,
        };
        progression.reset();
        progression
    }

    /// Feed `value` toward the quota
    ///
    /// Returns true if the quota wrapped at least once. At the cap the level
    /// stays put but a wrap still counts as a level-up.
    pub fn adjust_lines(&mut self, value: u32) -> bool {
        let mut leveled_up = false;
        self.to_next -= value as i64;
        self.lines = self.lines.saturating_add(value);
        while self.to_next <= 0 {
            self.to_next += self.lines_per_level as i64;
            self.set_level(self.level + 1);
            leveled_up = true;
        }
        if leveled_up {
            info!("level up: {} ({} to next)", self.level, self.to_next);
        }
        leveled_up
    }

    /// Set the level and recompute the drop interval
    ///
    /// Levels below 1 or above the cap are ignored; returns whether the level
    /// was applied.
    pub fn set_level(&mut self, level: u32) -> bool {
        if level > self.max_level || level == 0 {
            return false;
        }
        self.level = level;
        self.drop_interval_ms = drop_interval_ms(self.curve, level);
        true
    }

    /// Back to the start level with an empty quota
    pub fn reset(&mut self) {
        self.lines = 0;
        self.to_next = self.lines_per_level as i64;
        self.level = self.start_level;
        self.drop_interval_ms = drop_interval_ms(self.curve, self.start_level);
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn to_next(&self) -> u32 {
        self.to_next.max(0) as u32
    }

    pub fn drop_interval_ms(&self) -> u32 {
        self.drop_interval_ms
    }

    pub fn max_level(&self) -> u32 {
        self.max_level
    }
}

impl Default for LevelProgression {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_interval() {
        assert_eq!(constant_drop_interval_ms(), 755);
        assert_eq!(drop_interval_ms(SpeedCurve::Constant, 12), 755);
    }

    #[test]
    fn test_guideline_interval_shrinks() {
        assert_eq!(guideline_drop_interval_ms(1), 1000);
        assert_eq!(guideline_drop_interval_ms(2), 793);
        let mut prev = u32::MAX;
        for level in 1..=15 {
            let interval = guideline_drop_interval_ms(level);
            assert!(interval < prev);
            prev = interval;
        }
    }

    #[test]
    fn test_adjust_lines_levels_up_at_quota() {
        let mut levels = LevelProgression::default();
        assert!(!levels.adjust_lines(24));
        assert_eq!(levels.to_next(), 1);
        assert!(levels.adjust_lines(1));
        assert_eq!(levels.level(), 2);
        assert_eq!(levels.to_next(), 25);
        assert_eq!(levels.lines(), 25);
    }

    #[test]
    fn test_adjust_lines_multiple_levels() {
        let mut levels = LevelProgression::default();
        assert!(levels.adjust_lines(60));
        assert_eq!(levels.level(), 3);
        assert_eq!(levels.to_next(), 15);
    }

    #[test]
    fn test_level_caps_at_max() {
        let mut levels = LevelProgression::default();
        assert!(levels.set_level(15));
        let interval = levels.drop_interval_ms();
        // The quota still wraps and reports, the level does not move
        assert!(levels.adjust_lines(25));
        assert_eq!(levels.level(), 15);
        assert_eq!(levels.to_next(), 25);
        assert_eq!(levels.drop_interval_ms(), interval);
        assert!(!levels.adjust_lines(24));
    }

    #[test]
    fn test_set_level_out_of_range_is_noop() {
        let mut levels = LevelProgression::default();
        assert!(!levels.set_level(16));
        assert!(!levels.set_level(0));
        assert_eq!(levels.level(), 1);
    }

    #[test]
    fn test_reset_restores_start() {
        let config = EngineConfig {
            start_level: 4,
            speed_curve: SpeedCurve::Guideline,
            ..EngineConfig::default()
        };
        let mut levels = LevelProgression::new(&config);
        levels.adjust_lines(80);
        levels.reset();
        assert_eq!(levels.level(), 4);
        assert_eq!(levels.lines(), 0);
        assert_eq!(levels.drop_interval_ms(), guideline_drop_interval_ms(4));
    }
}
