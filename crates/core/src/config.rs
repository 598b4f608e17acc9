//! Engine configuration
//!
//! Every field has a default matching the reference rules, so a config file
//! only needs to name what it changes:
//!
//! ```
//! use stackfall_core::{EngineConfig, SpeedCurve};
//!
//! let config = EngineConfig {
//!     start_level: 3,
//!     speed_curve: SpeedCurve::Guideline,
//!     ..EngineConfig::default()
//! };
//! assert!(config.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::types::{
    LINES_PER_LEVEL, LOCK_WAIT_MS, MAX_LEVEL, MIN_LEVEL, NEXT_DEPTH, SPAWN_WAIT_MS,
};

/// Upper bound on the preview queue depth
pub const MAX_NEXT_DEPTH: usize = 7;

/// How the drop interval responds to the level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SpeedCurve {
    /// Fixed interval regardless of level (reference behaviour)
    #[default]
    Constant,
    /// `(0.8 - (level - 1) * 0.007) ^ (level - 1)` seconds per row
    Guideline,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Seed for the piece bag and attack blank columns
    pub seed: u32,
    pub start_level: u32,
    pub max_level: u32,
    /// Line-clear value needed per level
    pub lines_per_level: u32,
    pub lock_wait_ms: u32,
    pub spawn_wait_ms: u32,
    /// Number of upcoming pieces exposed to observers
    pub next_depth: usize,
    pub speed_curve: SpeedCurve,
    /// Soft drop during lock delay locks the piece at once
    pub soft_drop_locks: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            start_level: MIN_LEVEL,
            max_level: MAX_LEVEL,
            lines_per_level: LINES_PER_LEVEL,
            lock_wait_ms: LOCK_WAIT_MS,
            spawn_wait_ms: SPAWN_WAIT_MS,
            next_depth: NEXT_DEPTH,
            speed_curve: SpeedCurve::Constant,
            soft_drop_locks: true,
        }
    }
}

impl EngineConfig {
    /// Default config with a specific seed
    pub fn with_seed(seed: u32) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> EngineResult<()> {
        if self.max_level < MIN_LEVEL {
            return Err(EngineError::InvalidConfig(format!(
                "max_level {} is below {}",
                self.max_level, MIN_LEVEL
            )));
        }
        if !(MIN_LEVEL..=self.max_level).contains(&self.start_level) {
            return Err(EngineError::InvalidConfig(format!(
                "start_level {} is outside {}..={}",
                self.start_level, MIN_LEVEL, self.max_level
            )));
        }
        if self.lines_per_level == 0 {
            return Err(EngineError::InvalidConfig(
                "lines_per_level must be positive".to_string(),
            ));
        }
        if self.next_depth == 0 || self.next_depth > MAX_NEXT_DEPTH {
            return Err(EngineError::InvalidConfig(format!(
                "next_depth {} is outside 1..={}",
                self.next_depth, MAX_NEXT_DEPTH
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.lock_wait_ms, 500);
        assert_eq!(config.spawn_wait_ms, 200);
        assert_eq!(config.next_depth, 5);
        assert_eq!(config.speed_curve, SpeedCurve::Constant);
    }

    #[test]
    fn test_rejects_bad_start_level() {
        let config = EngineConfig {
            start_level: 16,
            ..EngineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(EngineError::InvalidConfig(_))
        ));

        let config = EngineConfig {
            start_level: 0,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_quota_and_depth() {
        let config = EngineConfig {
            lines_per_level: 0,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());

        let config = EngineConfig {
            next_depth: 0,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"seed": 99, "speed_curve": "guideline"}"#).unwrap();
        assert_eq!(config.seed, 99);
        assert_eq!(config.speed_curve, SpeedCurve::Guideline);
        assert_eq!(config.lines_per_level, 25);
        assert!(config.soft_drop_locks);
    }
}
