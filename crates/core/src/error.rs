//! Engine error kinds
//!
//! Ordinary gameplay never fails: wrong-mode commands and blocked rotations
//! are silent no-ops. Errors are reserved for strict construction, rejected
//! configuration, and the score integrity hook.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// A strict constructor was handed a value outside its domain.
    #[error("invalid {what}: {value}")]
    InvalidArgument { what: &'static str, value: i64 },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// The cumulative score no longer matches its seal. The embedding
    /// application decides what to do about it.
    #[error("score integrity check failed (sealed {expected:#018x}, found {found:#018x})")]
    Integrity { expected: u64, found: u64 },
}

pub type EngineResult<T> = Result<T, EngineError>;
