//! Stackfall (workspace facade crate).
//!
//! Re-exports the workspace crates as `stackfall::{types, core, engine}` so
//! applications and integration tests depend on one package while the
//! implementation lives in dedicated crates under `crates/`.

pub use stackfall_core as core;
pub use stackfall_engine as engine;
pub use stackfall_types as types;
