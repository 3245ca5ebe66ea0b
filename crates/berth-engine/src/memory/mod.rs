//! In-process backend for `berth_core::Engine`.
//!
//! Keeps instances in memory and follows the same observable contract as
//! the Docker backend: unique names, stopped-on-create, not-found errors for
//! unknown ids, label filtering and the `include_stopped` switch.
mod engine;

pub use engine::MemoryEngine;

use std::sync::Arc;

use berth_core::EngineRegistry;

use crate::BackendError;

/// Register a fresh [`MemoryEngine`] under `name`.
pub fn register_memory_engine(
    registry: &mut EngineRegistry,
    name: impl Into<String>,
) -> Result<(), BackendError> {
    registry.register(name, Arc::new(MemoryEngine::new()))?;
    Ok(())
}
