//! Docker backend for `berth_core::Engine`.
//!
//! Translates engine calls into Docker Engine API requests via `bollard`
//! and classifies failures by HTTP status code.
mod config;
mod convert;
mod engine;

pub use config::{DockerConfig, DockerEndpoint};
pub use engine::DockerEngine;

use std::sync::Arc;

use berth_core::EngineRegistry;

use crate::BackendError;

/// Connect a [`DockerEngine`] with `config` and register it under `name`.
pub fn register_docker_engine(
    registry: &mut EngineRegistry,
    name: impl Into<String>,
    config: &DockerConfig,
) -> Result<(), BackendError> {
    let engine = DockerEngine::from_config(config)?;
    registry.register(name, Arc::new(engine))?;
    Ok(())
}
