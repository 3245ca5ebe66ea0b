//! Registry of named engines.
//!
//! Several backends (or several daemons of the same backend) can be
//! registered side by side; callers pick one by name.
use std::sync::Arc;

use tracing::debug;

use crate::{engine::Engine, error::CoreError};

/// Single registry entry.
pub struct EngineEntry {
    /// Registration name (e.g. `"docker"`, `"docker-remote"`).
    pub name: String,
    /// Concrete engine implementation.
    pub engine: Arc<dyn Engine>,
}

/// Engines indexed by registration name, kept in registration order.
#[derive(Default)]
pub struct EngineRegistry {
    engines: Vec<EngineEntry>,
}

impl EngineRegistry {
    #[inline]
    pub fn new() -> Self {
        Self {
            engines: Vec::new(),
        }
    }

    /// Register `engine` under `name`.
    ///
    /// Names are unique; registering the same name twice is an error.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        engine: Arc<dyn Engine>,
    ) -> Result<(), CoreError> {
        let name = name.into();
        if self.contains(&name) {
            return Err(CoreError::DuplicateEngine { name });
        }
        debug!(name = %name, backend = engine.name(), "engine registered");
        self.engines.push(EngineEntry { name, engine });
        Ok(())
    }

    /// Look up an engine by registration name.
    pub fn get(&self, name: &str) -> Result<Arc<dyn Engine>, CoreError> {
        self.engines
            .iter()
            .find(|e| e.name == name)
            .map(|e| Arc::clone(&e.engine))
            .ok_or_else(|| CoreError::NoEngine(name.to_string()))
    }

    /// First registered engine, if any.
    pub fn first(&self) -> Option<Arc<dyn Engine>> {
        self.engines.first().map(|e| Arc::clone(&e.engine))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.engines.iter().any(|e| e.name == name)
    }

    /// Registration names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.engines.iter().map(|e| e.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.engines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }
}
