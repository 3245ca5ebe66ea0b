//! Container runtime backends for the `berth_core::Engine` capability.
//!
//! Each backend lives behind its own feature:
//! - `docker`: Docker Engine API through `bollard`;
//! - `memory`: in-process engine with the same observable contract.
mod error;
pub use error::BackendError;

/// Docker backend identifier for logs and metrics.
pub const BACKEND_DOCKER: &str = "docker";

/// In-memory backend identifier for logs and metrics.
pub const BACKEND_MEMORY: &str = "memory";

#[cfg(feature = "docker")]
pub mod docker;

#[cfg(feature = "memory")]
pub mod memory;
