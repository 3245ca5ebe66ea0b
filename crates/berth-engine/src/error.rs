use berth_core::CoreError;
use thiserror::Error;

/// Errors raised while constructing or registering a backend.
///
/// Errors of individual engine calls are `berth_core::EngineError`.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("invalid backend configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to connect to {backend} runtime: {reason}")]
    Connect {
        backend: &'static str,
        reason: String,
    },

    #[error(transparent)]
    Registry(#[from] CoreError),
}
