use berth_model::{InstanceId, ModelError};
use thiserror::Error;

/// Error kinds surfaced at the engine boundary.
///
/// Backends classify runtime failures into these kinds from structured
/// status information; callers can rely on [`EngineError::InstanceNotFound`]
/// for every reference to an id the runtime does not know.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("instance not found: {id}")]
    InstanceNotFound { id: InstanceId },

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("invalid specification: {0}")]
    InvalidSpec(String),

    #[error("operation canceled")]
    Canceled,

    #[error("operation timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("{backend} runtime error: {message}")]
    Runtime {
        backend: &'static str,
        /// Status code reported by the runtime, when it has one.
        status: Option<u16>,
        message: String,
    },
}

pub type EngineResult<T> = Result<T, EngineError>;

impl EngineError {
    pub fn not_found(id: impl Into<InstanceId>) -> Self {
        Self::InstanceNotFound { id: id.into() }
    }

    pub fn runtime(backend: &'static str, status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Runtime {
            backend,
            status,
            message: message.into(),
        }
    }

    #[inline]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::InstanceNotFound { .. })
    }

    /// Runtime status code, if the error carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Runtime { status, .. } => *status,
            _ => None,
        }
    }
}

impl From<ModelError> for EngineError {
    fn from(e: ModelError) -> Self {
        EngineError::InvalidSpec(e.to_string())
    }
}
