use std::sync::Arc;

use crate::engine::{EngineError, EngineOp};

/// Outcome of a single engine call, for metrics classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpOutcome {
    Success,
    NotFound,
    Conflict,
    Canceled,
    Timeout,
    /// Any other failure (invalid spec, runtime error).
    Failure,
}

impl OpOutcome {
    /// Classify a call result.
    pub fn of<T>(res: &Result<T, EngineError>) -> Self {
        match res {
            Ok(_) => OpOutcome::Success,
            Err(EngineError::InstanceNotFound { .. }) => OpOutcome::NotFound,
            Err(EngineError::Conflict(_)) => OpOutcome::Conflict,
            Err(EngineError::Canceled) => OpOutcome::Canceled,
            Err(EngineError::Timeout { .. }) => OpOutcome::Timeout,
            Err(_) => OpOutcome::Failure,
        }
    }

    /// Return label value for metrics.
    #[inline]
    pub fn as_label(&self) -> &'static str {
        match self {
            OpOutcome::Success => "success",
            OpOutcome::NotFound => "not_found",
            OpOutcome::Conflict => "conflict",
            OpOutcome::Canceled => "canceled",
            OpOutcome::Timeout => "timeout",
            OpOutcome::Failure => "failure",
        }
    }
}

/// Backend metrics collection interface.
pub trait MetricsBackend: Send + Sync + 'static {
    /// Record a finished engine call.
    ///
    /// # Arguments
    /// - `engine`: backend name (see [`crate::Engine::name`])
    /// - `op`: which operation ran
    /// - `outcome`: how it ended
    /// - `duration_ms`: wall time of the round trip
    fn record_op(&self, engine: &str, op: EngineOp, outcome: OpOutcome, duration_ms: u64);

    /// Record the size of a successful listing.
    fn record_listed(&self, engine: &str, count: usize);
}

/// Shared handle to metrics backend.
pub type MetricsHandle = Arc<dyn MetricsBackend>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_results() {
        assert_eq!(OpOutcome::of(&Ok::<_, EngineError>(())), OpOutcome::Success);
        assert_eq!(
            OpOutcome::of(&Err::<(), _>(EngineError::not_found("x"))),
            OpOutcome::NotFound
        );
        assert_eq!(
            OpOutcome::of(&Err::<(), _>(EngineError::Conflict("name in use".into()))),
            OpOutcome::Conflict
        );
        assert_eq!(
            OpOutcome::of(&Err::<(), _>(EngineError::Timeout { timeout_ms: 1 })),
            OpOutcome::Timeout
        );
        assert_eq!(
            OpOutcome::of(&Err::<(), _>(EngineError::runtime("docker", None, "x"))),
            OpOutcome::Failure
        );
    }

    #[test]
    fn labels_are_snake_case() {
        assert_eq!(OpOutcome::NotFound.as_label(), "not_found");
        assert_eq!(OpOutcome::Canceled.as_label(), "canceled");
    }
}
