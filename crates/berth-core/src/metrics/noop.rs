use crate::engine::EngineOp;
use crate::metrics::backend::{MetricsBackend, OpOutcome};

/// No-op metrics backend that compiles to nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpMetrics;

impl MetricsBackend for NoOpMetrics {
    #[inline(always)]
    fn record_op(&self, _: &str, _: EngineOp, _: OpOutcome, _: u64) {}

    #[inline(always)]
    fn record_listed(&self, _: &str, _: usize) {}
}
