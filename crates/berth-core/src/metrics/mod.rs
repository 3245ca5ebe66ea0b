//! Metrics collection abstraction for engine calls.
//!
//! Backends (prometheus, statsd, etc) implement [`MetricsBackend`] and are
//! injected into [`crate::MeteredEngine`].
mod backend;
pub use backend::{MetricsBackend, MetricsHandle, OpOutcome};

mod noop;
pub use noop::NoOpMetrics;

use std::sync::Arc;

/// Create a no-op metrics handle.
#[inline]
pub fn noop_metrics() -> MetricsHandle {
    Arc::new(NoOpMetrics)
}
