use std::sync::Arc;

use prometheus::{CounterVec, HistogramOpts, HistogramVec, IntGaugeVec, Opts, Registry, proto::MetricFamily};

use berth_core::{EngineOp, MetricsBackend, OpOutcome};

/// Prometheus metrics backend for engine calls.
///
/// ## Label cardinality
/// All labels are bounded:
/// - `engine`: backend names ("docker", "memory")
/// - `op`: "create", "start", "list", "stop", "remove"
/// - `outcome`: "success", "not_found", "conflict", "canceled", "timeout", "failure"
#[derive(Clone)]
pub struct PrometheusMetrics {
    ops: CounterVec,
    op_duration: HistogramVec,
    listed: IntGaugeVec,
    registry: Arc<Registry>,
}

impl PrometheusMetrics {
    /// Create a backend registering its metrics in `registry`.
    pub fn new_with_registry(registry: Arc<Registry>) -> Result<Self, prometheus::Error> {
        let ops = CounterVec::new(
            Opts::new("ops_total", "Total number of engine calls").namespace("berth_engine"),
            &["engine", "op", "outcome"],
        )?;
        registry.register(Box::new(ops.clone()))?;

        let op_duration = HistogramVec::new(
            HistogramOpts::new("op_duration_seconds", "Engine call round-trip time in seconds")
                .namespace("berth_engine")
                .buckets(vec![0.005, 0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 5.0, 10.0, 30.0]),
            &["engine", "op"],
        )?;
        registry.register(Box::new(op_duration.clone()))?;

        let listed = IntGaugeVec::new(
            Opts::new("listed_instances", "Instances returned by the last successful listing")
                .namespace("berth_engine"),
            &["engine"],
        )?;
        registry.register(Box::new(listed.clone()))?;

        Ok(Self {
            ops,
            op_duration,
            listed,
            registry,
        })
    }

    /// Create a backend with its own registry.
    pub fn new() -> Result<Self, prometheus::Error> {
        Self::new_with_registry(Arc::new(Registry::new()))
    }

    /// Gather all metrics for exposition.
    pub fn gather(&self) -> Vec<MetricFamily> {
        self.registry.gather()
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }
}

impl MetricsBackend for PrometheusMetrics {
    fn record_op(&self, engine: &str, op: EngineOp, outcome: OpOutcome, duration_ms: u64) {
        self.ops
            .with_label_values(&[engine, op.as_label(), outcome.as_label()])
            .inc();
        self.op_duration
            .with_label_values(&[engine, op.as_label()])
            .observe(duration_ms as f64 / 1000.0);
    }

    fn record_listed(&self, engine: &str, count: usize) {
        self.listed
            .with_label_values(&[engine])
            .set(i64::try_from(count).unwrap_or(i64::MAX));
    }
}
