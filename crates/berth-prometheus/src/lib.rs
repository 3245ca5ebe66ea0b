//! Prometheus metrics backend for berth engine calls.
//!
//! [`PrometheusMetrics`] implements [`berth_core::MetricsBackend`]; wrap an
//! engine in [`berth_core::MeteredEngine`] to feed it.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use berth_core::{Engine, MeteredEngine};
//! use berth_prometheus::{Encoder, PrometheusMetrics, TextEncoder};
//!
//! fn wrap<E: Engine>(engine: E) -> Result<MeteredEngine<E>, Box<dyn std::error::Error>> {
//!     let metrics = PrometheusMetrics::new()?;
//!     let metered = MeteredEngine::new(engine, Arc::new(metrics.clone()));
//!
//!     let mut buffer = Vec::new();
//!     TextEncoder::new().encode(&metrics.gather(), &mut buffer)?;
//!     Ok(metered)
//! }
//! ```
//!
//! ## Metrics
//! - `berth_engine_ops_total{engine, op, outcome}` - Counter
//! - `berth_engine_op_duration_seconds{engine, op}` - Histogram
//! - `berth_engine_listed_instances{engine}` - Gauge, size of the last listing
//!
//! This crate does not serve `/metrics`; expose [`PrometheusMetrics::gather`] from the application's HTTP stack.
mod backend;
pub use backend::PrometheusMetrics;

pub use prometheus::{Encoder, Registry, TextEncoder};
