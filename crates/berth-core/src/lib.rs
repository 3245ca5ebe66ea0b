pub mod context;
pub mod engine;
pub mod error;
pub mod metered;
pub mod metrics;
pub mod registry;

pub use context::OpContext;
pub use engine::{Engine, EngineError, EngineOp, EngineResult};
pub use error::CoreError;
pub use metered::MeteredEngine;
pub use metrics::{MetricsBackend, MetricsHandle, NoOpMetrics, OpOutcome, noop_metrics};
pub use registry::EngineRegistry;

pub mod prelude {
    pub use crate::context::OpContext;
    pub use crate::engine::{Engine, EngineError, EngineResult};
    pub use crate::registry::EngineRegistry;
    pub use berth_model::{Instance, InstanceId, LabelFilter, Labels, ServiceSpec};
}
