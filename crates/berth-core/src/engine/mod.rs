//! Engine capability implemented by every container runtime backend.
//!
//! Backends translate these calls into their runtime's native API and
//! classify failures into [`EngineError`] kinds. The trait carries no state
//! of its own: every call is one round trip to the runtime, bounded by the
//! caller's [`OpContext`].
mod error;
pub use error::{EngineError, EngineResult};

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use berth_model::{Instance, InstanceId, LabelFilter, ServiceSpec};

use crate::context::OpContext;

/// Generic container engine.
///
/// Implementations must be safe to share across concurrent callers.
/// Calls on the same instance id are not serialized by the engine; callers
/// that race e.g. `stop` and `remove` get whatever the runtime decides.
#[async_trait]
pub trait Engine: Send + Sync {
    /// Backend name used in logs and metrics.
    fn name(&self) -> &'static str;

    /// Create an instance named `name` from `spec` and return its runtime id.
    ///
    /// The instance is created stopped.
    async fn create(
        &self,
        ctx: &OpContext,
        name: &str,
        spec: &ServiceSpec,
    ) -> EngineResult<InstanceId>;

    /// Start an existing instance.
    ///
    /// Returns [`EngineError::InstanceNotFound`] if the runtime does not know `id`.
    async fn start(&self, ctx: &OpContext, id: &str) -> EngineResult<()>;

    /// List instances whose labels satisfy `filter`.
    ///
    /// Stopped instances are included only when `include_stopped` is set.
    /// Ordering is backend-defined.
    async fn list(
        &self,
        ctx: &OpContext,
        filter: &LabelFilter,
        include_stopped: bool,
    ) -> EngineResult<Vec<Instance>>;

    /// Stop an instance using the runtime's default grace period.
    async fn stop(&self, ctx: &OpContext, id: &str) -> EngineResult<()>;

    /// Delete an instance record from the runtime.
    async fn remove(&self, ctx: &OpContext, id: &str) -> EngineResult<()>;
}

#[async_trait]
impl<E> Engine for Arc<E>
where
    E: Engine + ?Sized,
{
    fn name(&self) -> &'static str {
        (**self).name()
    }

    async fn create(
        &self,
        ctx: &OpContext,
        name: &str,
        spec: &ServiceSpec,
    ) -> EngineResult<InstanceId> {
        (**self).create(ctx, name, spec).await
    }

    async fn start(&self, ctx: &OpContext, id: &str) -> EngineResult<()> {
        (**self).start(ctx, id).await
    }

    async fn list(
        &self,
        ctx: &OpContext,
        filter: &LabelFilter,
        include_stopped: bool,
    ) -> EngineResult<Vec<Instance>> {
        (**self).list(ctx, filter, include_stopped).await
    }

    async fn stop(&self, ctx: &OpContext, id: &str) -> EngineResult<()> {
        (**self).stop(ctx, id).await
    }

    async fn remove(&self, ctx: &OpContext, id: &str) -> EngineResult<()> {
        (**self).remove(ctx, id).await
    }
}

/// Engine operation identifier for logs and metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineOp {
    Create,
    Start,
    List,
    Stop,
    Remove,
}

impl EngineOp {
    /// Return label value for metrics.
    #[inline]
    pub fn as_label(&self) -> &'static str {
        match self {
            EngineOp::Create => "create",
            EngineOp::Start => "start",
            EngineOp::List => "list",
            EngineOp::Stop => "stop",
            EngineOp::Remove => "remove",
        }
    }
}

impl fmt::Display for EngineOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}
