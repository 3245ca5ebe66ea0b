use std::{future::Future, time::Instant};

use async_trait::async_trait;
use berth_model::{Instance, InstanceId, LabelFilter, ServiceSpec};
use tracing::{debug, warn};

use crate::{
    context::OpContext,
    engine::{Engine, EngineOp, EngineResult},
    metrics::{MetricsHandle, OpOutcome, noop_metrics},
};

/// Engine decorator that logs and measures every call of the wrapped engine.
///
/// Results pass through untouched.
pub struct MeteredEngine<E> {
    inner: E,
    metrics: MetricsHandle,
}

impl<E: Engine> MeteredEngine<E> {
    pub fn new(inner: E, metrics: MetricsHandle) -> Self {
        Self { inner, metrics }
    }

    /// Wrap `inner` with logging only.
    pub fn unmetered(inner: E) -> Self {
        Self::new(inner, noop_metrics())
    }

    pub fn inner(&self) -> &E {
        &self.inner
    }

    async fn observe<T, F>(&self, op: EngineOp, subject: &str, call: F) -> EngineResult<T>
    where
        F: Future<Output = EngineResult<T>>,
    {
        let started = Instant::now();
        let res = call.await;
        let duration_ms = started.elapsed().as_millis() as u64;
        let outcome = OpOutcome::of(&res);
        let engine = self.inner.name();

        self.metrics.record_op(engine, op, outcome, duration_ms);
        match &res {
            Ok(_) => debug!(engine, op = %op, subject, duration_ms, "engine call succeeded"),
            Err(e) if e.is_not_found() => {
                debug!(engine, op = %op, subject, duration_ms, "instance not found")
            }
            Err(e) => warn!(
                engine,
                op = %op,
                subject,
                duration_ms,
                outcome = outcome.as_label(),
                error = %e,
                "engine call failed"
            ),
        }
        res
    }
}

#[async_trait]
impl<E: Engine> Engine for MeteredEngine<E> {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    async fn create(
        &self,
        ctx: &OpContext,
        name: &str,
        spec: &ServiceSpec,
    ) -> EngineResult<InstanceId> {
        self.observe(EngineOp::Create, name, self.inner.create(ctx, name, spec))
            .await
    }

    async fn start(&self, ctx: &OpContext, id: &str) -> EngineResult<()> {
        self.observe(EngineOp::Start, id, self.inner.start(ctx, id))
            .await
    }

    async fn list(
        &self,
        ctx: &OpContext,
        filter: &LabelFilter,
        include_stopped: bool,
    ) -> EngineResult<Vec<Instance>> {
        let res = self
            .observe(
                EngineOp::List,
                "*",
                self.inner.list(ctx, filter, include_stopped),
            )
            .await;
        if let Ok(instances) = &res {
            self.metrics.record_listed(self.inner.name(), instances.len());
        }
        res
    }

    async fn stop(&self, ctx: &OpContext, id: &str) -> EngineResult<()> {
        self.observe(EngineOp::Stop, id, self.inner.stop(ctx, id))
            .await
    }

    async fn remove(&self, ctx: &OpContext, id: &str) -> EngineResult<()> {
        self.observe(EngineOp::Remove, id, self.inner.remove(ctx, id))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EngineError, MetricsBackend};

    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Recorder {
        ops: Mutex<Vec<(String, EngineOp, OpOutcome)>>,
        listed: Mutex<Vec<usize>>,
    }

    impl MetricsBackend for Recorder {
        fn record_op(&self, engine: &str, op: EngineOp, outcome: OpOutcome, _: u64) {
            self.ops
                .lock()
                .unwrap()
                .push((engine.to_string(), op, outcome));
        }

        fn record_listed(&self, _: &str, count: usize) {
            self.listed.lock().unwrap().push(count);
        }
    }

    /// Knows exactly one instance id: "known".
    struct OneInstance;

    #[async_trait]
    impl Engine for OneInstance {
        fn name(&self) -> &'static str {
            "one"
        }

        async fn create(&self, _: &OpContext, _: &str, spec: &ServiceSpec) -> EngineResult<InstanceId> {
            spec.validate()?;
            Ok("known".into())
        }

        async fn start(&self, _: &OpContext, id: &str) -> EngineResult<()> {
            if id == "known" {
                Ok(())
            } else {
                Err(EngineError::not_found(id))
            }
        }

        async fn list(&self, _: &OpContext, _: &LabelFilter, _: bool) -> EngineResult<Vec<Instance>> {
            Ok(vec![Instance {
                id: "known".into(),
                labels: Default::default(),
                running: true,
            }])
        }

        async fn stop(&self, _: &OpContext, _: &str) -> EngineResult<()> {
            Err(EngineError::runtime("one", Some(500), "daemon exploded"))
        }

        async fn remove(&self, _: &OpContext, _: &str) -> EngineResult<()> {
            Err(EngineError::Canceled)
        }
    }

    #[tokio::test]
    async fn records_every_call_with_its_outcome() {
        let recorder = Arc::new(Recorder::default());
        let engine = MeteredEngine::new(OneInstance, recorder.clone());
        let ctx = OpContext::new();

        engine
            .create(&ctx, "svc", &ServiceSpec::new("alpine"))
            .await
            .unwrap();
        engine.create(&ctx, "svc", &ServiceSpec::new("")).await.unwrap_err();
        engine.start(&ctx, "missing").await.unwrap_err();
        engine.list(&ctx, &LabelFilter::new(), true).await.unwrap();
        engine.stop(&ctx, "known").await.unwrap_err();
        engine.remove(&ctx, "known").await.unwrap_err();

        let ops = recorder.ops.lock().unwrap().clone();
        let summary: Vec<_> = ops.iter().map(|(_, op, out)| (*op, *out)).collect();
        assert_eq!(
            summary,
            vec![
                (EngineOp::Create, OpOutcome::Success),
                (EngineOp::Create, OpOutcome::Failure),
                (EngineOp::Start, OpOutcome::NotFound),
                (EngineOp::List, OpOutcome::Success),
                (EngineOp::Stop, OpOutcome::Failure),
                (EngineOp::Remove, OpOutcome::Canceled),
            ]
        );
        assert!(ops.iter().all(|(engine, _, _)| engine == "one"));
        assert_eq!(*recorder.listed.lock().unwrap(), vec![1]);
    }

    #[tokio::test]
    async fn errors_pass_through_unchanged() {
        let engine = MeteredEngine::unmetered(OneInstance);
        let ctx = OpContext::new();

        let err = engine.stop(&ctx, "known").await.unwrap_err();
        assert_eq!(err.status(), Some(500));

        let err = engine.start(&ctx, "other").await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(engine.name(), "one");
        assert_eq!(engine.inner().name(), "one");
    }
}
