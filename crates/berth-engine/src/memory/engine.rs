use std::sync::{
    RwLock, RwLockReadGuard, RwLockWriteGuard,
    atomic::{AtomicU64, Ordering},
};

use async_trait::async_trait;
use berth_core::{Engine, EngineError, EngineResult, OpContext};
use berth_model::{Instance, InstanceId, LabelFilter, ServiceSpec};
use tracing::trace;

use crate::BACKEND_MEMORY;

#[derive(Debug, Clone)]
struct Record {
    id: InstanceId,
    name: String,
    spec: ServiceSpec,
    running: bool,
}

impl Record {
    /// An empty key never refers to an instance, even one created without a name.
    fn matches(&self, key: &str) -> bool {
        !key.is_empty() && (self.id == key || self.name == key)
    }

    fn to_instance(&self) -> Instance {
        Instance {
            id: self.id.clone(),
            labels: self.spec.labels.clone(),
            running: self.running,
        }
    }
}

/// [`Engine`] that keeps instances in process memory.
///
/// Instances are addressable by id or by name and are listed in creation order.
/// A running instance must be stopped before it can be removed.
#[derive(Debug, Default)]
pub struct MemoryEngine {
    records: RwLock<Vec<Record>>,
    seq: AtomicU64,
}

impl MemoryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of instances currently known, running or not.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Spec an instance was created from.
    pub fn spec_of(&self, key: &str) -> Option<ServiceSpec> {
        self.read()
            .iter()
            .find(|r| r.matches(key))
            .map(|r| r.spec.clone())
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Record>> {
        self.records.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Record>> {
        self.records.write().unwrap_or_else(|e| e.into_inner())
    }

    fn next_id(&self) -> InstanceId {
        let seq = self.seq.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{:016x}", mix64(seq))
    }

    fn set_running(&self, key: &str, running: bool) -> EngineResult<()> {
        let mut records = self.write();
        let record = records
            .iter_mut()
            .find(|r| r.matches(key))
            .ok_or_else(|| EngineError::not_found(key))?;
        record.running = running;
        trace!(id = %record.id, running, "memory instance state changed");
        Ok(())
    }
}

#[async_trait]
impl Engine for MemoryEngine {
    fn name(&self) -> &'static str {
        BACKEND_MEMORY
    }

    async fn create(
        &self,
        ctx: &OpContext,
        name: &str,
        spec: &ServiceSpec,
    ) -> EngineResult<InstanceId> {
        ctx.run(async {
            spec.validate()?;

            let mut records = self.write();
            if !name.is_empty() && records.iter().any(|r| r.name == name) {
                return Err(EngineError::Conflict(format!(
                    "instance name {name:?} is already in use"
                )));
            }

            let id = self.next_id();
            records.push(Record {
                id: id.clone(),
                name: name.to_string(),
                spec: spec.clone(),
                running: false,
            });
            trace!(id = %id, name, "memory instance created");
            Ok(id)
        })
        .await
    }

    async fn start(&self, ctx: &OpContext, id: &str) -> EngineResult<()> {
        ctx.run(async { self.set_running(id, true) }).await
    }

    async fn list(
        &self,
        ctx: &OpContext,
        filter: &LabelFilter,
        include_stopped: bool,
    ) -> EngineResult<Vec<Instance>> {
        ctx.run(async {
            filter.validate()?;
            Ok(self
                .read()
                .iter()
                .filter(|r| include_stopped || r.running)
                .filter(|r| filter.matches(&r.spec.labels))
                .map(Record::to_instance)
                .collect())
        })
        .await
    }

    async fn stop(&self, ctx: &OpContext, id: &str) -> EngineResult<()> {
        ctx.run(async { self.set_running(id, false) }).await
    }

    async fn remove(&self, ctx: &OpContext, id: &str) -> EngineResult<()> {
        ctx.run(async {
            let mut records = self.write();
            let pos = records
                .iter()
                .position(|r| r.matches(id))
                .ok_or_else(|| EngineError::not_found(id))?;

            if records[pos].running {
                return Err(EngineError::Conflict(format!(
                    "cannot remove running instance {id}: stop it first"
                )));
            }
            let removed = records.remove(pos);
            trace!(id = %removed.id, "memory instance removed");
            Ok(())
        })
        .await
    }
}

/// SplitMix64 finalizer; spreads sequence numbers into id-looking values.
fn mix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}
