use std::time::Duration;

use async_trait::async_trait;
use berth_core::{Engine, EngineError, EngineOp, EngineResult, OpContext};
use berth_model::{Instance, InstanceId, LabelFilter, ServiceSpec};
use bollard::{
    API_DEFAULT_VERSION, Docker,
    query_parameters::{RemoveContainerOptions, StartContainerOptions, StopContainerOptions},
};
use tracing::{debug, trace, warn};

use super::{
    config::{DockerConfig, DockerEndpoint},
    convert,
};
use crate::{BACKEND_DOCKER, BackendError};

/// [`Engine`] backed by a Docker daemon.
///
/// Holds a single client handle; the handle is cheap to clone and safe to
/// use from many tasks at once, so the engine itself needs no locking.
#[derive(Debug, Clone)]
pub struct DockerEngine {
    client: Docker,
}

impl DockerEngine {
    /// Connect using the client's local defaults (`DOCKER_HOST` or the default socket).
    pub fn new() -> Result<Self, BackendError> {
        Self::from_config(&DockerConfig::default())
    }

    /// Connect using an explicit configuration.
    pub fn from_config(config: &DockerConfig) -> Result<Self, BackendError> {
        config.validate()?;

        let client = match config.endpoint()? {
            DockerEndpoint::LocalDefaults => Docker::connect_with_local_defaults(),
            DockerEndpoint::Unix(path) => {
                Docker::connect_with_socket(&path, config.timeout_secs, API_DEFAULT_VERSION)
            }
            DockerEndpoint::Http(addr) => {
                Docker::connect_with_http(&addr, config.timeout_secs, API_DEFAULT_VERSION)
            }
        }
        .map_err(|e| BackendError::Connect {
            backend: BACKEND_DOCKER,
            reason: e.to_string(),
        })?
        .with_timeout(Duration::from_secs(config.timeout_secs));

        debug!(address = ?config.address, timeout_secs = config.timeout_secs, "docker client configured");
        Ok(Self { client })
    }

    /// Wrap an already configured client.
    pub fn with_client(client: Docker) -> Self {
        Self { client }
    }

    /// Check that the daemon answers.
    pub async fn ping(&self, ctx: &OpContext) -> EngineResult<()> {
        ctx.run(async {
            self.client
                .ping()
                .await
                .map(|_| ())
                .map_err(|e| EngineError::runtime(BACKEND_DOCKER, None, e.to_string()))
        })
        .await
    }
}

#[async_trait]
impl Engine for DockerEngine {
    fn name(&self) -> &'static str {
        BACKEND_DOCKER
    }

    async fn create(
        &self,
        ctx: &OpContext,
        name: &str,
        spec: &ServiceSpec,
    ) -> EngineResult<InstanceId> {
        spec.validate()?;

        let options = convert::create_options(name);
        let body = convert::create_body(spec);
        trace!(name, image = %spec.image, labels = spec.labels.len(), "creating container");

        let resp = ctx
            .run(async {
                self.client
                    .create_container(Some(options), body)
                    .await
                    .map_err(|e| convert::classify(EngineOp::Create, name, e))
            })
            .await?;

        for warning in &resp.warnings {
            warn!(name, id = %resp.id, warning = %warning, "docker create warning");
        }
        Ok(resp.id)
    }

    async fn start(&self, ctx: &OpContext, id: &str) -> EngineResult<()> {
        ctx.run(async {
            match self
                .client
                .start_container(id, None::<StartContainerOptions>)
                .await
            {
                Ok(()) => Ok(()),
                Err(e) if convert::is_not_modified(&e) => {
                    trace!(id, "container already started");
                    Ok(())
                }
                Err(e) => Err(convert::classify(EngineOp::Start, id, e)),
            }
        })
        .await
    }

    async fn list(
        &self,
        ctx: &OpContext,
        filter: &LabelFilter,
        include_stopped: bool,
    ) -> EngineResult<Vec<Instance>> {
        filter.validate()?;
        let options = convert::list_options(filter, include_stopped);

        let containers = ctx
            .run(async {
                self.client
                    .list_containers(Some(options))
                    .await
                    .map_err(|e| convert::classify(EngineOp::List, "*", e))
            })
            .await?;

        Ok(containers.into_iter().map(convert::to_instance).collect())
    }

    async fn stop(&self, ctx: &OpContext, id: &str) -> EngineResult<()> {
        ctx.run(async {
            match self
                .client
                .stop_container(id, None::<StopContainerOptions>)
                .await
            {
                Ok(()) => Ok(()),
                Err(e) if convert::is_not_modified(&e) => {
                    trace!(id, "container already stopped");
                    Ok(())
                }
                Err(e) => Err(convert::classify(EngineOp::Stop, id, e)),
            }
        })
        .await
    }

    async fn remove(&self, ctx: &OpContext, id: &str) -> EngineResult<()> {
        ctx.run(async {
            self.client
                .remove_container(id, None::<RemoveContainerOptions>)
                .await
                .map_err(|e| convert::classify(EngineOp::Remove, id, e))
        })
        .await
    }
}
