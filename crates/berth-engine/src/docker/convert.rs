//! Translation between berth model types and Docker API types.
use std::collections::HashMap;

use berth_core::{EngineError, EngineOp};
use berth_model::{Instance, LabelFilter, Labels, ServiceSpec};
use bollard::{
    errors::Error as DockerError,
    models::{ContainerCreateBody, ContainerSummary, ContainerSummaryStateEnum},
    query_parameters::{CreateContainerOptions, ListContainersOptions},
};

use crate::BACKEND_DOCKER;

const STATUS_NOT_MODIFIED: u16 = 304;
const STATUS_NOT_FOUND: u16 = 404;
const STATUS_CONFLICT: u16 = 409;

/// Build the create request body.
///
/// Only image, entrypoint, command and labels are forwarded. Empty
/// overrides are sent as absent so the image defaults apply.
pub(crate) fn create_body(spec: &ServiceSpec) -> ContainerCreateBody {
    ContainerCreateBody {
        image: Some(spec.image.clone()),
        entrypoint: non_empty(&spec.entrypoint),
        cmd: non_empty(&spec.command),
        labels: (!spec.labels.is_empty()).then(|| spec.labels.clone().into()),
        ..Default::default()
    }
}

pub(crate) fn create_options(name: &str) -> CreateContainerOptions {
    CreateContainerOptions {
        name: Some(name.to_string()),
        ..Default::default()
    }
}

/// Build list options: every filter expression goes under the `label` key.
pub(crate) fn list_options(filter: &LabelFilter, include_stopped: bool) -> ListContainersOptions {
    let exprs = filter.expressions();
    ListContainersOptions {
        all: include_stopped,
        filters: (!exprs.is_empty()).then(|| HashMap::from([("label".to_string(), exprs)])),
        ..Default::default()
    }
}

pub(crate) fn to_instance(summary: ContainerSummary) -> Instance {
    Instance {
        id: summary.id.unwrap_or_default(),
        labels: summary.labels.map(Labels::from).unwrap_or_default(),
        running: summary.state == Some(ContainerSummaryStateEnum::RUNNING),
    }
}

/// `true` when the daemon answered "not modified" (already started / already stopped).
pub(crate) fn is_not_modified(err: &DockerError) -> bool {
    matches!(
        err,
        DockerError::DockerResponseServerError {
            status_code: STATUS_NOT_MODIFIED,
            ..
        }
    )
}

/// Classify a Docker error for operation `op` on `target` (instance id or name).
///
/// Only operations addressing one instance map 404 to not-found: on `create`
/// it refers to the image, on `list` to the API route.
pub(crate) fn classify(op: EngineOp, target: &str, err: DockerError) -> EngineError {
    match err {
        DockerError::DockerResponseServerError {
            status_code: STATUS_NOT_FOUND,
            ..
        } if addresses_instance(op) => EngineError::not_found(target),
        DockerError::DockerResponseServerError {
            status_code: STATUS_CONFLICT,
            message,
        } => EngineError::Conflict(message),
        DockerError::DockerResponseServerError {
            status_code,
            message,
        } => EngineError::runtime(BACKEND_DOCKER, Some(status_code), message),
        other => EngineError::runtime(BACKEND_DOCKER, None, other.to_string()),
    }
}

fn addresses_instance(op: EngineOp) -> bool {
    matches!(op, EngineOp::Start | EngineOp::Stop | EngineOp::Remove)
}

fn non_empty(v: &[String]) -> Option<Vec<String>> {
    (!v.is_empty()).then(|| v.to_vec())
}
