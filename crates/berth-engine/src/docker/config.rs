use serde::{Deserialize, Serialize};

use crate::BackendError;

/// Default request timeout for the Docker client, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Connection settings for the Docker daemon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DockerConfig {
    /// Daemon address.
    ///
    /// Supported formats:
    /// - unix socket: `unix:///var/run/docker.sock` or `/var/run/docker.sock`
    /// - http: `http://localhost:2375` or `tcp://localhost:2375`
    ///
    /// TLS endpoints (`https://`) are rejected: the client is built without TLS support.
    ///
    /// `None` uses the client's local defaults, which honour `DOCKER_HOST`.
    pub address: Option<String>,
    /// Client-side timeout for a single request, in seconds. Applies to every endpoint.
    pub timeout_secs: u64,
}

impl Default for DockerConfig {
    fn default() -> Self {
        Self {
            address: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Parsed form of [`DockerConfig::address`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DockerEndpoint {
    LocalDefaults,
    Unix(String),
    Http(String),
}

impl DockerConfig {
    /// Config pointing at an explicit daemon address.
    pub fn with_address(address: impl Into<String>) -> Self {
        Self {
            address: Some(address.into()),
            ..Self::default()
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), BackendError> {
        if self.timeout_secs == 0 {
            return Err(BackendError::InvalidConfig(
                "docker.timeoutSecs cannot be zero".into(),
            ));
        }
        self.endpoint().map(|_| ())
    }

    /// Resolve the configured address into an endpoint.
    pub fn endpoint(&self) -> Result<DockerEndpoint, BackendError> {
        let Some(address) = self.address.as_deref().map(str::trim) else {
            return Ok(DockerEndpoint::LocalDefaults);
        };

        if let Some(rest) = address
            .strip_prefix("http://")
            .or_else(|| address.strip_prefix("tcp://"))
        {
            if rest.is_empty() {
                return Err(BackendError::InvalidConfig(format!(
                    "docker address {address:?} has no host"
                )));
            }
            return Ok(DockerEndpoint::Http(format!("http://{rest}")));
        }
        if address.starts_with("https://") {
            return Err(BackendError::InvalidConfig(format!(
                "docker address {address:?}: TLS endpoints are not supported"
            )));
        }

        let path = address.trim_start_matches("unix://");
        if path.is_empty() {
            return Err(BackendError::InvalidConfig(
                "docker address is empty".into(),
            ));
        }
        Ok(DockerEndpoint::Unix(path.to_string()))
    }
}
