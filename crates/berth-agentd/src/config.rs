use std::{fmt, path::Path, time::Duration};

use anyhow::Context;
use berth_engine::docker::DockerConfig;
use berth_observe::LoggerConfig;
use serde::{Deserialize, Serialize};

/// Which backend `berthctl` drives.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Docker,
    /// In-process engine; state lives only as long as the command.
    Memory,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Docker => berth_engine::BACKEND_DOCKER,
            BackendKind::Memory => berth_engine::BACKEND_MEMORY,
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Engine section of the config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    pub backend: BackendKind,
    pub docker: DockerConfig,
    /// Deadline for each engine call; unset means no deadline beyond the client's own.
    pub timeout_ms: Option<u64>,
}

impl EngineConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

/// Top-level `berthctl` configuration (JSON).
///
/// ```json
/// {
///   "logger": { "format": "json", "level": "berth_engine=debug,info" },
///   "engine": { "backend": "docker", "docker": { "address": "unix:///var/run/docker.sock" }, "timeoutMs": 30000 }
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AgentConfig {
    pub logger: LoggerConfig,
    pub engine: EngineConfig,
}

impl AgentConfig {
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        let cfg: Self = serde_json::from_str(raw)?;
        if cfg.engine.timeout_ms == Some(0) {
            anyhow::bail!("engine.timeoutMs cannot be zero");
        }
        Ok(cfg)
    }
}
