use serde::{Deserialize, Serialize};

use crate::{Labels, ModelError, ModelResult};

/// Declarative description of an instance to create.
///
/// `ServiceSpec` carries only what the engine forwards to the runtime:
/// the image, its entrypoint and command overrides, and labels.
/// Ports, volumes and networks are intentionally absent; a backend creates
/// instances with the runtime's defaults for everything else.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSpec {
    /// Image reference (e.g. `"alpine:latest"`).
    pub image: String,
    /// Entrypoint override.
    ///
    /// Empty means "use the image's entrypoint".
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entrypoint: Vec<String>,
    /// Command override.
    ///
    /// Empty means "use the image's default command".
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub command: Vec<String>,
    /// Labels attached to the created instance and later used by label filters.
    #[serde(default, skip_serializing_if = "Labels::is_empty")]
    pub labels: Labels,
}

impl ServiceSpec {
    /// Create a spec for `image` with no overrides and no labels.
    pub fn new(image: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            entrypoint: Vec::new(),
            command: Vec::new(),
            labels: Labels::new(),
        }
    }

    pub fn with_entrypoint<I, S>(mut self, entrypoint: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entrypoint = entrypoint.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_command<I, S>(mut self, command: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.command = command.into_iter().map(Into::into).collect();
        self
    }

    /// Attach a single label, overwriting any previous value for `key`.
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key, value);
        self
    }

    /// Validate the spec before it is handed to a runtime.
    ///
    /// Rules:
    /// - `image` is not empty or whitespace-only.
    pub fn validate(&self) -> ModelResult<()> {
        if self.image.trim().is_empty() {
            return Err(ModelError::Invalid("service image is empty".into()));
        }
        Ok(())
    }
}
