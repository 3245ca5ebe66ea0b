use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{InstanceId, Labels};

/// Snapshot of one runtime instance, taken at query time.
///
/// Instances are never cached: every listing builds fresh values from the runtime's records.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instance {
    /// Runtime-assigned identifier.
    pub id: InstanceId,
    /// Labels reported by the runtime.
    #[serde(default)]
    pub labels: Labels,
    /// `true` only when the runtime reports the instance as running.
    pub running: bool,
}

impl fmt::Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.running { "running" } else { "stopped" };
        write!(f, "{} {} labels={}", self.id, state, self.labels.len())
    }
}
